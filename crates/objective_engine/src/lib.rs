//! # Objective Engine
//!
//! Scene composition and camera geometry for film pre-production.
//!
//! ## Features
//!
//! - **Scene Graph**: objects, cameras and lights with id-based parenting,
//!   resolved into world transforms and bounds
//! - **Optics**: pinhole field of view, framing distance and framing ratio
//! - **Layout Validation**: overlaps, line-of-sight occlusion, stage bounds
//! - **Shot Lists**: ordered, diagnosed shots from camera/subject requests
//! - **Diagrams**: 2D floor plans and elevations of the set
//!
//! Every computation is a pure function of an immutable [`scene::Scene`]
//! snapshot. Coordinates are right-handed and Y-up; cameras look down their
//! local -Z axis. Distances are meters, lens and sensor sizes millimeters.
//!
//! ## Quick Start
//!
//! ```rust
//! use objective_engine::prelude::*;
//!
//! let scene = Scene::new(
//!     "stage-a",
//!     AABB::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 5.0, 10.0)),
//! )
//! .with_object(SceneObject::new(
//!     "hero",
//!     Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
//!     Vec3::new(0.6, 1.8, 0.4),
//! ))
//! .with_camera(Camera::new(
//!     "a-cam",
//!     Transform::from_position(Vec3::new(0.0, 1.5, 6.0)),
//!     LensParameters::full_frame(50.0),
//! ));
//!
//! let requests = [ShotRequest::new("hero-wide", "a-cam", ["hero"]).with_target_fraction(0.5)];
//! let shots = ShotListGenerator::default().generate(&scene, &requests)?;
//! assert_eq!(shots.len(), 1);
//!
//! let plan = DiagramProjector::default().project_default(&scene)?;
//! assert_eq!(plan.entities.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod spatial;

pub mod scene;
pub mod optics;
pub mod layout;
pub mod shots;
pub mod diagram;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PlannerConfig},
        diagram::{DiagramExport, DiagramProjector, ProjectionPlane},
        foundation::math::{Transform, Vec2, Vec3},
        layout::{LayoutReport, LayoutValidator},
        optics::{FrameAxis, GeometryError, LensParameters},
        scene::{Camera, EntityId, Light, LightKind, Scene, SceneError, SceneId, SceneObject},
        shots::{FramingMode, ShotList, ShotListError, ShotListGenerator, ShotRequest},
        spatial::AABB,
    };
}
