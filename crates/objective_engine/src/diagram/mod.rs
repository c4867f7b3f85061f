//! # Diagram Projector
//!
//! Flattens a resolved scene onto a 2D plane for set diagrams: floor plans
//! (the default, top-down) and elevations.
//!
//! The projection is orthogonal along the plane normal onto an orthonormal
//! `(u, v)` basis, so it is linear and preserves in-plane distances.
//! Aim directions of cameras and directional lights are projected too and
//! renormalized; an aim parallel to the normal is valid in 3D and is
//! reported as a [`DiagramDiagnostic`] rather than an error.

mod export;
mod plane;

pub use export::{DiagramDiagnostic, DiagramEntity, DiagramExport, Rect2};
pub use plane::{PlaneBasis, ProjectionPlane};

use thiserror::Error;

use crate::config::PlannerConfig;
use crate::foundation::math::utils;
use crate::scene::{EntityRef, LightKind, Scene, SceneError, TransformCache};

/// Projected aim vectors shorter than this have no orientation
const MIN_ORIENTATION_LENGTH: f32 = 1e-4;

/// Failures that prevent a diagram from being produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagramError {
    /// The scene is structurally malformed
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// A custom plane whose normal is zero or parallel to its up vector
    #[error("Projection plane is degenerate: normal must be non-zero and not parallel to up")]
    DegeneratePlane,
}

/// Project every entity of `scene` onto `plane`
pub fn project(scene: &Scene, plane: &ProjectionPlane) -> Result<DiagramExport, DiagramError> {
    DiagramProjector::new(&PlannerConfig::default()).project(scene, plane)
}

/// Diagram projector carrying the planner's default plane
#[derive(Debug, Clone, Default)]
pub struct DiagramProjector {
    default_plane: ProjectionPlane,
}

impl DiagramProjector {
    /// Create a projector from the planner configuration
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            default_plane: config.default_plane,
        }
    }

    /// Project onto the configured default plane
    pub fn project_default(&self, scene: &Scene) -> Result<DiagramExport, DiagramError> {
        self.project(scene, &self.default_plane)
    }

    /// Project onto an explicit plane
    pub fn project(&self, scene: &Scene, plane: &ProjectionPlane) -> Result<DiagramExport, DiagramError> {
        let basis = plane.basis()?;
        scene.validate()?;

        let mut refs: Vec<EntityRef<'_>> = scene.entities().collect();
        refs.sort_by(|a, b| a.id().cmp(b.id()));

        let mut cache = TransformCache::new();
        let mut entities = Vec::with_capacity(refs.len());
        let mut diagnostics = Vec::new();

        for entity in refs {
            let id = entity.id();
            let world = cache.world_transform(scene, id)?;

            let aims = match entity {
                EntityRef::Camera(_) => true,
                EntityRef::Light(light) => light.is_directional(),
                EntityRef::Object(_) => false,
            };
            let orientation = if aims {
                let projected = basis.project_vector(world.facing());
                let direction = projected.try_normalize(MIN_ORIENTATION_LENGTH);
                if direction.is_none() {
                    log::debug!("Entity {} aims along the projection normal", id);
                    diagnostics.push(DiagramDiagnostic::DegenerateOrientation { entity: id.clone() });
                }
                direction
            } else {
                None
            };

            let has_area = match entity {
                EntityRef::Object(_) => true,
                EntityRef::Light(light) => matches!(light.kind, LightKind::Area { .. }),
                EntityRef::Camera(_) => false,
            };
            let footprint = if has_area {
                let bounds = cache.world_bounds(scene, id)?;
                Rect2::from_points(bounds.corners().iter().map(|c| basis.project_point(*c)))
            } else {
                None
            };

            let field_of_view = match entity {
                EntityRef::Camera(camera) => camera.lens.horizontal_fov().ok(),
                EntityRef::Light(light) => match light.kind {
                    LightKind::Spot { beam_angle_deg } => Some(utils::deg_to_rad(beam_angle_deg)),
                    LightKind::Point | LightKind::Area { .. } => None,
                },
                EntityRef::Object(_) => None,
            };

            entities.push(DiagramEntity {
                id: id.clone(),
                label: entity.name().to_string(),
                kind: entity.kind(),
                position: basis.project_point(world.position()),
                orientation,
                footprint,
                field_of_view,
            });
        }

        log::debug!(
            "Projected scene {} v{} onto {:?}: {} entities, {} diagnostics",
            scene.id,
            scene.version,
            plane,
            entities.len(),
            diagnostics.len()
        );

        Ok(DiagramExport {
            scene_id: scene.id.clone(),
            scene_version: scene.version,
            plane: *plane,
            entities,
            diagnostics,
        })
    }
}
