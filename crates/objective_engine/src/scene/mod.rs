//! # Scene Graph Model
//!
//! Spatial model of a set: objects, cameras and lights with id-based parent
//! links, plus resolution of world-space transforms and bounds.
//!
//! ## Organization
//!
//! - **Entities**: pure data records ([`SceneObject`], [`Camera`], [`Light`])
//! - **Model**: the [`Scene`] snapshot, lookups and defensive validation
//! - **Scene graph**: world transform/bounds resolution with cycle detection
//! - **Transform cache**: generation-keyed memo for repeated resolution
//! - **Source**: the seam to the persistence layer

mod entity;
mod error;
mod model;
pub mod scene_graph;
mod source;
mod transform_cache;

pub use entity::{Camera, EntityId, EntityKind, EntityRef, Light, LightKind, SceneObject};
pub use error::SceneError;
pub use model::{Scene, SceneId};
pub use scene_graph::{resolve_world_transform, world_bounds, WorldTransform};
pub use source::{InMemorySceneSource, SceneSource, SourceError};
pub use transform_cache::TransformCache;
