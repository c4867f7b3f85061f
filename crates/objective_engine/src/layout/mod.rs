//! # Layout Validator
//!
//! Detects spatial conflicts on a resolved scene: interpenetrating objects,
//! objects blocking a camera's line of sight, and entities placed outside
//! the declared stage extents.
//!
//! Conflicts are data. None of these checks mutate the scene or stop at the
//! first problem; the only failures are structural scene errors such as an
//! unknown id.

mod conflicts;
mod validator;

pub use conflicts::{
    Blocker, LayoutReport, OcclusionConflict, OcclusionReport, OutOfBoundsConflict,
    OverlapConflict,
};
pub use validator::LayoutValidator;

use crate::scene::{EntityId, Scene, SceneError};

/// Pairwise overlap test over every object, ascending by (first, second)
pub fn detect_overlaps(scene: &Scene) -> Result<Vec<OverlapConflict>, SceneError> {
    LayoutValidator::new(scene).detect_overlaps()
}

/// Objects blocking the sight line from `camera_id` to `subject_id`, nearest first
pub fn detect_occlusion(
    scene: &Scene,
    camera_id: &EntityId,
    subject_id: &EntityId,
) -> Result<OcclusionReport, SceneError> {
    LayoutValidator::new(scene).detect_occlusion(camera_id, subject_id)
}

/// True if the entity's world bounds are not entirely inside the scene extents
pub fn detect_out_of_bounds(scene: &Scene, entity_id: &EntityId) -> Result<bool, SceneError> {
    LayoutValidator::new(scene).detect_out_of_bounds(entity_id)
}

/// Every overlap and out-of-bounds entity in the scene
pub fn validate_layout(scene: &Scene) -> Result<LayoutReport, SceneError> {
    LayoutValidator::new(scene).validate()
}
