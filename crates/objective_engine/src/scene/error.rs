//! Structural scene errors

use thiserror::Error;

use super::EntityId;

/// Errors raised when a scene snapshot is malformed or a lookup fails
///
/// Every variant is structural: it aborts the enclosing operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No entity with this id exists in the scene
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Two entities share an id
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// The parent chain starting at `entity` loops back on itself
    #[error("Parent cycle detected at {entity} (revisited {revisited})")]
    Cycle {
        /// Entity whose resolution was requested
        entity: EntityId,
        /// First ancestor seen twice
        revisited: EntityId,
    },

    /// An entity (or one of its ancestors) has a zero scale axis
    #[error("Degenerate transform on {0}: scale must be non-zero on every axis")]
    DegenerateTransform(EntityId),

    /// An entity carries out-of-range data
    #[error("Invalid entity {entity}: {reason}")]
    InvalidEntity {
        /// Offending entity (or the scene id for scene-level data)
        entity: EntityId,
        /// What is wrong with it
        reason: String,
    },

    /// The snapshot is older than the version the caller expected
    #[error("Stale scene version: expected {expected}, found {found}")]
    StaleVersion {
        /// Version the caller read
        expected: u64,
        /// Version the snapshot carries
        found: u64,
    },
}
