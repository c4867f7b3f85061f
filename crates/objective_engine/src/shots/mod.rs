//! # Shot List Generator
//!
//! Orchestrates scene resolution, the optics solver and the layout validator
//! into an ordered shot list.
//!
//! ## Ordering
//!
//! Shots are ordered by (priority, creation order, request id), independent
//! of the order requests were supplied in. Two requests sharing both
//! priority and creation order are rejected with
//! [`ShotListError::AmbiguousOrdering`] instead of being ordered by id.
//!
//! ## Failure policy
//!
//! Structural problems abort the whole list. Per-shot optical failures and
//! layout conflicts are recorded on the shot as [`Diagnostic`]s so a partial
//! plan can still be reviewed.

mod generator;
mod request;
mod shot;

pub use generator::{generate_shot_list, ShotListGenerator};
pub use request::{FramingMode, ShotRequest};
pub use shot::{Diagnostic, Shot, ShotList, ShotMetrics};

use thiserror::Error;

use crate::scene::{EntityId, SceneError};

/// Structural failures that abort shot list generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShotListError {
    /// Malformed scene or unknown entity id
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Two requests share priority and creation order
    #[error("Requests {first} and {second} both have priority {priority} and creation order {creation_order}")]
    AmbiguousOrdering {
        /// Lower request id of the tied pair
        first: String,
        /// Higher request id of the tied pair
        second: String,
        /// Shared priority
        priority: i32,
        /// Shared creation order
        creation_order: u64,
    },

    /// A request names no subjects
    #[error("Request {0} has no subjects")]
    EmptySubjects(String),

    /// Two requests share an id
    #[error("Duplicate request id: {0}")]
    DuplicateRequest(String),

    /// The request's camera id refers to an object or light
    #[error("Request {request}: {entity} is not a camera")]
    NotACamera {
        /// Request id
        request: String,
        /// Offending entity
        entity: EntityId,
    },

    /// A subject id refers to a camera or light
    #[error("Request {request}: {entity} is not an object")]
    NotAnObject {
        /// Request id
        request: String,
        /// Offending entity
        entity: EntityId,
    },
}
