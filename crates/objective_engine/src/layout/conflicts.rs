//! Conflict records produced by the layout validator
//!
//! Conflicts are plain data: they describe a problem with the set, they are
//! never raised as errors.

use serde::{Deserialize, Serialize};

use crate::scene::EntityId;
use crate::spatial::AABB;

/// Two objects whose world bounds interpenetrate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapConflict {
    /// Lower of the two ids
    pub first: EntityId,
    /// Higher of the two ids
    pub second: EntityId,
    /// Shared region of both boxes
    pub intersection: AABB,
}

impl OverlapConflict {
    /// Build a conflict with ids stored in ascending order
    pub fn new(a: EntityId, b: EntityId, intersection: AABB) -> Self {
        if a <= b {
            Self { first: a, second: b, intersection }
        } else {
            Self { first: b, second: a, intersection }
        }
    }

    /// True if either participant is `id`
    pub fn involves(&self, id: &EntityId) -> bool {
        &self.first == id || &self.second == id
    }
}

/// An object crossing the line of sight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blocker {
    /// Blocking object
    pub id: EntityId,
    /// Distance from the viewpoint to where the sight line enters its bounds, meters
    pub distance: f32,
}

/// Result of a line-of-sight query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcclusionReport {
    /// True if at least one object blocks the view
    pub occluded: bool,
    /// Blocking objects ordered by distance along the sight line, then id
    pub blockers: Vec<Blocker>,
}

impl OcclusionReport {
    /// Ids of the blockers, nearest first
    pub fn blocker_ids(&self) -> Vec<&EntityId> {
        self.blockers.iter().map(|b| &b.id).collect()
    }
}

/// A subject hidden from a camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcclusionConflict {
    /// Viewing camera
    pub camera: EntityId,
    /// Hidden subject
    pub subject: EntityId,
    /// Objects in the way, nearest first
    pub blockers: Vec<Blocker>,
}

/// An entity extending beyond the scene extents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfBoundsConflict {
    /// Offending entity
    pub entity: EntityId,
    /// Its world bounds
    pub bounds: AABB,
}

/// Whole-scene layout summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Overlapping object pairs, ascending by (first, second)
    pub overlaps: Vec<OverlapConflict>,
    /// Entities outside the extents, ascending by id
    pub out_of_bounds: Vec<OutOfBoundsConflict>,
}

impl LayoutReport {
    /// True if no conflict was found
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty() && self.out_of_bounds.is_empty()
    }
}
