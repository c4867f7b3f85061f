//! Generated shots and their diagnostics

use serde::{Deserialize, Serialize};

use super::FramingMode;
use crate::foundation::math::Vec3;
use crate::layout::{OcclusionConflict, OutOfBoundsConflict, OverlapConflict};
use crate::optics::GeometryError;
use crate::scene::{EntityId, SceneId};

/// Optical metrics of a solved shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotMetrics {
    /// Camera to subject-group distance in meters (solved or as placed)
    pub distance: f32,
    /// Horizontal field of view in radians
    pub horizontal_fov: f32,
    /// Vertical field of view in radians
    pub vertical_fov: f32,
    /// Share of the frame the subjects fill along the framing axis
    pub framing_ratio: f32,
    /// Subject group size along the framing axis in meters
    pub subject_size: f32,
    /// Where to put the camera for a target-fraction shot, keeping its aim
    pub suggested_position: Option<Vec3>,
}

/// Something a shot's reader should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The optics could not be solved; the shot has no metrics
    Geometry(GeometryError),
    /// The subjects are larger than the frame as placed
    FrameOverflow {
        /// Framing ratio above 1
        ratio: f32,
    },
    /// A subject interpenetrates another object
    Overlap(OverlapConflict),
    /// A subject is hidden from the camera
    Occlusion(OcclusionConflict),
    /// The camera or a subject is outside the stage extents
    OutOfBounds(OutOfBoundsConflict),
}

/// One entry of a shot list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Originating request
    pub request_id: String,
    /// Camera
    pub camera: EntityId,
    /// Subjects, ascending by id
    pub subjects: Vec<EntityId>,
    /// Requested framing
    pub framing: FramingMode,
    /// Request priority
    pub priority: i32,
    /// Request creation order
    pub creation_order: u64,
    /// Solved metrics, absent when the optics failed
    pub metrics: Option<ShotMetrics>,
    /// Findings in a fixed order: geometry, overflow, overlaps, occlusions, bounds
    pub diagnostics: Vec<Diagnostic>,
}

impl Shot {
    /// True if the shot carries no diagnostics
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Ordered result of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotList {
    /// Source scene
    pub scene_id: SceneId,
    /// Scene version the list was computed at
    pub scene_version: u64,
    /// Shots ordered by (priority, creation order, request id)
    pub shots: Vec<Shot>,
}

impl ShotList {
    /// Number of shots
    pub fn len(&self) -> usize {
        self.shots.len()
    }

    /// True if the list holds no shots
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Find a shot by request id
    pub fn shot(&self, request_id: &str) -> Option<&Shot> {
        self.shots.iter().find(|s| s.request_id == request_id)
    }

    /// Request ids in list order
    pub fn request_ids(&self) -> Vec<&str> {
        self.shots.iter().map(|s| s.request_id.as_str()).collect()
    }
}
