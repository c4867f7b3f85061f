//! Shot requests as supplied by the caller

use serde::{Deserialize, Serialize};

use crate::optics::FrameAxis;
use crate::scene::EntityId;

/// How a shot should be framed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FramingMode {
    /// Solve the camera distance at which the subjects fill `fraction` of the frame
    TargetFraction {
        /// Share of the frame along `axis`, within (0, 1]
        fraction: f32,
        /// Sensor dimension the fraction applies to
        axis: FrameAxis,
    },
    /// Report the framing for the camera where it currently stands
    AsPlaced {
        /// Sensor dimension the ratio is measured along
        axis: FrameAxis,
    },
}

impl FramingMode {
    /// Sensor dimension this framing is measured along
    pub fn axis(&self) -> FrameAxis {
        match *self {
            Self::TargetFraction { axis, .. } | Self::AsPlaced { axis } => axis,
        }
    }
}

impl Default for FramingMode {
    fn default() -> Self {
        Self::AsPlaced {
            axis: FrameAxis::Horizontal,
        }
    }
}

/// One requested camera/subject pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRequest {
    /// Caller-assigned request id, unique within one generation
    pub id: String,
    /// Camera to shoot from
    pub camera: EntityId,
    /// Objects in the shot (at least one)
    pub subjects: Vec<EntityId>,
    /// Desired framing
    #[serde(default)]
    pub framing: FramingMode,
    /// Lower runs first
    #[serde(default)]
    pub priority: i32,
    /// Lower runs first among equal priorities
    #[serde(default)]
    pub creation_order: u64,
}

impl ShotRequest {
    /// Create an as-placed request with priority and creation order 0
    pub fn new<S>(id: impl Into<String>, camera: impl Into<EntityId>, subjects: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<EntityId>,
    {
        Self {
            id: id.into(),
            camera: camera.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
            framing: FramingMode::default(),
            priority: 0,
            creation_order: 0,
        }
    }

    /// Builder pattern: set framing
    #[must_use]
    pub fn with_framing(mut self, framing: FramingMode) -> Self {
        self.framing = framing;
        self
    }

    /// Builder pattern: frame the subjects to `fraction` of the frame width
    #[must_use]
    pub fn with_target_fraction(self, fraction: f32) -> Self {
        self.with_framing(FramingMode::TargetFraction {
            fraction,
            axis: FrameAxis::Horizontal,
        })
    }

    /// Builder pattern: set priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder pattern: set creation order
    #[must_use]
    pub fn with_creation_order(mut self, creation_order: u64) -> Self {
        self.creation_order = creation_order;
        self
    }

    pub(crate) fn ordering_key(&self) -> (i32, u64, &str) {
        (self.priority, self.creation_order, &self.id)
    }
}
