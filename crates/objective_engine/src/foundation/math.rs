//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, the optics
//! solver and the diagram projector. All computations use `f32`.
//!
//! # Coordinate System
//! Right-handed, Y-up, meters:
//! - X+ = Right
//! - Y+ = Up
//! - Z- = Forward (the direction an unrotated camera faces)

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local forward axis of every entity (cameras look down -Z)
pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Local right axis
pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Local up axis
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Local transform representing position, rotation, and scale
///
/// Applied in TRS order: scale first, then rotation, then translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent (or the scene origin for roots)
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors; every axis must be positive
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation from Euler angles (radians, roll/pitch/yaw)
    #[must_use]
    pub fn with_rotation_euler(mut self, roll: f32, pitch: f32, yaw: f32) -> Self {
        self.rotation = Quat::from_euler_angles(roll, pitch, yaw);
        self
    }

    /// Builder pattern: set scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// True if any scale axis is within `epsilon` of zero (or not finite)
    pub fn is_degenerate(&self, epsilon: f32) -> bool {
        self.scale
            .iter()
            .any(|s| !s.is_finite() || s.abs() <= epsilon)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}
