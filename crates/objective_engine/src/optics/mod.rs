//! # Optics Solver
//!
//! Pure, stateless pinhole-camera math. Every function is a deterministic
//! function of its arguments: no caching, no hidden state, single precision.
//!
//! ## Units
//! - Focal length and sensor dimensions in millimeters
//! - Subject sizes and distances in meters
//! - Angles in radians
//!
//! The similar-triangles relation used throughout is
//!
//! ```text
//! projected_size_mm / focal_mm = subject_m / distance_m
//! framing = projected_size_mm / sensor_mm
//! ```
//!
//! so millimeters cancel and distances come out in meters.

mod lens;

pub use lens::{FrameAxis, LensParameters};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Per-shot optical failures
///
/// These never abort a shot list; the generator records them as diagnostics
/// on the affected shot.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryError {
    /// A parameter was non-positive, non-finite or out of range
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Offending value
        value: f32,
    },

    /// The subject sits on or behind the camera's facing plane
    #[error("Subject is behind the camera (depth {depth} m)")]
    SubjectBehindCamera {
        /// Signed depth of the subject along the camera's facing vector
        depth: f32,
    },
}

fn require_positive(name: &str, value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

fn require_fraction(value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter {
            name: "target frame fraction".to_string(),
            value,
        })
    }
}

/// Angular field of view along one sensor dimension
///
/// `2 * atan(sensor / (2 * focal))`
pub fn field_of_view(focal_length_mm: f32, sensor_dimension_mm: f32) -> Result<f32, GeometryError> {
    let focal = require_positive("focal length", focal_length_mm)?;
    let sensor = require_positive("sensor dimension", sensor_dimension_mm)?;
    Ok(2.0 * (sensor / (2.0 * focal)).atan())
}

/// Focal length that produces `fov_radians` on the given sensor dimension
///
/// Inverse of [`field_of_view`]; the angle must lie in `(0, π)`.
pub fn focal_length_for_fov(fov_radians: f32, sensor_dimension_mm: f32) -> Result<f32, GeometryError> {
    let sensor = require_positive("sensor dimension", sensor_dimension_mm)?;
    if !(fov_radians.is_finite() && fov_radians > 0.0 && fov_radians < std::f32::consts::PI) {
        return Err(GeometryError::InvalidParameter {
            name: "field of view".to_string(),
            value: fov_radians,
        });
    }
    Ok(sensor / (2.0 * (fov_radians * 0.5).tan()))
}

/// Distance at which a subject fills `target_frame_fraction` of the frame
///
/// `distance = (focal * subject) / (sensor * fraction)`
pub fn required_distance(
    focal_length_mm: f32,
    sensor_dimension_mm: f32,
    subject_dimension_m: f32,
    target_frame_fraction: f32,
) -> Result<f32, GeometryError> {
    let focal = require_positive("focal length", focal_length_mm)?;
    let sensor = require_positive("sensor dimension", sensor_dimension_mm)?;
    let subject = require_positive("subject dimension", subject_dimension_m)?;
    let fraction = require_fraction(target_frame_fraction)?;

    let distance = (focal * subject) / (sensor * fraction);
    if distance.is_finite() && distance > 0.0 {
        Ok(distance)
    } else {
        Err(GeometryError::SubjectBehindCamera { depth: distance })
    }
}

/// Fraction of the frame a subject occupies at a fixed distance
///
/// Inverse of [`required_distance`]. Values above 1.0 mean the subject
/// overflows the frame along that axis.
pub fn framing_ratio(
    distance_m: f32,
    focal_length_mm: f32,
    sensor_dimension_mm: f32,
    subject_dimension_m: f32,
) -> Result<f32, GeometryError> {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(GeometryError::SubjectBehindCamera { depth: distance_m });
    }
    let focal = require_positive("focal length", focal_length_mm)?;
    let sensor = require_positive("sensor dimension", sensor_dimension_mm)?;
    let subject = require_positive("subject dimension", subject_dimension_m)?;
    Ok((focal * subject) / (sensor * distance_m))
}

/// Signed depth of `subject` along the camera's `facing` vector
pub fn depth_along(camera_position: Vec3, facing: Vec3, subject_position: Vec3) -> f32 {
    (subject_position - camera_position).dot(&facing)
}

/// Fails with [`GeometryError::SubjectBehindCamera`] unless the subject lies
/// strictly in front of the camera's facing plane; returns its depth
pub fn ensure_in_front(
    camera_position: Vec3,
    facing: Vec3,
    subject_position: Vec3,
) -> Result<f32, GeometryError> {
    let depth = depth_along(camera_position, facing, subject_position);
    if depth > 0.0 {
        Ok(depth)
    } else {
        Err(GeometryError::SubjectBehindCamera { depth })
    }
}
