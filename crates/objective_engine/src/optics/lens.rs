//! Camera lens and sensor parameters

use serde::{Deserialize, Serialize};

use super::{field_of_view, GeometryError};

/// Which sensor dimension a framing computation is measured along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameAxis {
    /// Sensor width, measured along the camera's right vector
    #[default]
    Horizontal,
    /// Sensor height, measured along the camera's up vector
    Vertical,
}

/// Lens and sensor description of a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensParameters {
    /// Focal length in millimeters (> 0)
    pub focal_length_mm: f32,
    /// Sensor width in millimeters (> 0)
    pub sensor_width_mm: f32,
    /// Sensor height in millimeters (> 0)
    pub sensor_height_mm: f32,
}

impl Default for LensParameters {
    /// 50 mm on a full-frame (36 x 24 mm) sensor
    fn default() -> Self {
        Self::full_frame(50.0)
    }
}

impl LensParameters {
    /// Create lens parameters
    pub fn new(focal_length_mm: f32, sensor_width_mm: f32, sensor_height_mm: f32) -> Self {
        Self {
            focal_length_mm,
            sensor_width_mm,
            sensor_height_mm,
        }
    }

    /// Full-frame 35 mm still sensor (36 x 24 mm)
    pub fn full_frame(focal_length_mm: f32) -> Self {
        Self::new(focal_length_mm, 36.0, 24.0)
    }

    /// Super 35 motion picture sensor (24.89 x 18.66 mm)
    pub fn super_35(focal_length_mm: f32) -> Self {
        Self::new(focal_length_mm, 24.89, 18.66)
    }

    /// Sensor size along a frame axis
    pub fn sensor_dimension(&self, axis: FrameAxis) -> f32 {
        match axis {
            FrameAxis::Horizontal => self.sensor_width_mm,
            FrameAxis::Vertical => self.sensor_height_mm,
        }
    }

    /// Field of view along a frame axis
    pub fn fov(&self, axis: FrameAxis) -> Result<f32, GeometryError> {
        field_of_view(self.focal_length_mm, self.sensor_dimension(axis))
    }

    /// Horizontal field of view in radians
    pub fn horizontal_fov(&self) -> Result<f32, GeometryError> {
        self.fov(FrameAxis::Horizontal)
    }

    /// Vertical field of view in radians
    pub fn vertical_fov(&self) -> Result<f32, GeometryError> {
        self.fov(FrameAxis::Vertical)
    }

    /// Diagonal field of view in radians
    pub fn diagonal_fov(&self) -> Result<f32, GeometryError> {
        let diagonal = self.sensor_width_mm.hypot(self.sensor_height_mm);
        field_of_view(self.focal_length_mm, diagonal)
    }

    /// Sensor aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.sensor_width_mm / self.sensor_height_mm
    }

    /// Check every parameter is strictly positive and finite
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, value) in [
            ("focal length", self.focal_length_mm),
            ("sensor width", self.sensor_width_mm),
            ("sensor height", self.sensor_height_mm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::InvalidParameter {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}
