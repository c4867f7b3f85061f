//! Projection planes for 2D set diagrams

use serde::{Deserialize, Serialize};

use super::DiagramError;
use crate::foundation::math::{Vec2, Vec3};

/// Plane a diagram is drawn on
///
/// Each plane defines an orthonormal basis `(u, v, normal)` with
/// `u × v = normal`. Points are projected orthogonally along the normal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ProjectionPlane {
    /// Floor plan seen from above: drops Y, `u = +X`, `v = -Z`
    #[default]
    TopDown,
    /// Elevation seen from the front: drops Z, `u = +X`, `v = +Y`
    Front,
    /// Elevation seen from stage right: drops X, `u = -Z`, `v = +Y`
    Side,
    /// Arbitrary plane through the origin
    Custom {
        /// Viewing direction the diagram is projected along (toward the viewer)
        normal: Vec3,
        /// Direction that should point up on the page; orthogonalized against `normal`
        up: Vec3,
    },
}

/// Orthonormal basis of a projection plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    /// Diagram x axis in world space
    pub u: Vec3,
    /// Diagram y axis in world space
    pub v: Vec3,
    /// Projection direction
    pub normal: Vec3,
}

impl PlaneBasis {
    /// Orthogonal projection of a world point onto diagram coordinates
    pub fn project_point(&self, point: Vec3) -> Vec2 {
        Vec2::new(point.dot(&self.u), point.dot(&self.v))
    }

    /// In-plane component of a world direction (not normalized)
    pub fn project_vector(&self, vector: Vec3) -> Vec2 {
        Vec2::new(vector.dot(&self.u), vector.dot(&self.v))
    }
}

const BASIS_EPSILON: f32 = 1e-6;

impl ProjectionPlane {
    /// Build the plane's orthonormal basis
    ///
    /// Fails for a `Custom` plane whose normal is zero or parallel to `up`.
    pub fn basis(&self) -> Result<PlaneBasis, DiagramError> {
        match *self {
            Self::TopDown => Ok(PlaneBasis {
                u: Vec3::x(),
                v: -Vec3::z(),
                normal: Vec3::y(),
            }),
            Self::Front => Ok(PlaneBasis {
                u: Vec3::x(),
                v: Vec3::y(),
                normal: Vec3::z(),
            }),
            Self::Side => Ok(PlaneBasis {
                u: -Vec3::z(),
                v: Vec3::y(),
                normal: Vec3::x(),
            }),
            Self::Custom { normal, up } => {
                let n = normal
                    .try_normalize(BASIS_EPSILON)
                    .ok_or(DiagramError::DegeneratePlane)?;
                let v = (up - n * up.dot(&n))
                    .try_normalize(BASIS_EPSILON)
                    .ok_or(DiagramError::DegeneratePlane)?;
                let u = v.cross(&n);
                Ok(PlaneBasis { u, v, normal: n })
            }
        }
    }
}
