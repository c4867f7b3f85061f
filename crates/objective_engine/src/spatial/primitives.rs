//! Primitive spatial shapes and intersection algorithms
//!
//! Axis-aligned boxes and rays with the tests the layout validator needs:
//! box/box overlap, box containment and the parametric ray/box slab test.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create a degenerate box at a single point
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// Smallest box enclosing every point; `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |acc, p| Self {
            min: acc.min.inf(&p),
            max: acc.max.sup(&p),
        }))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True if `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// The eight corners, ordered by (x, y, z) bit pattern
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned hull of this box after an affine transformation
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self
            .corners()
            .map(|c| matrix.transform_point(&Point3::from(c)).coords);
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Smallest box containing both boxes
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies entirely inside this box (boundaries inclusive)
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if this AABB intersects another AABB (touching faces count)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Overlapping region of two boxes (closed intervals); `None` if disjoint
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min: self.min.sup(&other.min),
            max: self.max.inf(&other.max),
        })
    }

    /// True if the boxes interpenetrate by more than `tolerance` on every axis
    ///
    /// Boxes that merely touch (a prop resting on the floor) do not overlap.
    pub fn overlaps(&self, other: &Self, tolerance: f32) -> bool {
        self.intersection(other)
            .is_some_and(|i| i.size().iter().all(|s| *s > tolerance))
    }

    /// Grow the box by `margin` on every side
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Parametric slab test against a ray
    ///
    /// The ray direction is not required to be normalized: the returned
    /// `(t_enter, t_exit)` interval is in units of `ray.direction`, so a
    /// segment from `a` to `b` maps to `t ∈ [0, 1]` when the direction is
    /// `b - a`. Returns `None` when the line misses the box or the box lies
    /// entirely behind the origin.
    ///
    /// Based on "An Efficient and Robust Ray–Box Intersection Algorithm"
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                // Parallel to this slab: either always inside or never
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        }

        if t_exit >= t_enter && t_exit >= 0.0 {
            Some((t_enter, t_exit))
        } else {
            None
        }
    }
}

/// A ray for occlusion tests and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray; left unnormalized for segment rays
    pub direction: Vec3,
}

impl Ray {
    /// Ray with a normalized direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray spanning the segment `from -> to`, so `t = 1` lands on `to`
    pub fn segment(from: Vec3, to: Vec3) -> Self {
        Self {
            origin: from,
            direction: to - from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    fn unit_box() -> AABB {
        AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = unit_box();
        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(aabb2.intersects(&aabb1));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = AABB::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let floor = AABB::new(Vec3::new(-5.0, -0.1, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let table = AABB::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.8, 1.0));
        assert!(floor.intersects(&table));
        assert!(!floor.overlaps(&table, 1e-4));
        let sunk = AABB::new(Vec3::new(-1.0, -0.05, -1.0), Vec3::new(1.0, 0.8, 1.0));
        assert!(floor.overlaps(&sunk, 1e-4));
        let i = floor.intersection(&sunk).unwrap();
        assert_relative_eq!(i.size().y, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_contains_aabb() {
        let outer = AABB::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 5.0, 10.0));
        let lifted = unit_box().transformed(&Transform::from_position(Vec3::new(0.0, 2.0, 0.0)).to_matrix());
        assert!(outer.contains_aabb(&lifted));
        assert!(!outer.contains_aabb(&unit_box()));
    }

    #[test]
    fn test_segment_slab_hit() {
        let ray = Ray::segment(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -10.0));
        let (enter, exit) = unit_box().intersect_ray(&ray).expect("segment crosses box");
        assert_relative_eq!(enter, 0.45, epsilon = 1e-6);
        assert_relative_eq!(exit, 0.55, epsilon = 1e-6);
    }

    #[test]
    fn test_parallel_ray_miss() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_box_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_transformed_rotated_box() {
        let rotated = Transform::identity().with_rotation_euler(0.0, std::f32::consts::FRAC_PI_4, 0.0);
        let hull = unit_box().transformed(&rotated.to_matrix());
        let half_diag = 2.0_f32.sqrt();
        assert_relative_eq!(hull.max.x, half_diag, epsilon = 1e-5);
        assert_relative_eq!(hull.max.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hull.min.z, -half_diag, epsilon = 1e-5);
    }

    #[test]
    fn test_from_points() {
        assert!(AABB::from_points(std::iter::empty()).is_none());
        let b = AABB::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 4.0)]).unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 4.0));
    }
}
