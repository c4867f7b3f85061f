//! Spatial primitives
//!
//! Provides the bounding volumes and rays used for overlap, containment and
//! line-of-sight queries in 3D space.

mod primitives;

pub use primitives::{Ray, AABB};
