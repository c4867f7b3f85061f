//! Scene entities: set objects, cameras and lights
//!
//! Pure data. Parent links are ids resolved against the owning [`Scene`],
//! never live references, so a snapshot can be cloned, serialized and shared
//! across threads freely.
//!
//! [`Scene`]: super::Scene

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Transform, Vec3};
use crate::optics::LensParameters;
use crate::spatial::AABB;

/// Identifier of an entity, unique within a scene
///
/// Ordered lexicographically; every deterministic ordering in the engine
/// falls back to this ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Broad category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Set piece, prop or actor mark
    Object,
    /// Camera
    Camera,
    /// Light
    Light,
}

/// A physical object on the set (prop, set piece, actor mark)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique id
    pub id: EntityId,
    /// Human readable label
    #[serde(default)]
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Full width/height/depth of the local bounding box in meters,
    /// centered on the local origin
    pub dimensions: Vec3,
    /// Optional parent entity
    #[serde(default)]
    pub parent: Option<EntityId>,
}

impl SceneObject {
    /// Create a root object
    pub fn new(id: impl Into<EntityId>, transform: Transform, dimensions: Vec3) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            transform,
            dimensions,
            parent: None,
        }
    }

    /// Builder pattern: attach to a parent
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder pattern: set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Local-space bounding box
    pub fn local_bounds(&self) -> AABB {
        AABB::from_center_extents(Vec3::zeros(), self.dimensions * 0.5)
    }
}

/// A camera placed on the set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Unique id
    pub id: EntityId,
    /// Human readable label
    #[serde(default)]
    pub name: String,
    /// Transform relative to the parent; the camera looks down its local -Z
    pub transform: Transform,
    /// Lens and sensor
    pub lens: LensParameters,
    /// Optional parent (dolly, crane, rig object)
    #[serde(default)]
    pub parent: Option<EntityId>,
}

impl Camera {
    /// Create a root camera
    pub fn new(id: impl Into<EntityId>, transform: Transform, lens: LensParameters) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            transform,
            lens,
            parent: None,
        }
    }

    /// Builder pattern: mount on a parent
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Closed set of light types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Omnidirectional bulb
    Point,
    /// Cone of light along the local -Z axis
    Spot {
        /// Full beam angle in degrees, within [0, 180]
        beam_angle_deg: f32,
    },
    /// Rectangular soft source (panel, softbox) facing local -Z
    Area {
        /// Panel width in meters
        width_m: f32,
        /// Panel height in meters
        height_m: f32,
    },
}

/// A light placed on the set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Unique id
    pub id: EntityId,
    /// Human readable label
    #[serde(default)]
    pub name: String,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Light type
    pub kind: LightKind,
    /// Intensity (>= 0), unitless relative output
    pub intensity: f32,
    /// Optional parent (stand, rig object)
    #[serde(default)]
    pub parent: Option<EntityId>,
}

impl Light {
    /// Create a root light
    pub fn new(id: impl Into<EntityId>, transform: Transform, kind: LightKind, intensity: f32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            transform,
            kind,
            intensity,
            parent: None,
        }
    }

    /// Builder pattern: mount on a parent
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Whether the light has a meaningful aim direction
    pub fn is_directional(&self) -> bool {
        match self.kind {
            LightKind::Point => false,
            LightKind::Spot { .. } | LightKind::Area { .. } => true,
        }
    }

    /// Local-space bounding box: a point for point/spot lights, the panel for area lights
    pub fn local_bounds(&self) -> AABB {
        match self.kind {
            LightKind::Point | LightKind::Spot { .. } => AABB::from_point(Vec3::zeros()),
            LightKind::Area { width_m, height_m } => AABB::from_center_extents(
                Vec3::zeros(),
                Vec3::new(width_m * 0.5, height_m * 0.5, 0.0),
            ),
        }
    }
}

/// Borrowed view of any entity in a scene
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    /// A set object
    Object(&'a SceneObject),
    /// A camera
    Camera(&'a Camera),
    /// A light
    Light(&'a Light),
}

impl<'a> EntityRef<'a> {
    /// Entity id
    pub fn id(&self) -> &'a EntityId {
        match self {
            Self::Object(o) => &o.id,
            Self::Camera(c) => &c.id,
            Self::Light(l) => &l.id,
        }
    }

    /// Display name
    pub fn name(&self) -> &'a str {
        match self {
            Self::Object(o) => &o.name,
            Self::Camera(c) => &c.name,
            Self::Light(l) => &l.name,
        }
    }

    /// Entity category
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Object(_) => EntityKind::Object,
            Self::Camera(_) => EntityKind::Camera,
            Self::Light(_) => EntityKind::Light,
        }
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &'a Transform {
        match self {
            Self::Object(o) => &o.transform,
            Self::Camera(c) => &c.transform,
            Self::Light(l) => &l.transform,
        }
    }

    /// Parent id, if any
    pub fn parent(&self) -> Option<&'a EntityId> {
        match self {
            Self::Object(o) => o.parent.as_ref(),
            Self::Camera(c) => c.parent.as_ref(),
            Self::Light(l) => l.parent.as_ref(),
        }
    }

    /// Local-space bounding box; cameras occupy a single point
    pub fn local_bounds(&self) -> AABB {
        match self {
            Self::Object(o) => o.local_bounds(),
            Self::Camera(_) => AABB::from_point(Vec3::zeros()),
            Self::Light(l) => l.local_bounds(),
        }
    }
}
