//! Scene snapshot container

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Camera, EntityId, EntityRef, Light, LightKind, SceneObject};
use super::error::SceneError;
use super::scene_graph;
use crate::spatial::AABB;

/// Identifier of a scene
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    /// Create a scene id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Immutable snapshot of a set as loaded by the persistence layer
///
/// The engine never mutates a scene. The persistence layer bumps
/// [`Scene::version`] on every committed edit; results computed from a
/// snapshot carry the version they were computed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene id
    pub id: SceneId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Owning project, if the persistence layer tracks one
    #[serde(default)]
    pub project_id: Option<String>,
    /// Optimistic concurrency token
    pub version: u64,
    /// Declared stage extents; everything should fit inside
    pub extents: AABB,
    /// Set objects
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Cameras
    #[serde(default)]
    pub cameras: Vec<Camera>,
    /// Lights
    #[serde(default)]
    pub lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene at version 0
    pub fn new(id: impl Into<SceneId>, extents: AABB) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            project_id: None,
            version: 0,
            extents,
            objects: Vec::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Builder pattern: set version
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Builder pattern: add an object
    #[must_use]
    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Builder pattern: add a camera
    #[must_use]
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.cameras.push(camera);
        self
    }

    /// Builder pattern: add a light
    #[must_use]
    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Iterate every entity: objects, then cameras, then lights
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.objects
            .iter()
            .map(EntityRef::Object)
            .chain(self.cameras.iter().map(EntityRef::Camera))
            .chain(self.lights.iter().map(EntityRef::Light))
    }

    /// Total entity count
    pub fn entity_count(&self) -> usize {
        self.objects.len() + self.cameras.len() + self.lights.len()
    }

    /// Look up any entity by id
    ///
    /// Linear search; scenes hold tens of entities.
    pub fn entity(&self, id: &EntityId) -> Option<EntityRef<'_>> {
        self.entities().find(|e| e.id() == id)
    }

    /// Look up any entity, failing with [`SceneError::UnknownEntity`]
    pub fn require(&self, id: &EntityId) -> Result<EntityRef<'_>, SceneError> {
        self.entity(id)
            .ok_or_else(|| SceneError::UnknownEntity(id.clone()))
    }

    /// Look up an object by id
    pub fn object(&self, id: &EntityId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    /// Look up a camera by id
    pub fn camera(&self, id: &EntityId) -> Option<&Camera> {
        self.cameras.iter().find(|c| &c.id == id)
    }

    /// Look up a light by id
    pub fn light(&self, id: &EntityId) -> Option<&Light> {
        self.lights.iter().find(|l| &l.id == id)
    }

    /// Fail with [`SceneError::StaleVersion`] unless this snapshot is at `expected`
    pub fn ensure_version(&self, expected: u64) -> Result<(), SceneError> {
        if self.version == expected {
            Ok(())
        } else {
            Err(SceneError::StaleVersion {
                expected,
                found: self.version,
            })
        }
    }

    /// Defensive structural validation of the whole snapshot
    ///
    /// Checks, in order: scene extents, unique ids, per-entity data ranges,
    /// parent references and acyclicity. Camera lenses are not checked here.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.extents.is_valid() {
            return Err(SceneError::InvalidEntity {
                entity: EntityId::new(self.id.0.clone()),
                reason: "scene extents are inverted".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(self.entity_count());
        for entity in self.entities() {
            if !seen.insert(entity.id()) {
                return Err(SceneError::DuplicateEntity(entity.id().clone()));
            }
        }

        for entity in self.entities() {
            validate_entity(entity)?;
        }

        for entity in self.entities() {
            scene_graph::ancestor_chain(self, entity.id())?;
        }

        log::trace!(
            "Scene {} v{} validated ({} entities)",
            self.id,
            self.version,
            self.entity_count()
        );
        Ok(())
    }
}

fn invalid(entity: &EntityId, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidEntity {
        entity: entity.clone(),
        reason: reason.into(),
    }
}

fn validate_entity(entity: EntityRef<'_>) -> Result<(), SceneError> {
    let id = entity.id();
    let transform = entity.local_transform();
    if transform.is_degenerate(0.0) {
        return Err(SceneError::DegenerateTransform(id.clone()));
    }
    if transform.scale.iter().any(|s| *s < 0.0) {
        return Err(invalid(id, "scale must be positive; mirrored transforms are not supported"));
    }
    if !transform.position.iter().all(|v| v.is_finite()) {
        return Err(invalid(id, "position is not finite"));
    }

    match entity {
        EntityRef::Object(object) => {
            if !object.dimensions.iter().all(|d| d.is_finite() && *d > 0.0) {
                return Err(invalid(id, "bounding dimensions must be positive"));
            }
        }
        // Lens ranges are checked per shot and reported as diagnostics
        EntityRef::Camera(_) => {}
        EntityRef::Light(light) => {
            if !(light.intensity.is_finite() && light.intensity >= 0.0) {
                return Err(invalid(id, "intensity must be non-negative"));
            }
            match light.kind {
                LightKind::Point => {}
                LightKind::Spot { beam_angle_deg } => {
                    if !(0.0..=180.0).contains(&beam_angle_deg) {
                        return Err(invalid(id, "spot beam angle must be within [0, 180] degrees"));
                    }
                }
                LightKind::Area { width_m, height_m } => {
                    if !(width_m > 0.0 && height_m > 0.0) {
                        return Err(invalid(id, "area light extents must be positive"));
                    }
                }
            }
        }
    }
    Ok(())
}
