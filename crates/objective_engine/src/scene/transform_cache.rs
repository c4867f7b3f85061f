//! Memoized world-transform resolution
//!
//! Entries are keyed by (scene id, scene version, entity id). The cache only
//! ever holds one (scene id, version) generation: a lookup against any other
//! snapshot drops every entry before resolving. Cached values are never
//! updated in place.

use std::collections::HashMap;

use super::entity::EntityId;
use super::error::SceneError;
use super::model::{Scene, SceneId};
use super::scene_graph::{self, WorldTransform};
use crate::spatial::AABB;

/// Caller-owned cache of resolved world transforms and bounds
#[derive(Debug, Default)]
pub struct TransformCache {
    generation: Option<(SceneId, u64)>,
    transforms: HashMap<EntityId, WorldTransform>,
    bounds: HashMap<EntityId, AABB>,
    hits: u64,
    misses: u64,
}

impl TransformCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene id and version the current entries belong to
    pub fn generation(&self) -> Option<(&SceneId, u64)> {
        self.generation.as_ref().map(|(id, v)| (id, *v))
    }

    /// Number of cached transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.generation = None;
        self.transforms.clear();
        self.bounds.clear();
    }

    fn sync_generation(&mut self, scene: &Scene) {
        let current = (scene.id.clone(), scene.version);
        if self.generation.as_ref() != Some(&current) {
            if let Some((old_id, old_version)) = &self.generation {
                log::trace!(
                    "Transform cache invalidated: {}@{} -> {}@{}",
                    old_id,
                    old_version,
                    scene.id,
                    scene.version
                );
            }
            self.transforms.clear();
            self.bounds.clear();
            self.generation = Some(current);
        }
    }

    /// Cached [`scene_graph::resolve_world_transform`]
    pub fn world_transform(&mut self, scene: &Scene, entity_id: &EntityId) -> Result<WorldTransform, SceneError> {
        self.sync_generation(scene);
        if let Some(world) = self.transforms.get(entity_id) {
            self.hits += 1;
            return Ok(*world);
        }
        self.misses += 1;
        let world = scene_graph::resolve_world_transform(scene, entity_id)?;
        self.transforms.insert(entity_id.clone(), world);
        Ok(world)
    }

    /// Cached [`scene_graph::world_bounds`]
    pub fn world_bounds(&mut self, scene: &Scene, entity_id: &EntityId) -> Result<AABB, SceneError> {
        let world = self.world_transform(scene, entity_id)?;
        if let Some(bounds) = self.bounds.get(entity_id) {
            return Ok(*bounds);
        }
        let bounds = scene
            .require(entity_id)?
            .local_bounds()
            .transformed(&world.matrix);
        self.bounds.insert(entity_id.clone(), bounds);
        Ok(bounds)
    }
}
