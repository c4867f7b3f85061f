//! Layout validator over one scene snapshot

use super::conflicts::{
    Blocker, LayoutReport, OcclusionReport, OutOfBoundsConflict, OverlapConflict,
};
use crate::config::DEFAULT_EPSILON;
use crate::scene::{scene_graph, EntityId, Scene, SceneError, TransformCache, WorldTransform};
use crate::spatial::{Ray, AABB};

/// Spatial conflict detection bound to a single scene snapshot
///
/// Holds a [`TransformCache`] so repeated queries during one shot list
/// generation resolve each entity once. Every query returns its results in
/// canonical id order; the only `Err` values are structural scene errors.
#[derive(Debug)]
pub struct LayoutValidator<'s> {
    scene: &'s Scene,
    epsilon: f32,
    cache: TransformCache,
    overlaps: Option<Vec<OverlapConflict>>,
}

impl<'s> LayoutValidator<'s> {
    /// Create a validator with the default tolerance
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            epsilon: DEFAULT_EPSILON,
            cache: TransformCache::new(),
            overlaps: None,
        }
    }

    /// Builder pattern: set tolerance in meters
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// The scene under validation
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    /// Resolve a world transform through the cache
    pub fn world_transform(&mut self, entity_id: &EntityId) -> Result<WorldTransform, SceneError> {
        self.cache.world_transform(self.scene, entity_id)
    }

    /// Resolve world bounds through the cache
    pub fn world_bounds(&mut self, entity_id: &EntityId) -> Result<AABB, SceneError> {
        self.cache.world_bounds(self.scene, entity_id)
    }

    /// Every pair of interpenetrating objects, ascending by (first, second)
    ///
    /// An object never conflicts with its ancestors or descendants: a cup on
    /// a tray on a table overlaps neither. Occlusion uses the same rule.
    /// The pairwise pass is quadratic; scenes hold tens of objects.
    pub fn detect_overlaps(&mut self) -> Result<Vec<OverlapConflict>, SceneError> {
        if let Some(overlaps) = &self.overlaps {
            return Ok(overlaps.clone());
        }

        let scene = self.scene;
        let mut objects: Vec<_> = scene.objects.iter().collect();
        objects.sort_by(|a, b| a.id.cmp(&b.id));

        let mut bounds = Vec::with_capacity(objects.len());
        for object in &objects {
            bounds.push(self.world_bounds(&object.id)?);
        }

        let mut overlaps = Vec::new();
        for i in 0..objects.len() {
            for j in (i + 1)..objects.len() {
                let (a, b) = (objects[i], objects[j]);
                if !bounds[i].overlaps(&bounds[j], self.epsilon)
                    || scene_graph::is_ancestor(scene, &a.id, &b.id)?
                    || scene_graph::is_ancestor(scene, &b.id, &a.id)?
                {
                    continue;
                }
                if let Some(intersection) = bounds[i].intersection(&bounds[j]) {
                    overlaps.push(OverlapConflict::new(a.id.clone(), b.id.clone(), intersection));
                }
            }
        }

        log::debug!(
            "Overlap pass on scene {}: {} objects, {} conflicts",
            scene.id,
            objects.len(),
            overlaps.len()
        );
        self.overlaps = Some(overlaps.clone());
        Ok(overlaps)
    }

    /// Overlaps with at least one participant in `ids`, in canonical order
    pub fn overlaps_involving(&mut self, ids: &[EntityId]) -> Result<Vec<OverlapConflict>, SceneError> {
        Ok(self
            .detect_overlaps()?
            .into_iter()
            .filter(|o| ids.iter().any(|id| o.involves(id)))
            .collect())
    }

    /// Objects between `viewpoint` and `subject` along the line of sight
    ///
    /// The sight line runs from the viewpoint's world position to the
    /// subject's world position. An object blocks when the segment enters its
    /// world bounds strictly between the two endpoints. The subject, the
    /// viewpoint, and anything in either one's parent chain (or mounted on
    /// the subject) are never blockers.
    pub fn detect_occlusion(
        &mut self,
        viewpoint: &EntityId,
        subject: &EntityId,
    ) -> Result<OcclusionReport, SceneError> {
        let from = self.world_transform(viewpoint)?.position();
        let to = self.world_transform(subject)?.position();
        let sight = Ray::segment(from, to);
        let length = sight.direction.norm();

        let scene = self.scene;
        let mut blockers = Vec::new();
        for object in &scene.objects {
            if &object.id == subject || &object.id == viewpoint {
                continue;
            }
            if self.related(&object.id, viewpoint, subject)? {
                continue;
            }
            let bounds = self.world_bounds(&object.id)?;
            if let Some((t_enter, _)) = bounds.intersect_ray(&sight) {
                if t_enter > 0.0 && t_enter < 1.0 {
                    blockers.push(Blocker {
                        id: object.id.clone(),
                        distance: t_enter * length,
                    });
                }
            }
        }

        blockers.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.id.cmp(&b.id))
        });

        log::trace!(
            "Line of sight {} -> {}: {} blockers",
            viewpoint,
            subject,
            blockers.len()
        );
        Ok(OcclusionReport {
            occluded: !blockers.is_empty(),
            blockers,
        })
    }

    fn related(&self, object: &EntityId, viewpoint: &EntityId, subject: &EntityId) -> Result<bool, SceneError> {
        Ok(scene_graph::is_ancestor(self.scene, object, subject)?
            || scene_graph::is_ancestor(self.scene, subject, object)?
            || scene_graph::is_ancestor(self.scene, object, viewpoint)?)
    }

    /// True if the entity's world bounds leave the scene extents
    pub fn detect_out_of_bounds(&mut self, entity_id: &EntityId) -> Result<bool, SceneError> {
        Ok(self.out_of_bounds_conflict(entity_id)?.is_some())
    }

    /// Conflict record for an entity outside the scene extents, if it is
    pub fn out_of_bounds_conflict(
        &mut self,
        entity_id: &EntityId,
    ) -> Result<Option<OutOfBoundsConflict>, SceneError> {
        let bounds = self.world_bounds(entity_id)?;
        let allowed = self.scene.extents.expanded(self.epsilon);
        Ok((!allowed.contains_aabb(&bounds)).then(|| OutOfBoundsConflict {
            entity: entity_id.clone(),
            bounds,
        }))
    }

    /// Overlaps plus every out-of-bounds entity, ascending by id
    pub fn validate(&mut self) -> Result<LayoutReport, SceneError> {
        let overlaps = self.detect_overlaps()?;

        let mut ids: Vec<EntityId> = self.scene.entities().map(|e| e.id().clone()).collect();
        ids.sort();

        let mut out_of_bounds = Vec::new();
        for id in &ids {
            if let Some(conflict) = self.out_of_bounds_conflict(id)? {
                out_of_bounds.push(conflict);
            }
        }

        Ok(LayoutReport {
            overlaps,
            out_of_bounds,
        })
    }
}
