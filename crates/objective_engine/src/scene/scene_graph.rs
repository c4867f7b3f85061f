//! Scene graph resolution
//!
//! Resolves world-space transforms and bounding volumes by walking parent
//! links. Hierarchies are stored as ids on each entity; cycles are caught at
//! traversal time with a visited set, so a malformed snapshot produces
//! [`SceneError::Cycle`] instead of looping.
//!
//! World transforms are kept as affine matrices. Matrix products are
//! associative, so resolving through an intermediate ancestor gives the
//! same result as composing the whole chain root-to-leaf.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityRef};
use super::error::SceneError;
use super::model::Scene;
use crate::foundation::math::{Mat4, Point3, Transform, Vec3, FORWARD, RIGHT, UP};
use crate::spatial::AABB;

/// Resolved world-space transform of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    /// Local-to-world affine matrix
    pub matrix: Mat4,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl WorldTransform {
    /// Identity (scene origin)
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// Wrap a local transform
    pub fn from_local(transform: &Transform) -> Self {
        Self {
            matrix: transform.to_matrix(),
        }
    }

    /// `self` as parent, `child` expressed in the parent's space
    #[must_use]
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            matrix: self.matrix * child.matrix,
        }
    }

    /// World-space origin of the entity
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.matrix.m14, self.matrix.m24, self.matrix.m34)
    }

    /// Transform a local point into world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point(&Point3::from(point)).coords
    }

    /// Transform a local direction into world space (not normalized)
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.matrix.transform_vector(&vector)
    }

    /// Unit world direction of the local -Z axis
    ///
    /// Falls back to the world -Z axis for a degenerate matrix, which
    /// validated scenes never contain. Validation also rejects negative
    /// scale, so the axis is never mirrored.
    pub fn facing(&self) -> Vec3 {
        self.axis(FORWARD)
    }

    /// Unit world direction of the local +X axis
    pub fn right(&self) -> Vec3 {
        self.axis(RIGHT)
    }

    /// Unit world direction of the local +Y axis
    pub fn up(&self) -> Vec3 {
        self.axis(UP)
    }

    fn axis(&self, local: Vec3) -> Vec3 {
        self.transform_vector(local)
            .try_normalize(f32::EPSILON)
            .unwrap_or(local)
    }
}

/// The entity followed by each ancestor, leaf to root
///
/// Fails with [`SceneError::UnknownEntity`] if the entity or any ancestor is
/// missing, and [`SceneError::Cycle`] if an ancestor repeats.
pub fn ancestor_chain<'a>(scene: &'a Scene, entity_id: &EntityId) -> Result<Vec<EntityRef<'a>>, SceneError> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&EntityId> = HashSet::new();
    let mut current = scene.require(entity_id)?;

    loop {
        if !visited.insert(current.id()) {
            return Err(SceneError::Cycle {
                entity: entity_id.clone(),
                revisited: current.id().clone(),
            });
        }
        chain.push(current);
        match current.parent() {
            Some(parent_id) => current = scene.require(parent_id)?,
            None => break,
        }
    }

    Ok(chain)
}

/// True if `ancestor` appears anywhere above `entity` in the hierarchy
pub fn is_ancestor(scene: &Scene, ancestor: &EntityId, entity: &EntityId) -> Result<bool, SceneError> {
    Ok(ancestor_chain(scene, entity)?
        .iter()
        .skip(1)
        .any(|e| e.id() == ancestor))
}

/// Compose an entity's local transform with every ancestor, root-to-leaf
pub fn resolve_world_transform(scene: &Scene, entity_id: &EntityId) -> Result<WorldTransform, SceneError> {
    let chain = ancestor_chain(scene, entity_id)?;
    let mut world = WorldTransform::identity();
    for entity in chain.iter().rev() {
        let local = entity.local_transform();
        if local.is_degenerate(0.0) {
            return Err(SceneError::DegenerateTransform(entity.id().clone()));
        }
        world = world.compose(&WorldTransform::from_local(local));
    }
    Ok(world)
}

/// World-space bounding box of an entity
pub fn world_bounds(scene: &Scene, entity_id: &EntityId) -> Result<AABB, SceneError> {
    let world = resolve_world_transform(scene, entity_id)?;
    let entity = scene.require(entity_id)?;
    Ok(entity.local_bounds().transformed(&world.matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use crate::scene::{Camera, SceneObject};
    use crate::optics::LensParameters;
    use approx::assert_relative_eq;

    fn stage() -> Scene {
        Scene::new(
            "stage",
            AABB::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(20.0, 10.0, 20.0)),
        )
    }

    fn rig_scene() -> Scene {
        stage()
            .with_object(SceneObject::new(
                "dolly",
                Transform::from_position(Vec3::new(2.0, 0.0, 0.0))
                    .with_rotation_euler(0.0, PI * 0.5, 0.0),
                Vec3::new(1.0, 0.5, 2.0),
            ))
            .with_object(
                SceneObject::new(
                    "arm",
                    Transform::from_position(Vec3::new(0.0, 1.0, 0.0))
                        .with_scale(Vec3::new(2.0, 1.0, 1.0)),
                    Vec3::new(0.2, 0.2, 0.2),
                )
                .with_parent("dolly"),
            )
            .with_camera(
                Camera::new(
                    "cam",
                    Transform::from_position(Vec3::new(0.5, 0.5, 0.0))
                        .with_rotation_euler(0.3, 0.1, 0.0),
                    LensParameters::default(),
                )
                .with_parent("arm"),
            )
    }

    #[test]
    fn test_root_transform_is_local() {
        let scene = rig_scene();
        let world = resolve_world_transform(&scene, &"dolly".into()).unwrap();
        assert_relative_eq!(world.position(), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_child_inherits_parent_rotation() {
        let scene = rig_scene();
        let arm = resolve_world_transform(&scene, &"arm".into()).unwrap();
        assert_relative_eq!(arm.position(), Vec3::new(2.0, 1.0, 0.0), epsilon = 1e-5);
        // Dolly yawed +90 degrees about Y: local -Z now points to world -X
        assert_relative_eq!(arm.facing(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_composition_is_associative() {
        let scene = rig_scene();
        let dolly = WorldTransform::from_local(&scene.objects[0].transform);
        let arm = WorldTransform::from_local(&scene.objects[1].transform);
        let cam = WorldTransform::from_local(&scene.cameras[0].transform);

        let left = dolly.compose(&arm).compose(&cam);
        let right = dolly.compose(&arm.compose(&cam));
        let resolved = resolve_world_transform(&scene, &"cam".into()).unwrap();

        assert_relative_eq!(left.matrix, right.matrix, epsilon = 1e-5);
        assert_relative_eq!(resolved.matrix, left.matrix, epsilon = 1e-5);

        // Resolving via the intermediate ancestor matches direct composition
        let via_arm = resolve_world_transform(&scene, &"arm".into()).unwrap().compose(&cam);
        assert_relative_eq!(via_arm.matrix, resolved.matrix, epsilon = 1e-5);
    }

    #[test]
    fn test_cycle_detected() {
        let scene = stage()
            .with_object(SceneObject::new("a", Transform::identity(), Vec3::new(1.0, 1.0, 1.0)).with_parent("b"))
            .with_object(SceneObject::new("b", Transform::identity(), Vec3::new(1.0, 1.0, 1.0)).with_parent("a"));
        assert!(matches!(
            resolve_world_transform(&scene, &"a".into()),
            Err(SceneError::Cycle { .. })
        ));
        assert!(matches!(scene.validate(), Err(SceneError::Cycle { .. })));
    }

    #[test]
    fn test_self_parent_is_cycle() {
        let scene = stage().with_object(
            SceneObject::new("loop", Transform::identity(), Vec3::new(1.0, 1.0, 1.0)).with_parent("loop"),
        );
        assert_eq!(
            resolve_world_transform(&scene, &"loop".into()),
            Err(SceneError::Cycle {
                entity: "loop".into(),
                revisited: "loop".into()
            })
        );
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(
            resolve_world_transform(&stage(), &"nobody".into()),
            Err(SceneError::UnknownEntity("nobody".into()))
        );
    }

    #[test]
    fn test_degenerate_ancestor() {
        let mut scene = rig_scene();
        scene.objects[0].transform.scale = Vec3::new(0.0, 1.0, 1.0);
        assert_eq!(
            resolve_world_transform(&scene, &"cam".into()),
            Err(SceneError::DegenerateTransform("dolly".into()))
        );
    }

    #[test]
    fn test_world_bounds_scaled_child() {
        let scene = rig_scene();
        let bounds = world_bounds(&scene, &"arm".into()).unwrap();
        // 0.2 box scaled 2x along local X, which the dolly's yaw maps onto world Z
        assert_relative_eq!(bounds.size(), Vec3::new(0.2, 0.2, 0.4), epsilon = 1e-5);
        assert_relative_eq!(bounds.center(), Vec3::new(2.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_is_ancestor() {
        let scene = rig_scene();
        assert!(is_ancestor(&scene, &"dolly".into(), &"cam".into()).unwrap());
        assert!(!is_ancestor(&scene, &"cam".into(), &"dolly".into()).unwrap());
        assert!(!is_ancestor(&scene, &"cam".into(), &"cam".into()).unwrap());
    }
}
