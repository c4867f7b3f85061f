//! Scene provider seam
//!
//! The persistence layer owns storage; the engine only asks it for
//! snapshots. [`InMemorySceneSource`] backs tests and embedded hosts.

use std::collections::BTreeMap;

use super::error::SceneError;
use super::model::{Scene, SceneId};

/// Supplies scene snapshots to the engine
pub trait SceneSource {
    /// Error type of the backing store
    type Error: std::error::Error;

    /// Load the current snapshot of a scene
    fn load_scene(&self, scene_id: &SceneId) -> Result<Scene, Self::Error>;
}

/// Errors from [`InMemorySceneSource`]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// No scene stored under this id
    #[error("Scene not found: {0}")]
    NotFound(SceneId),

    /// The stored snapshot failed validation
    #[error("Scene {scene} is malformed: {source}")]
    Malformed {
        /// Scene id
        scene: SceneId,
        /// Validation failure
        #[source]
        source: SceneError,
    },

    /// A commit was attempted against an outdated version
    #[error("Version conflict on scene {scene}: {source}")]
    Conflict {
        /// Scene id
        scene: SceneId,
        /// Version mismatch
        #[source]
        source: SceneError,
    },

    /// The stored version cannot be advanced any further
    #[error("Scene {scene} has exhausted its version counter at {version}")]
    VersionExhausted {
        /// Scene id
        scene: SceneId,
        /// Version the commit was read at
        version: u64,
    },
}

/// Map-backed scene store with optimistic version checks
#[derive(Debug, Default, Clone)]
pub struct InMemorySceneSource {
    scenes: BTreeMap<SceneId, Scene>,
}

impl InMemorySceneSource {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a scene as-is
    pub fn insert(&mut self, scene: Scene) {
        self.scenes.insert(scene.id.clone(), scene);
    }

    /// Commit an edited scene read at `read_version`
    ///
    /// Fails with [`SourceError::Conflict`] if someone committed in between,
    /// and [`SourceError::VersionExhausted`] at `u64::MAX`. On success the
    /// stored snapshot gets `read_version + 1`.
    pub fn commit(&mut self, mut scene: Scene, read_version: u64) -> Result<u64, SourceError> {
        if let Some(stored) = self.scenes.get(&scene.id) {
            stored
                .ensure_version(read_version)
                .map_err(|source| SourceError::Conflict {
                    scene: scene.id.clone(),
                    source,
                })?;
        }
        let version = read_version
            .checked_add(1)
            .ok_or_else(|| SourceError::VersionExhausted {
                scene: scene.id.clone(),
                version: read_version,
            })?;
        scene.version = version;
        self.insert(scene);
        Ok(version)
    }
}

impl SceneSource for InMemorySceneSource {
    type Error = SourceError;

    fn load_scene(&self, scene_id: &SceneId) -> Result<Scene, SourceError> {
        let scene = self
            .scenes
            .get(scene_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(scene_id.clone()))?;
        scene.validate().map_err(|source| SourceError::Malformed {
            scene: scene_id.clone(),
            source,
        })?;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::spatial::AABB;

    fn empty_scene() -> Scene {
        Scene::new("s1", AABB::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
    }

    #[test]
    fn test_load_missing_scene() {
        let source = InMemorySceneSource::new();
        assert_eq!(
            source.load_scene(&"s1".into()),
            Err(SourceError::NotFound("s1".into()))
        );
    }

    #[test]
    fn test_commit_bumps_version() {
        let mut source = InMemorySceneSource::new();
        source.insert(empty_scene());
        let loaded = source.load_scene(&"s1".into()).unwrap();
        assert_eq!(source.commit(loaded, 0), Ok(1));
        assert_eq!(source.load_scene(&"s1".into()).unwrap().version, 1);
    }

    #[test]
    fn test_stale_commit_conflicts() {
        let mut source = InMemorySceneSource::new();
        source.insert(empty_scene());
        let first = source.load_scene(&"s1".into()).unwrap();
        let second = first.clone();
        source.commit(first, 0).unwrap();
        assert!(matches!(
            source.commit(second, 0),
            Err(SourceError::Conflict { .. })
        ));
    }

    #[test]
    fn test_commit_at_max_version_fails() {
        let mut source = InMemorySceneSource::new();
        source.insert(empty_scene().with_version(u64::MAX));
        let loaded = source.load_scene(&"s1".into()).unwrap();
        assert_eq!(
            source.commit(loaded, u64::MAX),
            Err(SourceError::VersionExhausted {
                scene: "s1".into(),
                version: u64::MAX,
            })
        );
        // The stored snapshot is untouched
        assert_eq!(source.load_scene(&"s1".into()).unwrap().version, u64::MAX);
    }
}
