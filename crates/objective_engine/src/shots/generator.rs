//! Shot list generation

use super::{Diagnostic, FramingMode, Shot, ShotList, ShotListError, ShotMetrics, ShotRequest};
use crate::config::{ConfigError, PlannerConfig};
use crate::foundation::math::{utils, Vec3};
use crate::layout::{LayoutValidator, OcclusionConflict};
use crate::optics::{self, FrameAxis, GeometryError, LensParameters};
use crate::scene::{Camera, EntityId, EntityRef, Scene, WorldTransform};
use crate::spatial::AABB;

/// A request whose references have been checked against the scene
struct ResolvedRequest<'a> {
    request: &'a ShotRequest,
    camera: &'a Camera,
    subjects: Vec<EntityId>,
}

/// Turns shot requests into an ordered, diagnosed [`ShotList`]
///
/// Generation is a pure function of the scene snapshot, the requests and
/// the configuration: identical input gives bit-identical output.
#[derive(Debug, Clone, Default)]
pub struct ShotListGenerator {
    config: PlannerConfig,
}

impl ShotListGenerator {
    /// Create a generator after validating the configuration
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate the shot list for `requests` against `scene`
    ///
    /// Structural problems (malformed scene, unknown or mistyped ids, empty
    /// or duplicate requests, ambiguous ordering) abort with an error and no
    /// partial list. Optical failures and layout conflicts are attached to
    /// the affected shot as [`Diagnostic`]s.
    pub fn generate(&self, scene: &Scene, requests: &[ShotRequest]) -> Result<ShotList, ShotListError> {
        log::debug!(
            "Generating shot list for scene {} v{} ({} requests)",
            scene.id,
            scene.version,
            requests.len()
        );
        scene.validate()?;

        let mut ordered: Vec<&ShotRequest> = requests.iter().collect();
        ordered.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));

        check_duplicates(&ordered)?;
        let resolved = ordered
            .iter()
            .map(|request| resolve_request(scene, request))
            .collect::<Result<Vec<_>, _>>()?;
        check_ambiguity(&ordered)?;

        let mut validator = LayoutValidator::new(scene).with_epsilon(self.config.epsilon);
        let mut shots = Vec::with_capacity(resolved.len());
        for request in &resolved {
            shots.push(self.build_shot(&mut validator, request)?);
        }

        log::debug!(
            "Shot list for scene {} complete: {} shots, {} with diagnostics",
            scene.id,
            shots.len(),
            shots.iter().filter(|s| !s.is_clean()).count()
        );
        Ok(ShotList {
            scene_id: scene.id.clone(),
            scene_version: scene.version,
            shots,
        })
    }

    fn build_shot(
        &self,
        validator: &mut LayoutValidator<'_>,
        resolved: &ResolvedRequest<'_>,
    ) -> Result<Shot, ShotListError> {
        let request = resolved.request;
        let camera_world = validator.world_transform(&request.camera)?;

        let mut group: Option<AABB> = None;
        for subject in &resolved.subjects {
            let bounds = validator.world_bounds(subject)?;
            group = Some(group.map_or(bounds, |g| g.union(&bounds)));
        }
        // resolve_request guarantees at least one subject
        let group = group.ok_or_else(|| ShotListError::EmptySubjects(request.id.clone()))?;

        let mut diagnostics = Vec::new();
        let metrics = match solve(&resolved.camera.lens, &camera_world, &group, request.framing) {
            Ok(metrics) => {
                if matches!(request.framing, FramingMode::AsPlaced { .. }) && metrics.framing_ratio > 1.0 {
                    diagnostics.push(Diagnostic::FrameOverflow {
                        ratio: metrics.framing_ratio,
                    });
                }
                Some(metrics)
            }
            Err(err) => {
                log::warn!("Shot {}: {}", request.id, err);
                diagnostics.push(Diagnostic::Geometry(err));
                None
            }
        };

        if self.config.check_overlaps {
            for overlap in validator.overlaps_involving(&resolved.subjects)? {
                diagnostics.push(Diagnostic::Overlap(overlap));
            }
        }

        if self.config.check_occlusion {
            for subject in &resolved.subjects {
                let report = validator.detect_occlusion(&request.camera, subject)?;
                if report.occluded {
                    diagnostics.push(Diagnostic::Occlusion(OcclusionConflict {
                        camera: request.camera.clone(),
                        subject: subject.clone(),
                        blockers: report.blockers,
                    }));
                }
            }
        }

        if self.config.check_bounds {
            for id in std::iter::once(&request.camera).chain(&resolved.subjects) {
                if let Some(conflict) = validator.out_of_bounds_conflict(id)? {
                    diagnostics.push(Diagnostic::OutOfBounds(conflict));
                }
            }
        }

        log::debug!(
            "Shot {} ({} -> {:?}): hfov {:.1} deg, {} diagnostics",
            request.id,
            request.camera,
            resolved.subjects,
            metrics.as_ref().map_or(0.0, |m| utils::rad_to_deg(m.horizontal_fov)),
            diagnostics.len()
        );

        Ok(Shot {
            request_id: request.id.clone(),
            camera: request.camera.clone(),
            subjects: resolved.subjects.clone(),
            framing: request.framing,
            priority: request.priority,
            creation_order: request.creation_order,
            metrics,
            diagnostics,
        })
    }
}

/// Generate with the default configuration
pub fn generate_shot_list(scene: &Scene, requests: &[ShotRequest]) -> Result<ShotList, ShotListError> {
    ShotListGenerator::default().generate(scene, requests)
}

fn check_duplicates(ordered: &[&ShotRequest]) -> Result<(), ShotListError> {
    let mut ids: Vec<&str> = ordered.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    match ids.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(ShotListError::DuplicateRequest(pair[0].to_string())),
        None => Ok(()),
    }
}

fn check_ambiguity(ordered: &[&ShotRequest]) -> Result<(), ShotListError> {
    let tie = ordered.windows(2).find(|pair| {
        pair[0].priority == pair[1].priority && pair[0].creation_order == pair[1].creation_order
    });
    match tie {
        Some(pair) => Err(ShotListError::AmbiguousOrdering {
            first: pair[0].id.clone(),
            second: pair[1].id.clone(),
            priority: pair[0].priority,
            creation_order: pair[0].creation_order,
        }),
        None => Ok(()),
    }
}

fn resolve_request<'a>(scene: &'a Scene, request: &'a ShotRequest) -> Result<ResolvedRequest<'a>, ShotListError> {
    let camera = match scene.require(&request.camera)? {
        EntityRef::Camera(camera) => camera,
        EntityRef::Object(_) | EntityRef::Light(_) => {
            return Err(ShotListError::NotACamera {
                request: request.id.clone(),
                entity: request.camera.clone(),
            })
        }
    };

    if request.subjects.is_empty() {
        return Err(ShotListError::EmptySubjects(request.id.clone()));
    }

    let mut subjects = request.subjects.clone();
    subjects.sort();
    subjects.dedup();
    for subject in &subjects {
        match scene.require(subject)? {
            EntityRef::Object(_) => {}
            EntityRef::Camera(_) | EntityRef::Light(_) => {
                return Err(ShotListError::NotAnObject {
                    request: request.id.clone(),
                    entity: subject.clone(),
                })
            }
        }
    }

    Ok(ResolvedRequest {
        request,
        camera,
        subjects,
    })
}

/// Extent of the group box measured along a unit camera axis
fn extent_along(bounds: &AABB, axis: Vec3) -> f32 {
    let (lo, hi) = bounds
        .corners()
        .iter()
        .map(|c| c.dot(&axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
    hi - lo
}

fn solve(
    lens: &LensParameters,
    camera: &WorldTransform,
    group: &AABB,
    framing: FramingMode,
) -> Result<ShotMetrics, GeometryError> {
    lens.validate()?;
    let horizontal_fov = lens.horizontal_fov()?;
    let vertical_fov = lens.vertical_fov()?;

    let axis = framing.axis();
    let measure_along = match axis {
        FrameAxis::Horizontal => camera.right(),
        FrameAxis::Vertical => camera.up(),
    };
    let subject_size = extent_along(group, measure_along);
    let sensor = lens.sensor_dimension(axis);

    let position = camera.position();
    let facing = camera.facing();
    let center = group.center();

    match framing {
        FramingMode::TargetFraction { fraction, .. } => {
            let distance = optics::required_distance(lens.focal_length_mm, sensor, subject_size, fraction)?;
            optics::ensure_in_front(position, facing, center)?;
            Ok(ShotMetrics {
                distance,
                horizontal_fov,
                vertical_fov,
                framing_ratio: fraction,
                subject_size,
                suggested_position: Some(center - facing * distance),
            })
        }
        FramingMode::AsPlaced { .. } => {
            let depth = optics::ensure_in_front(position, facing, center)?;
            let framing_ratio = optics::framing_ratio(depth, lens.focal_length_mm, sensor, subject_size)?;
            Ok(ShotMetrics {
                distance: depth,
                horizontal_fov,
                vertical_fov,
                framing_ratio,
                subject_size,
                suggested_position: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::scene::{Light, LightKind, SceneError, SceneObject};
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn stage() -> Scene {
        Scene::new(
            "shots",
            AABB::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(20.0, 8.0, 20.0)),
        )
        .with_version(7)
    }

    fn actor(id: &str, x: f32, z: f32) -> SceneObject {
        SceneObject::new(
            id,
            Transform::from_position(Vec3::new(x, 1.0, z)),
            Vec3::new(2.0, 2.0, 0.5),
        )
    }

    fn camera(id: &str, z: f32) -> Camera {
        Camera::new(
            id,
            Transform::from_position(Vec3::new(0.0, 1.0, z)),
            LensParameters::full_frame(50.0),
        )
    }

    fn basic_scene() -> Scene {
        stage()
            .with_object(actor("hero", 0.0, 0.0))
            .with_camera(camera("a-cam", 10.0))
            .with_camera(camera("b-cam", 6.0))
    }

    #[test]
    fn test_target_fraction_round_trip() {
        let scene = basic_scene();
        let request = ShotRequest::new("wide", "a-cam", ["hero"]).with_target_fraction(0.8);
        let list = generate_shot_list(&scene, &[request]).unwrap();
        assert_eq!(list.scene_version, 7);

        let shot = &list.shots[0];
        assert!(shot.is_clean(), "{:?}", shot.diagnostics);
        let metrics = shot.metrics.as_ref().unwrap();
        assert_relative_eq!(metrics.subject_size, 2.0, epsilon = 1e-5);
        assert_relative_eq!(metrics.distance, 100.0 / 28.8, epsilon = 1e-4);

        // Moving the camera to the suggested spot frames the subject at 0.8
        let suggested = metrics.suggested_position.unwrap();
        assert_relative_eq!(suggested, Vec3::new(0.0, 1.0, metrics.distance), epsilon = 1e-4);
        let ratio = optics::framing_ratio(metrics.distance, 50.0, 36.0, metrics.subject_size).unwrap();
        assert_relative_eq!(ratio, 0.8, epsilon = 1e-5);

        let moved = stage()
            .with_object(actor("hero", 0.0, 0.0))
            .with_camera(Camera::new(
                "a-cam",
                Transform::from_position(suggested),
                LensParameters::full_frame(50.0),
            ));
        let as_placed = generate_shot_list(&moved, &[ShotRequest::new("check", "a-cam", ["hero"])]).unwrap();
        let placed = as_placed.shots[0].metrics.as_ref().unwrap();
        assert_relative_eq!(placed.framing_ratio, 0.8, epsilon = 1e-4);
    }

    #[test]
    fn test_output_order_independent_of_input_order() {
        let scene = basic_scene();
        let requests = vec![
            ShotRequest::new("c", "a-cam", ["hero"]).with_priority(2).with_creation_order(1),
            ShotRequest::new("a", "b-cam", ["hero"]).with_priority(1).with_creation_order(5),
            ShotRequest::new("b", "a-cam", ["hero"]).with_priority(1).with_creation_order(3),
            ShotRequest::new("d", "b-cam", ["hero"]).with_priority(-1).with_creation_order(9),
        ];
        let list = generate_shot_list(&scene, &requests).unwrap();
        assert_eq!(list.request_ids(), vec!["d", "b", "a", "c"]);

        let mut reversed = requests.clone();
        reversed.reverse();
        assert_eq!(generate_shot_list(&scene, &reversed).unwrap(), list);
    }

    #[test]
    fn test_tie_is_ambiguous() {
        let scene = basic_scene();
        let requests = vec![
            ShotRequest::new("two", "a-cam", ["hero"]).with_priority(1).with_creation_order(1),
            ShotRequest::new("one", "b-cam", ["hero"]).with_priority(1).with_creation_order(1),
        ];
        assert_eq!(
            generate_shot_list(&scene, &requests),
            Err(ShotListError::AmbiguousOrdering {
                first: "one".to_string(),
                second: "two".to_string(),
                priority: 1,
                creation_order: 1,
            })
        );
    }

    #[test]
    fn test_unknown_ids_abort() {
        let scene = basic_scene();
        let requests = vec![
            ShotRequest::new("fine", "a-cam", ["hero"]).with_creation_order(1),
            ShotRequest::new("broken", "ghost-cam", ["hero"]).with_creation_order(2),
        ];
        assert_eq!(
            generate_shot_list(&scene, &requests),
            Err(ShotListError::Scene(SceneError::UnknownEntity("ghost-cam".into())))
        );

        let missing_subject = [ShotRequest::new("s", "a-cam", ["hero", "extra"])];
        assert_eq!(
            generate_shot_list(&scene, &missing_subject),
            Err(ShotListError::Scene(SceneError::UnknownEntity("extra".into())))
        );
    }

    #[test]
    fn test_reference_kinds_checked() {
        let scene = basic_scene().with_light(Light::new("key", Transform::identity(), LightKind::Point, 1.0));

        assert!(matches!(
            generate_shot_list(&scene, &[ShotRequest::new("r", "hero", ["hero"])]),
            Err(ShotListError::NotACamera { .. })
        ));
        assert!(matches!(
            generate_shot_list(&scene, &[ShotRequest::new("r", "a-cam", ["key"])]),
            Err(ShotListError::NotAnObject { .. })
        ));
        assert_eq!(
            generate_shot_list(&scene, &[ShotRequest::new("r", "a-cam", Vec::<&str>::new())]),
            Err(ShotListError::EmptySubjects("r".to_string()))
        );
        let dup = [
            ShotRequest::new("r", "a-cam", ["hero"]).with_creation_order(1),
            ShotRequest::new("r", "b-cam", ["hero"]).with_creation_order(2),
        ];
        assert_eq!(
            generate_shot_list(&scene, &dup),
            Err(ShotListError::DuplicateRequest("r".to_string()))
        );
    }

    #[test]
    fn test_subject_behind_camera_is_a_diagnostic() {
        let turned = Camera::new(
            "turned",
            Transform::from_position(Vec3::new(0.0, 1.0, 5.0)).with_rotation_euler(0.0, PI, 0.0),
            LensParameters::default(),
        );
        let scene = basic_scene().with_camera(turned);
        let requests = [
            ShotRequest::new("bad", "turned", ["hero"]).with_creation_order(1),
            ShotRequest::new("good", "a-cam", ["hero"]).with_creation_order(2),
        ];
        let list = generate_shot_list(&scene, &requests).unwrap();

        let bad = list.shot("bad").unwrap();
        assert!(bad.metrics.is_none());
        assert!(matches!(
            bad.diagnostics[0],
            Diagnostic::Geometry(GeometryError::SubjectBehindCamera { .. })
        ));
        assert!(list.shot("good").unwrap().metrics.is_some());
    }

    #[test]
    fn test_invalid_fraction_is_a_diagnostic() {
        let scene = basic_scene();
        let request = ShotRequest::new("r", "a-cam", ["hero"]).with_target_fraction(1.5);
        let shot = &generate_shot_list(&scene, &[request]).unwrap().shots[0];
        assert!(shot.metrics.is_none());
        assert!(matches!(
            shot.diagnostics[0],
            Diagnostic::Geometry(GeometryError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_lens_only_flags_its_shot() {
        let scene = basic_scene().with_camera(Camera::new(
            "zero-lens",
            Transform::from_position(Vec3::new(0.0, 1.0, 8.0)),
            LensParameters::new(0.0, 36.0, 24.0),
        ));
        let requests = [
            ShotRequest::new("good", "a-cam", ["hero"]).with_creation_order(1),
            ShotRequest::new("broken", "zero-lens", ["hero"]).with_creation_order(2),
        ];
        let list = generate_shot_list(&scene, &requests).unwrap();
        assert_eq!(list.request_ids(), vec!["good", "broken"]);

        let broken = list.shot("broken").unwrap();
        assert!(broken.metrics.is_none());
        assert_eq!(
            broken.diagnostics[0],
            Diagnostic::Geometry(GeometryError::InvalidParameter {
                name: "focal length".to_string(),
                value: 0.0,
            })
        );

        let good = list.shot("good").unwrap();
        assert!(good.is_clean(), "{:?}", good.diagnostics);
        assert_relative_eq!(good.metrics.as_ref().unwrap().distance, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_mirrored_camera_rejected() {
        let mirrored = Camera::new(
            "mirror-cam",
            Transform::from_position(Vec3::new(0.0, 1.0, 10.0)).with_scale(Vec3::new(1.0, 1.0, -1.0)),
            LensParameters::full_frame(50.0),
        );
        let scene = basic_scene().with_camera(mirrored);
        let request = [ShotRequest::new("r", "mirror-cam", ["hero"])];
        assert!(matches!(
            generate_shot_list(&scene, &request),
            Err(ShotListError::Scene(SceneError::InvalidEntity { .. }))
        ));
    }

    #[test]
    fn test_vertical_framing_uses_sensor_height() {
        // Narrow, tall subject: 0.6 m across, 2 m high
        let scene = stage()
            .with_object(SceneObject::new(
                "tall",
                Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
                Vec3::new(0.6, 2.0, 0.4),
            ))
            .with_camera(camera("a-cam", 10.0));
        let requests = [
            ShotRequest::new("fit", "a-cam", ["tall"])
                .with_framing(FramingMode::TargetFraction {
                    fraction: 0.8,
                    axis: FrameAxis::Vertical,
                })
                .with_creation_order(1),
            ShotRequest::new("placed", "a-cam", ["tall"])
                .with_framing(FramingMode::AsPlaced {
                    axis: FrameAxis::Vertical,
                })
                .with_creation_order(2),
            ShotRequest::new("across", "a-cam", ["tall"])
                .with_target_fraction(0.8)
                .with_creation_order(3),
        ];
        let list = generate_shot_list(&scene, &requests).unwrap();

        let fit = list.shot("fit").unwrap();
        assert!(fit.is_clean(), "{:?}", fit.diagnostics);
        let metrics = fit.metrics.as_ref().unwrap();
        assert_relative_eq!(metrics.subject_size, 2.0, epsilon = 1e-5);
        assert_relative_eq!(metrics.distance, 50.0 * 2.0 / (24.0 * 0.8), epsilon = 1e-4);
        assert_relative_eq!(
            metrics.suggested_position.unwrap(),
            Vec3::new(0.0, 1.0, metrics.distance),
            epsilon = 1e-4
        );

        let placed = list.shot("placed").unwrap().metrics.as_ref().unwrap();
        assert_relative_eq!(placed.subject_size, 2.0, epsilon = 1e-5);
        assert_relative_eq!(placed.distance, 10.0, epsilon = 1e-4);
        assert_relative_eq!(placed.framing_ratio, 50.0 * 2.0 / (24.0 * 10.0), epsilon = 1e-5);

        // The horizontal request measures the 0.6 m width against 36 mm
        let across = list.shot("across").unwrap().metrics.as_ref().unwrap();
        assert_relative_eq!(across.subject_size, 0.6, epsilon = 1e-5);
        assert_relative_eq!(across.distance, 50.0 * 0.6 / (36.0 * 0.8), epsilon = 1e-4);
    }

    #[test]
    fn test_frame_overflow_when_too_close() {
        let scene = stage()
            .with_object(actor("hero", 0.0, 0.0))
            .with_camera(camera("close", 1.0));
        let shot = &generate_shot_list(&scene, &[ShotRequest::new("r", "close", ["hero"])]).unwrap().shots[0];
        let ratio = shot.metrics.as_ref().unwrap().framing_ratio;
        assert!(ratio > 1.0);
        assert_eq!(shot.diagnostics, vec![Diagnostic::FrameOverflow { ratio }]);
    }

    #[test]
    fn test_layout_diagnostics_follow_config() {
        let scene = basic_scene()
            .with_object(actor("stand-in", 0.5, 0.0))
            .with_object(SceneObject::new(
                "flat",
                Transform::from_position(Vec3::new(0.0, 1.0, 3.0)),
                Vec3::new(1.0, 3.0, 0.2),
            ))
            .with_camera(camera("outside", 30.0));
        let request = [ShotRequest::new("r", "outside", ["hero"])];

        let shot = &generate_shot_list(&scene, &request).unwrap().shots[0];
        let kinds: Vec<_> = shot
            .diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::Geometry(_) => "geometry",
                Diagnostic::FrameOverflow { .. } => "overflow",
                Diagnostic::Overlap(_) => "overlap",
                Diagnostic::Occlusion(_) => "occlusion",
                Diagnostic::OutOfBounds(_) => "bounds",
            })
            .collect();
        assert_eq!(kinds, vec!["overlap", "occlusion", "bounds"]);

        let quiet = ShotListGenerator::new(PlannerConfig::new().with_layout_checks(false)).unwrap();
        assert!(!quiet.config().check_occlusion);
        assert!(quiet.generate(&scene, &request).unwrap().shots[0].is_clean());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let scene = basic_scene().with_object(actor("extra", 3.0, -1.0));
        let requests = vec![
            ShotRequest::new("two-shot", "a-cam", ["extra", "hero"]).with_target_fraction(0.6),
            ShotRequest::new("single", "b-cam", ["hero"]).with_priority(-2),
        ];
        let first = generate_shot_list(&scene, &requests).unwrap();
        let second = generate_shot_list(&scene, &requests).unwrap();
        assert_eq!(
            ron::to_string(&first).unwrap(),
            ron::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(ShotListGenerator::new(PlannerConfig::new().with_epsilon(f32::NAN)).is_err());
    }
}
