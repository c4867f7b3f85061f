//! Planner tuning configuration

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::diagram::ProjectionPlane;

/// Default geometric tolerance in meters
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// # Planner Configuration
///
/// Tolerances and switches for the layout checks run during shot list
/// generation, plus diagram and logging defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Geometric tolerance in meters for overlap and bounds tests
    pub epsilon: f32,
    /// Report overlaps involving shot subjects
    pub check_overlaps: bool,
    /// Report objects blocking the line of sight to shot subjects
    pub check_occlusion: bool,
    /// Report cameras and subjects outside the scene extents
    pub check_bounds: bool,
    /// Plane used by the diagram projector when none is given
    pub default_plane: ProjectionPlane,
    /// `env_logger` filter used by [`crate::foundation::logging::init_from_config`]
    pub log_filter: String,
}

impl PlannerConfig {
    /// Create a configuration with every check enabled
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            check_overlaps: true,
            check_occlusion: true,
            check_bounds: true,
            default_plane: ProjectionPlane::TopDown,
            log_filter: "objective_engine=info".to_string(),
        }
    }

    /// Set tolerance
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Enable or disable every layout check at once
    #[must_use]
    pub fn with_layout_checks(mut self, enabled: bool) -> Self {
        self.check_overlaps = enabled;
        self.check_occlusion = enabled;
        self.check_bounds = enabled;
        self
    }

    /// Set the default diagram plane
    #[must_use]
    pub fn with_default_plane(mut self, plane: ProjectionPlane) -> Self {
        self.default_plane = plane;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be a non-negative finite number, got {}",
                self.epsilon
            )));
        }
        if self.epsilon > 0.1 {
            return Err(ConfigError::Invalid(format!(
                "epsilon of {} m would hide real conflicts",
                self.epsilon
            )));
        }
        self.default_plane
            .basis()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PlannerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_default_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PlannerConfig::from_toml_str("epsilon = 0.001\ncheck_occlusion = false\n").unwrap();
        assert_eq!(config.epsilon, 0.001);
        assert!(!config.check_occlusion);
        assert!(config.check_overlaps);
        assert_eq!(config.default_plane, ProjectionPlane::TopDown);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = PlannerConfig::new()
            .with_default_plane(ProjectionPlane::Custom {
                normal: Vec3::new(1.0, 0.0, 1.0),
                up: Vec3::new(0.0, 1.0, 0.0),
            })
            .with_layout_checks(false);
        let text = config.to_ron_string().unwrap();
        assert_eq!(PlannerConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PlannerConfig::new().with_default_plane(ProjectionPlane::Front);
        let text = config.to_toml_string().unwrap();
        assert_eq!(PlannerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_negative_epsilon() {
        let config = PlannerConfig::new().with_epsilon(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_degenerate_custom_plane() {
        let config = PlannerConfig::new().with_default_plane(ProjectionPlane::Custom {
            normal: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::new(0.0, 2.0, 0.0),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            PlannerConfig::load_from_file("planner.yaml"),
            Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
