use crate::core::{
    default_landmarks, DistanceUnit, Landmark, DEFAULT_COMPASS_DIAMETER_PX, INSIGNIFICANT_MOVE_DEG,
    LANDMARK_MARGIN_PX, LOCATION_DELAY_MS, MAX_DELAY_MS, ORIENTATION_DELAY_MS,
};
use crate::hardware::LocationOptions;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Complete compass configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassConfig {
    /// Landmarks shown on the compass face
    pub landmarks: Vec<Landmark>,
    /// Options passed to the location provider
    pub location: LocationOptions,
    /// Unit system for distance labels
    pub distance_unit: DistanceUnit,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
}

/// Rate limiting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Throttle cool-down for orientation updates (milliseconds)
    pub orientation_delay_ms: f64,
    /// Quiescence window before a location update is applied (milliseconds)
    pub location_delay_ms: f64,
    /// Per-axis degree delta below which a location update is dropped
    pub insignificant_move_deg: f64,
}

/// Compass face geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between the compass rim and the icon ring (pixels)
    pub landmark_margin_px: f64,
    /// Diameter assumed when the render sink cannot measure it (pixels)
    pub fallback_compass_diameter_px: f64,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            landmarks: default_landmarks(),
            location: LocationOptions::default(),
            distance_unit: DistanceUnit::Metric,
            timing: TimingConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            orientation_delay_ms: ORIENTATION_DELAY_MS,
            location_delay_ms: LOCATION_DELAY_MS,
            insignificant_move_deg: INSIGNIFICANT_MOVE_DEG,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            landmark_margin_px: LANDMARK_MARGIN_PX,
            fallback_compass_diameter_px: DEFAULT_COMPASS_DIAMETER_PX,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("duplicate landmark id '{id}'")]
    DuplicateLandmark { id: String },
    #[error("unknown landmark '{id}'")]
    UnknownLandmark { id: String },
    #[error("config I/O error: {message}")]
    IoError { message: String },
    #[error("config serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Outcome of validating a configuration
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> ConfigResult<Vec<String>> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

/// Owns the active configuration and its file binding
pub struct ConfigurationManager {
    config: CompassConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Manager holding the built-in defaults
    pub fn new() -> Self {
        Self {
            config: CompassConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &CompassConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: CompassConfig) -> ConfigResult<()> {
        for warning in Self::validate(&config).into_result()? {
            warn!("{}", warning);
        }
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        if self.config.distance_unit != unit {
            self.config.distance_unit = unit;
            self.is_modified = true;
        }
    }

    pub fn add_landmark(&mut self, landmark: Landmark) -> ConfigResult<()> {
        if self.config.landmarks.iter().any(|l| l.id == landmark.id) {
            return Err(ConfigError::DuplicateLandmark { id: landmark.id });
        }
        Self::validate_landmark(&landmark)?;

        self.config.landmarks.push(landmark);
        self.is_modified = true;
        Ok(())
    }

    pub fn remove_landmark(&mut self, id: &str) -> ConfigResult<Landmark> {
        let index = self
            .config
            .landmarks
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| ConfigError::UnknownLandmark { id: id.to_string() })?;

        self.is_modified = true;
        Ok(self.config.landmarks.remove(index))
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: CompassConfig = serde_json::from_str(content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config: {}", e),
        })?;

        let mut manager = Self::new();
        for warning in Self::validate(&config).into_result()? {
            warn!("{}", warning);
        }
        manager.config = config;
        Ok(manager)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })
    }

    /// Load and validate a JSON configuration file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let loaded = Self::from_json_str(&content)?;
        self.config = loaded.config;
        debug!("Loaded {} landmarks from '{}'", self.config.landmarks.len(), path_str);

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = self.to_json_string()?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save back to the file the configuration was loaded from
    pub fn save(&mut self) -> ConfigResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No config file path set".to_string(),
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn config_file_path(&self) -> Option<&str> {
        self.config_file_path.as_deref()
    }

    /// Check every parameter; collects all errors rather than stopping at the first
    pub fn validate(config: &CompassConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        let mut seen = HashSet::new();
        for landmark in &config.landmarks {
            if let Err(error) = Self::validate_landmark(landmark) {
                result.errors.push(error);
            }
            if !seen.insert(landmark.id.as_str()) {
                result.errors.push(ConfigError::DuplicateLandmark {
                    id: landmark.id.clone(),
                });
            }
        }
        if config.landmarks.is_empty() {
            result.warnings.push("No landmarks configured; the compass face will be empty".to_string());
        }

        let timing = &config.timing;
        let orientation_delay = timing.orientation_delay_ms;
        if !(orientation_delay > 0.0 && orientation_delay <= MAX_DELAY_MS) {
            result.errors.push(invalid(
                "orientation_delay_ms",
                orientation_delay,
                "must be positive and at most u32::MAX milliseconds",
            ));
        }
        let location_delay = timing.location_delay_ms;
        if !(location_delay >= 0.0 && location_delay <= MAX_DELAY_MS) {
            result.errors.push(invalid(
                "location_delay_ms",
                location_delay,
                "must be non-negative and at most u32::MAX milliseconds",
            ));
        }
        if !(timing.insignificant_move_deg.is_finite() && timing.insignificant_move_deg >= 0.0) {
            result.errors.push(invalid(
                "insignificant_move_deg",
                timing.insignificant_move_deg,
                "must be a non-negative degree delta",
            ));
        } else if timing.insignificant_move_deg > 0.01 {
            result.warnings.push(format!(
                "insignificant_move_deg {} ignores moves of over a kilometre",
                timing.insignificant_move_deg
            ));
        }

        let layout = &config.layout;
        if !(layout.fallback_compass_diameter_px.is_finite() && layout.fallback_compass_diameter_px > 0.0) {
            result.errors.push(invalid(
                "fallback_compass_diameter_px",
                layout.fallback_compass_diameter_px,
                "must be positive",
            ));
        } else if !(layout.landmark_margin_px.is_finite()
            && layout.landmark_margin_px >= 0.0
            && layout.landmark_margin_px < layout.fallback_compass_diameter_px / 2.0)
        {
            result.errors.push(invalid(
                "landmark_margin_px",
                layout.landmark_margin_px,
                "must be non-negative and smaller than the compass radius",
            ));
        }

        if config.location.timeout_ms == 0 {
            result.errors.push(invalid("location.timeout_ms", 0, "must be positive"));
        }
        if config.location.enable_high_accuracy {
            result
                .warnings
                .push("High-accuracy location increases battery use and shares a precise position".to_string());
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    fn validate_landmark(landmark: &Landmark) -> ConfigResult<()> {
        if landmark.id.trim().is_empty() {
            return Err(invalid("landmark.id", "\"\"", "must not be empty"));
        }
        if !landmark.position.is_valid() {
            return Err(invalid(
                &format!("landmarks[{}].position", landmark.id),
                landmark.position,
                "latitude must be within [-90, 90] and longitude within [-180, 180]",
            ));
        }
        Ok(())
    }
}

fn invalid(parameter: &str, value: impl std::fmt::Display, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let result = ConfigurationManager::validate(&CompassConfig::default());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_values() {
        let config = CompassConfig::default();
        assert_eq!(config.landmarks.len(), 3);
        assert_eq!(config.timing.orientation_delay_ms, 33.3);
        assert_eq!(config.timing.location_delay_ms, 60_000.0);
        assert_eq!(config.timing.insignificant_move_deg, 0.0001);
        assert_eq!(config.location.timeout_ms, 30_000);
        assert_eq!(config.location.maximum_age_ms, 60_000);
        assert!(!config.location.enable_high_accuracy);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let manager = ConfigurationManager::from_json_str(
            r#"{
                "distance_unit": "imperial",
                "landmarks": [{ "id": "peak", "position": { "latitude": 35.01, "longitude": 139.0 } }]
            }"#,
        )
        .unwrap();

        let config = manager.config();
        assert_eq!(config.distance_unit, DistanceUnit::Imperial);
        assert_eq!(config.landmarks, vec![Landmark::new("peak", 35.01, 139.0)]);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut manager = ConfigurationManager::new();
        manager.set_distance_unit(DistanceUnit::Imperial);
        let json = manager.to_json_string().unwrap();

        let restored = ConfigurationManager::from_json_str(&json).unwrap();
        assert_eq!(restored.config(), manager.config());
    }

    #[test]
    fn test_malformed_json() {
        let error = ConfigurationManager::from_json_str("{ not json").err().unwrap();
        assert!(matches!(error, ConfigError::SerializationError { .. }));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let mut config = CompassConfig::default();
        config.landmarks.push(Landmark::new("nowhere", 95.0, 0.0));

        let result = ConfigurationManager::validate(&config);
        assert!(!result.is_valid);
        assert!(matches!(result.errors[0], ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn test_duplicate_landmark_rejected() {
        let mut manager = ConfigurationManager::new();
        let error = manager.add_landmark(Landmark::new("tower", 0.0, 0.0)).unwrap_err();
        assert_eq!(error, ConfigError::DuplicateLandmark { id: "tower".to_string() });

        let mut config = CompassConfig::default();
        config.landmarks.push(Landmark::new("fuji", 35.0, 138.0));
        assert!(manager.update_config(config).is_err());
    }

    #[test]
    fn test_add_and_remove_landmark() {
        let mut manager = ConfigurationManager::new();
        assert!(!manager.is_modified());

        manager.add_landmark(Landmark::new("bridge", 35.63, 139.78)).unwrap();
        assert!(manager.is_modified());
        assert_eq!(manager.config().landmarks.len(), 4);

        let removed = manager.remove_landmark("bridge").unwrap();
        assert_eq!(removed.id, "bridge");
        assert!(matches!(
            manager.remove_landmark("bridge"),
            Err(ConfigError::UnknownLandmark { .. })
        ));
    }

    #[test]
    fn test_timing_and_layout_validation() {
        let mut config = CompassConfig::default();
        config.timing.orientation_delay_ms = 0.0;
        config.layout.landmark_margin_px = 200.0;

        let result = ConfigurationManager::validate(&config);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_oversized_delays_rejected() {
        let error = ConfigurationManager::from_json_str(r#"{"timing":{"location_delay_ms":1e30}}"#)
            .err()
            .unwrap();
        assert!(matches!(
            error,
            ConfigError::InvalidParameter { ref parameter, .. } if parameter == "location_delay_ms"
        ));

        let mut config = CompassConfig::default();
        config.timing.orientation_delay_ms = f64::INFINITY;
        config.timing.location_delay_ms = f64::NAN;
        assert_eq!(ConfigurationManager::validate(&config).errors.len(), 2);

        config.timing.orientation_delay_ms = MAX_DELAY_MS;
        config.timing.location_delay_ms = MAX_DELAY_MS;
        assert!(ConfigurationManager::validate(&config).is_valid);
    }

    #[test]
    fn test_warnings() {
        let mut config = CompassConfig::default();
        config.landmarks.clear();
        config.location.enable_high_accuracy = true;

        let result = ConfigurationManager::validate(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("landmark-compass-{}.json", std::process::id()));

        let mut manager = ConfigurationManager::new();
        manager.set_distance_unit(DistanceUnit::Imperial);
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config().distance_unit, DistanceUnit::Imperial);
        let expected = path.to_string_lossy().to_string();
        assert_eq!(loaded.config_file_path(), Some(expected.as_str()));

        let _ = fs::remove_file(&path);
    }
}
