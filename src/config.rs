// src/config.rs - Tunable pipeline parameters
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::templates::GestureLabel;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pinch: PinchConfig,
    pub smoothing: SmoothingConfig,
    pub capture: CaptureConfig,
    pub classifier: ClassifierConfig,
    pub dispatch: DispatchConfig,
}

/// Hysteresis band for the thumb/index distance, in normalized camera units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    pub start_threshold: f64,
    pub release_threshold: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            start_threshold: 0.06,
            release_threshold: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Weight of the newest sample. Higher follows faster but jitters more.
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { alpha: 0.35 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Minimum screen-space distance in pixels between stored path points.
    pub min_point_distance: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_point_distance: 4.0,
        }
    }
}

/// Classifier tuning. Lengths are in canvas-normalized units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub resample_points: usize,
    pub min_raw_points: usize,
    pub min_path_length: f64,
    pub scale_epsilon: f64,
    pub line_straightness: f64,
    pub line_aspect_ratio: f64,
    pub line_extent_floor: f64,
    /// A stroke whose endpoint gap is at most this fraction of its normalized
    /// length is a loop, and closed templates may match it from any start.
    pub closed_gap_ratio: f64,
    pub default_threshold: f64,
    pub thresholds: BTreeMap<GestureLabel, f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (GestureLabel::Circle, 0.30),
            (GestureLabel::Square, 0.30),
            (GestureLabel::Triangle, 0.30),
            (GestureLabel::Checkmark, 0.30),
            (GestureLabel::Zigzag, 0.40),
            (GestureLabel::SCurve, 0.40),
        ]);

        Self {
            resample_points: 32,
            min_raw_points: 5,
            min_path_length: 0.05,
            scale_epsilon: 0.01,
            line_straightness: 0.8,
            line_aspect_ratio: 1.5,
            line_extent_floor: 0.001,
            closed_gap_ratio: 0.2,
            default_threshold: 0.40,
            thresholds,
        }
    }
}

impl ClassifierConfig {
    pub fn threshold_for(&self, label: GestureLabel) -> f64 {
        self.thresholds
            .get(&label)
            .copied()
            .unwrap_or(self.default_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// How long the draw state stays in CASTING after a successful cast.
    pub casting_hold_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            casting_hold_ms: 500,
        }
    }
}

impl DispatchConfig {
    pub fn casting_hold(&self) -> Duration {
        Duration::from_millis(self.casting_hold_ms)
    }
}

impl PipelineConfig {
    /// `<config dir>/spell_gesture/config.json` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "spell_gesture")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        debug!(path = %path.display(), "loaded pipeline config");
        Ok(config)
    }

    /// Like [`PipelineConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pinch = &self.pinch;
        if pinch.start_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pinch start threshold must be positive, got {}",
                pinch.start_threshold
            )));
        }
        if pinch.release_threshold <= pinch.start_threshold {
            return Err(ConfigError::Invalid(format!(
                "pinch release threshold {} must exceed start threshold {}",
                pinch.release_threshold, pinch.start_threshold
            )));
        }

        let alpha = self.smoothing.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "smoothing alpha must be in (0, 1], got {alpha}"
            )));
        }

        if self.capture.min_point_distance < 0.0 {
            return Err(ConfigError::Invalid(
                "min point distance must not be negative".to_string(),
            ));
        }

        let classifier = &self.classifier;
        if classifier.resample_points < 2 {
            return Err(ConfigError::Invalid(format!(
                "resample point count must be at least 2, got {}",
                classifier.resample_points
            )));
        }
        if classifier.scale_epsilon <= 0.0 || classifier.line_extent_floor <= 0.0 {
            return Err(ConfigError::Invalid(
                "scale epsilon and line extent floor must be positive".to_string(),
            ));
        }
        if !(classifier.closed_gap_ratio > 0.0 && classifier.closed_gap_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "closed gap ratio must be in (0, 1], got {}",
                classifier.closed_gap_ratio
            )));
        }
        if classifier.default_threshold < 0.0
            || classifier.thresholds.values().any(|t| *t < 0.0)
        {
            return Err(ConfigError::Invalid(
                "match thresholds must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.threshold_for(GestureLabel::Circle), 0.30);
        assert_eq!(config.classifier.threshold_for(GestureLabel::Zigzag), 0.40);
        assert_eq!(
            config.classifier.threshold_for(GestureLabel::VerticalLine),
            0.40
        );
        assert_eq!(config.dispatch.casting_hold(), Duration::from_millis(500));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let json = r#"{
            "pinch": { "start_threshold": 0.05 },
            "classifier": { "thresholds": { "circle": 0.2 } }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.pinch.start_threshold, 0.05);
        assert_eq!(config.pinch.release_threshold, 0.12);
        assert_eq!(config.smoothing.alpha, 0.35);
        assert_eq!(config.classifier.threshold_for(GestureLabel::Circle), 0.2);
        // A replaced map drops the other per-class entries.
        assert_eq!(config.classifier.threshold_for(GestureLabel::Square), 0.40);
    }

    #[test]
    fn collapsed_hysteresis_band_is_rejected() {
        let mut config = PipelineConfig::default();
        config.pinch.release_threshold = config.pinch.start_threshold;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PipelineConfig::default();
        config.smoothing.alpha = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn closed_gap_ratio_must_be_a_fraction() {
        let mut config = PipelineConfig::default();
        assert_eq!(config.classifier.closed_gap_ratio, 0.2);
        for ratio in [0.0, -0.1, 1.5, f64::NAN] {
            config.classifier.closed_gap_ratio = ratio;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "ratio {ratio}"
            );
        }
        config.classifier.closed_gap_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file_and_falls_back_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        assert_eq!(
            PipelineConfig::load_or_default(&missing).expect("defaults"),
            PipelineConfig::default()
        );
        assert!(matches!(
            PipelineConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "smoothing": { "alpha": 0.5 } }"#).expect("write");
        let config = PipelineConfig::load(&path).expect("load");
        assert_eq!(config.smoothing.alpha, 0.5);

        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
