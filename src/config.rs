use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::nutrition::{ActivityLevel, TrainingGoal};
use crate::one_rep_max::OneRepMaxModel;
use crate::trends::TrendConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Fallbacks used by the CLI when a flag is omitted
    pub defaults: DefaultSettings,

    /// Trend analysis settings
    pub trends: TrendConfig,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Default calculation choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultSettings {
    /// 1RM formula used when none is given
    pub one_rep_max_model: OneRepMaxModel,

    pub activity_level: ActivityLevel,

    pub goal: TrainingGoal,

    /// Intensity used for calorie estimates when none is given
    pub calorie_intensity: f64,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        DefaultSettings {
            one_rep_max_model: OneRepMaxModel::Epley,
            activity_level: ActivityLevel::Moderate,
            goal: TrainingGoal::Maintenance,
            calorie_intensity: crate::calories::DEFAULT_INTENSITY,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            defaults: DefaultSettings::default(),
            trends: TrendConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fitrs")
            .join("config.toml")
    }

    /// Load from `path` (or the default location) with fallback to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %format!("{:#}", err),
                    "Config file rejected, using default configuration"
                );
                Self::default()
            }
        }
    }

    /// Load strictly for editing: a missing file starts from defaults, an
    /// unreadable or invalid one is an error
    pub fn load_for_update(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Change one setting in the file at `path` and write it back
    ///
    /// The file is left untouched if it can't be loaded or the new value is
    /// rejected.
    pub fn update_file(path: &Path, key: &str, value: &str) -> Result<Self> {
        let mut config = Self::load_for_update(path)?;
        config.set(key, value)?;
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Reject values the engine can't use
    pub fn validate(&self) -> Result<()> {
        if !(self.defaults.calorie_intensity.is_finite() && self.defaults.calorie_intensity > 0.0) {
            anyhow::bail!(
                "defaults.calorie_intensity must be positive, got {}",
                self.defaults.calorie_intensity
            );
        }
        if !(self.trends.stable_threshold.is_finite() && self.trends.stable_threshold >= 0.0) {
            anyhow::bail!(
                "trends.stable_threshold must be non-negative, got {}",
                self.trends.stable_threshold
            );
        }
        if self.trends.comparison_days == 0 {
            anyhow::bail!("trends.comparison_days must be at least 1");
        }
        Ok(())
    }

    /// Look up a setting by dotted key, rendered as a string
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "defaults.one_rep_max_model" => self.defaults.one_rep_max_model.to_string(),
            "defaults.activity_level" => self.defaults.activity_level.to_string(),
            "defaults.goal" => self.defaults.goal.to_string(),
            "defaults.calorie_intensity" => self.defaults.calorie_intensity.to_string(),
            "trends.stable_threshold" => self.trends.stable_threshold.to_string(),
            "trends.comparison_days" => self.trends.comparison_days.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a setting from a dotted key and a string value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "defaults.one_rep_max_model" => updated.defaults.one_rep_max_model = value.parse()?,
            "defaults.activity_level" => updated.defaults.activity_level = value.parse()?,
            "defaults.goal" => updated.defaults.goal = value.parse()?,
            "defaults.calorie_intensity" => {
                updated.defaults.calorie_intensity = value
                    .parse()
                    .with_context(|| format!("Invalid number: {}", value))?
            }
            "trends.stable_threshold" => {
                updated.trends.stable_threshold = value
                    .parse()
                    .with_context(|| format!("Invalid number: {}", value))?
            }
            "trends.comparison_days" => {
                updated.trends.comparison_days = value
                    .parse()
                    .with_context(|| format!("Invalid day count: {}", value))?
            }
            "logging.level" => {
                updated.logging.level = value.parse().map_err(anyhow::Error::msg)?
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        updated.validate()?;
        updated.metadata.updated_at = Utc::now();
        *self = updated;
        Ok(())
    }

    /// Every key accepted by [`AppConfig::get`] and [`AppConfig::set`]
    pub fn keys() -> &'static [&'static str] {
        &[
            "defaults.one_rep_max_model",
            "defaults.activity_level",
            "defaults.goal",
            "defaults.calorie_intensity",
            "trends.stable_threshold",
            "trends.comparison_days",
            "logging.level",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.defaults, deserialized.defaults);
        assert_eq!(config.trends, deserialized.trends);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.set("defaults.goal", "muscle_gain").unwrap();
        original.set("trends.comparison_days", "14").unwrap();

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.defaults.goal, TrainingGoal::MuscleGain);
        assert_eq!(loaded.trends.comparison_days, 14);
    }

    #[test]
    fn test_get_set_keys() {
        let mut config = AppConfig::default();
        for key in AppConfig::keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }

        config.set("defaults.one_rep_max_model", "brzycki").unwrap();
        assert_eq!(config.get("defaults.one_rep_max_model").unwrap(), "Brzycki");

        assert!(config.set("defaults.activity_level", "couch").is_err());
        assert!(config.set("trends.comparison_days", "0").is_err());
        assert!(config.set("no.such.key", "1").is_err());
        assert!(config.get("no.such.key").is_none());
    }

    #[test]
    fn test_update_file_keeps_other_settings() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut original = AppConfig::default();
        original.set("defaults.goal", "muscle_gain").unwrap();
        original.set("trends.comparison_days", "14").unwrap();
        original.save_to_file(&config_path).unwrap();

        AppConfig::update_file(&config_path, "defaults.activity_level", "active").unwrap();

        let reloaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(reloaded.defaults.activity_level, ActivityLevel::Active);
        assert_eq!(reloaded.defaults.goal, TrainingGoal::MuscleGain);
        assert_eq!(reloaded.trends.comparison_days, 14);
    }

    #[test]
    fn test_update_file_refuses_invalid_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut original = AppConfig::default();
        original.set("defaults.goal", "muscle_gain").unwrap();
        original.save_to_file(&config_path).unwrap();

        let edited = fs::read_to_string(&config_path)
            .unwrap()
            .replace("calorie_intensity = 5.0", "calorie_intensity = -1.0");
        assert!(edited.contains("calorie_intensity = -1.0"));
        fs::write(&config_path, &edited).unwrap();

        assert!(AppConfig::load_for_update(&config_path).is_err());
        assert!(AppConfig::update_file(&config_path, "defaults.activity_level", "active").is_err());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), edited);

        // read-only callers still get a usable configuration
        let fallback = AppConfig::load_or_default(Some(config_path.as_path()));
        assert_eq!(fallback.defaults, DefaultSettings::default());
    }

    #[test]
    fn test_update_file_creates_missing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("fresh").join("config.toml");

        let updated = AppConfig::update_file(&config_path, "defaults.goal", "fat_loss").unwrap();
        assert_eq!(updated.defaults.goal, TrainingGoal::FatLoss);
        assert_eq!(
            AppConfig::load_from_file(&config_path).unwrap().defaults.goal,
            TrainingGoal::FatLoss
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(Some(&temp_dir.path().join("absent.toml")));
        assert_eq!(config.defaults, DefaultSettings::default());
    }
}
