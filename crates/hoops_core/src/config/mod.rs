//! # Capture Configuration
//!
//! Tuning values for capture sessions and analysis, loaded from YAML.
//!
//! ## Usage
//! ```rust
//! use hoops_core::config::CaptureConfig;
//!
//! let config = CaptureConfig::default();
//! assert_eq!(config.clock_step_secs, 20);
//! let youth = CaptureConfig::youth();
//! assert_eq!(youth.quarter_length_secs, 480);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};
use thiserror::Error;

/// Environment variable naming a YAML config file.
pub const CONFIG_PATH_ENV: &str = "HOOPS_CONFIG_PATH";

/// Actions that end a possession and commit the pending sequence.
pub const DEFAULT_HANDOFF_ACTIONS: &[&str] = &[
    "Made Shot",
    "Missed Shot",
    "Blocked Shot",
    "And One",
    "Turnover",
    "Offensive Rebound",
    "Defensive Rebound",
    "Non-Shooting Foul",
    "Free Throws Made",
    "Free Throws Missed",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Game clock decrement after each committed play (default: 20)
    pub clock_step_secs: u32,
    /// Regulation quarter length (default: 720 = 12:00)
    pub quarter_length_secs: u32,
    /// Number of regulation quarters (default: 4)
    pub regulation_quarters: u8,
    /// Overtime period length (default: 300 = 5:00)
    pub overtime_length_secs: u32,
    /// Overtime periods a game may reach (default: 4)
    pub max_overtime_periods: u8,
    /// Next-tag suggestions returned per query (default: 3)
    pub suggestion_limit: usize,
    /// Confidence stamped on manually captured tags (default: 1.0)
    pub default_confidence: f32,
    /// Actions that auto-commit the pending sequence
    pub handoff_actions: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            clock_step_secs: 20,
            quarter_length_secs: 720,
            regulation_quarters: 4,
            overtime_length_secs: 300,
            max_overtime_periods: 4,
            suggestion_limit: 3,
            default_confidence: 1.0,
            handoff_actions: DEFAULT_HANDOFF_ACTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CaptureConfig {
    /// Youth leagues: 8-minute quarters, 4-minute overtime.
    pub fn youth() -> Self {
        Self { quarter_length_secs: 480, overtime_length_secs: 240, ..Self::default() }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::info!("Loaded capture config from {}", path.display());
        Ok(config)
    }

    /// Config from `HOOPS_CONFIG_PATH` if set, otherwise defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }
        Self::load(Path::new(path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_step_secs == 0 {
            return Err(ConfigError::Invalid("clock_step_secs must be positive".into()));
        }
        if self.quarter_length_secs == 0 || self.overtime_length_secs == 0 {
            return Err(ConfigError::Invalid("period lengths must be positive".into()));
        }
        if self.regulation_quarters == 0 {
            return Err(ConfigError::Invalid("regulation_quarters must be at least 1".into()));
        }
        if self.suggestion_limit == 0 {
            return Err(ConfigError::Invalid("suggestion_limit must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(ConfigError::Invalid(format!(
                "default_confidence must be within 0..=1, got {}",
                self.default_confidence
            )));
        }
        Ok(())
    }

    pub fn is_handoff(&self, action_name: &str) -> bool {
        self.handoff_actions.iter().any(|a| a == action_name)
    }

    /// Last period a game can reach (regulation plus overtime).
    pub fn max_period(&self) -> u8 {
        self.regulation_quarters.saturating_add(self.max_overtime_periods)
    }

    /// Length of the given 1-based period.
    pub fn period_length_secs(&self, period: u8) -> u32 {
        if period <= self.regulation_quarters {
            self.quarter_length_secs
        } else {
            self.overtime_length_secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = CaptureConfig::default();
        assert_eq!(cfg.clock_step_secs, 20);
        assert_eq!(cfg.suggestion_limit, 3);
        assert!(cfg.is_handoff("Made Shot"));
        assert!(!cfg.is_handoff("Pick and Roll"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_period_lengths() {
        let cfg = CaptureConfig::default();
        assert_eq!(cfg.period_length_secs(4), 720);
        assert_eq!(cfg.period_length_secs(5), 300);
        assert_eq!(cfg.max_period(), 8);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = CaptureConfig::from_yaml_str("clock_step_secs: 15\n").unwrap();
        assert_eq!(cfg.clock_step_secs, 15);
        assert_eq!(cfg.quarter_length_secs, 720);
        assert!(cfg.is_handoff("Turnover"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            CaptureConfig::from_yaml_str("suggestion_limit: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CaptureConfig::from_yaml_str("default_confidence: 1.5\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CaptureConfig::from_yaml_str("clock_step_secs: [1, 2]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "quarter_length_secs: 600").unwrap();
        let cfg = CaptureConfig::load(file.path()).unwrap();
        assert_eq!(cfg.quarter_length_secs, 600);

        let missing = CaptureConfig::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
