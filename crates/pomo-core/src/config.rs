//! Configuration management for pomo

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1 minute")]
    ZeroDuration(&'static str),

    #[error("Unknown display variant: {0} (expected 'modern' or 'retro')")]
    UnknownVariant(String),
}

/// Global pomo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Length of a work interval (minutes)
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,

    /// Length of a break interval (minutes)
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,

    /// Send desktop notifications when an interval completes
    #[serde(default = "default_notifications")]
    pub notifications: bool,

    /// Timer display variant for a fresh session ("modern" or "retro")
    #[serde(default = "default_display_variant")]
    pub display_variant: String,
}

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_notifications() -> bool {
    true
}

fn default_display_variant() -> String {
    "modern".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            notifications: default_notifications(),
            display_variant: default_display_variant(),
        }
    }
}

impl Config {
    /// Load config from file, using defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_minutes == 0 {
            return Err(ConfigError::ZeroDuration("work_minutes"));
        }
        if self.break_minutes == 0 {
            return Err(ConfigError::ZeroDuration("break_minutes"));
        }
        match self.display_variant.as_str() {
            "modern" | "retro" => Ok(()),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.work_minutes, 25);
        assert_eq!(config.break_minutes, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"work_minutes": 50}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.work_minutes, 50);
        assert_eq!(config.break_minutes, 5);
        assert!(config.notifications);
    }

    #[test]
    fn test_full_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"work_minutes": 25, "break_minutes": 10, "notifications": false, "display_variant": "retro"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.break_minutes, 10);
        assert!(!config.notifications);
        assert_eq!(config.display_variant, "retro");
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = Config {
            work_minutes: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDuration("work_minutes"))
        );
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"display_variant": "neon"}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("neon"));
    }
}
