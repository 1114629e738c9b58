//! Standard paths used by pomo

use std::path::PathBuf;

/// Application directory name under the platform data/config roots
const APP_DIR: &str = "pomo";

/// Standard pomo paths
pub struct Paths {
    /// Data directory (~/.local/share/pomo)
    pub data: PathBuf,
    /// Config directory (~/.config/pomo)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    /// Resolve paths from the environment, falling back to platform defaults
    pub fn new() -> Self {
        let data = std::env::var_os("POMO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                    .join(APP_DIR)
            });

        let config = std::env::var_os("POMO_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("~/.config"))
                    .join(APP_DIR)
            });

        Self { data, config }
    }

    /// Path of the main configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Get state directory for a tool
    pub fn state(&self, tool: &str) -> PathBuf {
        self.data.join(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = Paths {
            data: PathBuf::from("/tmp/pomo-test/data"),
            config: PathBuf::from("/tmp/pomo-test/config"),
        };
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/pomo-test/config/config.json")
        );
        assert_eq!(
            paths.state("focus"),
            PathBuf::from("/tmp/pomo-test/data/focus")
        );
    }
}
