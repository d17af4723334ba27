//! Game configuration, persisted as TOML.
//!
//! ```toml
//! height = 8
//! width = 8
//! hazards = 8
//! seed = 42          # optional; omit for a fresh random board each run
//!
//! [inference]
//! max_passes = 10000
//! derive_sentences = true
//! ```

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{ConfigError, ConfigResult, SweepResult};
use crate::knowledge::InferenceConfig;

/// Board dimensions, hazard count, RNG seed, and inference settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_width")]
    pub width: usize,
    /// Number of hazards placed on generated boards.
    #[serde(default = "default_hazards")]
    pub hazards: usize,
    /// Seed for board generation and random moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub inference: InferenceConfig,
}

fn default_height() -> usize {
    8
}
fn default_width() -> usize {
    8
}
fn default_hazards() -> usize {
    8
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            width: default_width(),
            hazards: default_hazards(),
            seed: None,
            inference: InferenceConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Check that the board described here can be built.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.height == 0 || self.width == 0 {
            return Err(ConfigError::Invalid {
                message: format!(
                    "board must be at least 1 x 1, got {} x {}",
                    self.height, self.width
                ),
            });
        }
        let capacity = self.height * self.width;
        if self.hazards > capacity {
            return Err(ConfigError::Invalid {
                message: format!(
                    "{} hazards do not fit on a {} x {} board",
                    self.hazards, self.height, self.width
                ),
            });
        }
        if self.inference.max_passes == 0 {
            return Err(ConfigError::Invalid {
                message: "inference.max_passes must be > 0".into(),
            });
        }
        Ok(())
    }

    /// Generate a board with the configured dimensions and hazard count.
    pub fn board<R: Rng + ?Sized>(&self, rng: &mut R) -> SweepResult<Board> {
        Ok(Board::random(self.height, self.width, self.hazards, rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.height, config.width, config.hazards), (8, 8, 8));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SweepConfig = toml::from_str("height = 4\nseed = 9\n").unwrap();
        assert_eq!(config.height, 4);
        assert_eq!(config.width, 8);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.inference, InferenceConfig::default());
    }

    #[test]
    fn inference_table_is_read() {
        let config: SweepConfig =
            toml::from_str("[inference]\nderive_sentences = false\n").unwrap();
        assert!(!config.inference.derive_sentences);
        assert_eq!(config.inference.max_passes, 10_000);
    }

    #[test]
    fn overfull_board_is_invalid() {
        let config = SweepConfig {
            height: 2,
            width: 2,
            hazards: 5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn board_uses_configured_dimensions() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let config = SweepConfig {
            height: 3,
            width: 5,
            hazards: 4,
            ..Default::default()
        };
        let board = config.board(&mut rng).unwrap();
        assert_eq!(board.cell_count(), 15);
        assert_eq!(board.hazard_count(), 4);
    }

    #[test]
    fn zero_passes_is_invalid() {
        let mut config = SweepConfig::default();
        config.inference.max_passes = 0;
        assert!(config.validate().is_err());
    }
}
