use std::path::Path;

use crate::error::ConfigError;
use crate::{DEFAULT_COLUMNS, DEFAULT_K, DEFAULT_PLAYERS, DEFAULT_ROWS, MAX_PLAYERS};

/// Dimensions and rules of one game, loadable from TOML
///
/// ```toml
/// rows = 6
/// columns = 7
/// k = 4
/// players = 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    /// tokens in a row needed to win
    pub k: usize,
    pub players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            k: DEFAULT_K,
            players: DEFAULT_PLAYERS,
        }
    }
}

impl GameConfig {
    pub fn new(rows: usize, columns: usize, k: usize, players: usize) -> Result<Self, ConfigError> {
        let config = Self {
            rows,
            columns,
            k,
            players,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rejects games that cannot be played or cannot be won
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::Validation(
                "rows and columns must be > 0".into(),
            ));
        }
        if self.columns > u16::MAX as usize || self.rows > u16::MAX as usize {
            return Err(ConfigError::Validation(
                "rows and columns must fit in 16 bits".into(),
            ));
        }
        if self.k == 0 {
            return Err(ConfigError::Validation("k must be > 0".into()));
        }
        if self.players < 2 {
            return Err(ConfigError::Validation("players must be >= 2".into()));
        }
        if self.players > MAX_PLAYERS {
            return Err(ConfigError::Validation(format!(
                "players must be <= {}",
                MAX_PLAYERS
            )));
        }
        if self.k > self.rows.max(self.columns) {
            return Err(ConfigError::Validation(format!(
                "k = {} cannot fit on a {}x{} board",
                self.k, self.rows, self.columns
            )));
        }
        if (self.rows * self.columns) / self.players < self.k {
            return Err(ConfigError::Validation(format!(
                "{} players leave too few cells for the last player to get {} in a row",
                self.players, self.k
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_classic_connect_four() {
        let config = GameConfig::default();
        assert_eq!((config.rows, config.columns, config.k, config.players), (6, 7, 4, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unwinnable_games_are_rejected() {
        assert!(GameConfig::new(3, 3, 4, 2).is_err());
        assert!(GameConfig::new(2, 2, 2, 3).is_err());
        assert!(GameConfig::new(4, 4, 3, 1).is_err());
        assert!(GameConfig::new(0, 4, 3, 2).is_err());
        assert!(GameConfig::new(4, 4, 3, 10).is_err());
        assert!(GameConfig::new(4, 4, 3, 3).is_ok());
        // a single row is fine as long as k fits across it
        assert!(GameConfig::new(1, 8, 4, 2).is_ok());
    }

    #[test]
    fn huge_boards_are_rejected_without_overflow() {
        let config = GameConfig {
            rows: usize::MAX / 2,
            columns: 4,
            k: 3,
            players: 2,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(GameConfig::new(4, usize::MAX, 3, 2).is_err());
        assert!(GameConfig::new(4, u16::MAX as usize + 1, 3, 2).is_err());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config: GameConfig = toml::from_str("k = 5\ncolumns = 9").unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.columns, 9);
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
