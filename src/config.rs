//! Startup configuration: training budget, pile layout, first mover, pacing.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use strictly_nim::{Participant, Piles};
use tracing::{debug, info, instrument};

/// Settings for the one-time policy training phase.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct TrainingConfig {
    /// Number of self-play games.
    #[serde(default = "default_episodes")]
    episodes: NonZeroU32,

    /// Q-learning step size (alpha), in `[0, 1]`.
    #[serde(default = "default_learning_rate")]
    learning_rate: f64,

    /// Probability of a random move while training (epsilon), in `[0, 1]`.
    #[serde(default = "default_exploration_rate")]
    exploration_rate: f64,

    /// Seed for the policy's RNG; fresh entropy when absent.
    #[serde(default)]
    seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            learning_rate: default_learning_rate(),
            exploration_rate: default_exploration_rate(),
            seed: None,
        }
    }
}

/// Everything the arena needs before the first game starts.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Policy training settings.
    #[serde(default)]
    training: TrainingConfig,

    /// Layout every new game starts from.
    #[serde(default = "default_initial_piles")]
    initial_piles: Piles,

    /// Who moves first in the opening game.
    #[serde(default = "default_first_mover")]
    first_mover: Participant,

    /// Pause before the automated participant answers, in milliseconds.
    #[serde(default = "default_automated_delay_ms")]
    automated_delay_ms: u64,
}

fn default_episodes() -> NonZeroU32 {
    NonZeroU32::new(10_000).unwrap_or(NonZeroU32::MIN)
}

fn default_learning_rate() -> f64 {
    0.5
}

fn default_exploration_rate() -> f64 {
    0.1
}

#[instrument]
fn default_initial_piles() -> Piles {
    Piles::from(vec![1, 3, 5, 7])
}

#[instrument]
fn default_first_mover() -> Participant {
    Participant::Human
}

fn default_automated_delay_ms() -> u64 {
    800
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            training: TrainingConfig::default(),
            initial_piles: default_initial_piles(),
            first_mover: default_first_mover(),
            automated_delay_ms: default_automated_delay_ms(),
        }
    }
}

impl GameConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(piles = %config.initial_piles, first_mover = %config.first_mover, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that the types alone do not enforce.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in [
            ("learning_rate", self.training.learning_rate),
            ("exploration_rate", self.training.exploration_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::new(format!(
                    "training.{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }

        if self.initial_piles.is_empty() {
            return Err(ConfigError::new("initial_piles must name at least one pile"));
        }
        if self.initial_piles.is_exhausted() {
            return Err(ConfigError::new(format!(
                "initial_piles {} has nothing to take",
                self.initial_piles
            )));
        }

        Ok(())
    }

    /// The automated participant's pause as a [`Duration`].
    pub fn automated_delay(&self) -> Duration {
        Duration::from_millis(self.automated_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_the_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.training().episodes().get(), 10_000);
        assert_eq!(config.initial_piles().as_slice(), &[1, 3, 5, 7]);
        assert_eq!(*config.first_mover(), Participant::Human);
        assert_eq!(config.automated_delay(), Duration::from_millis(800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_document_overrides() {
        let config = GameConfig::from_toml_str(
            r#"
            initial_piles = [3, 4, 5]
            first_mover = "automated"
            automated_delay_ms = 250

            [training]
            episodes = 500
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_piles().as_slice(), &[3, 4, 5]);
        assert_eq!(*config.first_mover(), Participant::Automated);
        assert_eq!(config.training().episodes().get(), 500);
        assert_eq!(*config.training().seed(), Some(7));
        assert_eq!(*config.training().learning_rate(), 0.5);
    }

    #[test]
    fn test_zero_episodes_rejected() {
        let err = GameConfig::from_toml_str("[training]\nepisodes = 0\n").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let err = GameConfig::from_toml_str("[training]\nexploration_rate = 1.5\n").unwrap_err();
        assert!(err.message.contains("exploration_rate"));
    }

    #[test]
    fn test_exhausted_layout_rejected() {
        assert!(GameConfig::from_toml_str("initial_piles = [0, 0]\n").is_err());
        assert!(GameConfig::from_toml_str("initial_piles = []\n").is_err());
    }

    #[test]
    fn test_setters_chain() {
        let config = GameConfig::default()
            .with_initial_piles(Piles::from(vec![2, 2]))
            .with_first_mover(Participant::Automated);
        assert_eq!(config.initial_piles().as_slice(), &[2, 2]);
        assert_eq!(*config.first_mover(), Participant::Automated);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_piles = [1, 1]").unwrap();

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_piles().as_slice(), &[1, 1]);
    }

    #[test]
    fn test_missing_file_reports_location() {
        let err = GameConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
        assert!(err.file.ends_with("config.rs"));
    }
}
