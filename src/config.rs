use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Tuning values consumed by the engine at startup, parsed from the same
/// JSON file the launcher hands to the renderer. Durations are whole
/// seconds; the engine converts them to ticks.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub lives: u32,
    pub speed: i32,
    pub vulnerable_seconds: u32,
    pub mode_schedule: Vec<u32>,
    pub map: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("movement speed must be a positive number of pixels per tick")]
    NonPositiveSpeed,
    #[error("mode schedule must contain at least one duration")]
    EmptySchedule,
    #[error("player must start with at least one life")]
    NoLives,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.speed <= 0 {
            return Err(ConfigError::NonPositiveSpeed);
        }
        if self.mode_schedule.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        Ok(())
    }
}
