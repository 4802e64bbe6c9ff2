//! Application configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) yields the stock
//! 21×21 maze seen from the usual orbit.

use std::path::Path;

use mazescape_sync::MazeConfig;
use serde::{Deserialize, Serialize};

use crate::camera::OrbitConfig;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub maze: MazeConfig,
    pub orbit: OrbitConfig,
    /// Seed for the maze generator. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.display(), side = config.maze.side, "loaded config");
        Ok(config)
    }

    /// Load `path` if given, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.maze
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let Some(problem) = self.orbit.problem() {
            return Err(ConfigError::Invalid(problem.to_string()));
        }
        Ok(())
    }

    /// Orbit radius: the configured one, or the diagonal of the maze cube.
    pub fn orbit_distance(&self) -> f32 {
        self.orbit
            .distance
            .unwrap_or_else(|| self.maze.orbit_distance())
    }
}
