//! Simulation config (TOML)
//!
//! Все поля опциональны в файле — отсутствующие берутся из `Default`.
//!
//! ```toml
//! seed = 7
//! fixed_hz = 60.0
//! sound_pitch_variation = 0.1
//! default_music_fade_secs = 0.5
//! log_level = "info"
//! ```

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::logger::LogLevel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Глобальные параметры симуляции (resource)
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate (для rig'ов в RigUpdateMode::Fixed)
    pub fixed_hz: f64,
    /// ± разброс pitch у SoundRequest (0.0 = всегда 1.0)
    pub sound_pitch_variation: f32,
    /// Crossfade к default music (старт rig'а и выход из последней зоны)
    pub default_music_fade_secs: f32,
    pub log_level: LogLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fixed_hz: 60.0,
            sound_pitch_variation: 0.1,
            default_music_fade_secs: 0.5,
            log_level: LogLevel::Debug,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
