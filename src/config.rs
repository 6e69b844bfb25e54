use crate::domain::LevelTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pomodoro durations in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroConfig {
    pub work_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
    /// Every Nth finished work session is followed by a long break
    pub long_break_every: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_every: 4,
        }
    }
}

/// Settings stored in config.json. Every field is optional in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where user files live. None means the working directory
    pub data_dir: Option<PathBuf>,
    pub pomodoro: PomodoroConfig,
    pub points_per_task: u64,
    pub levels: LevelTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            pomodoro: PomodoroConfig::default(),
            points_per_task: 10,
            levels: LevelTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pomodoro.long_break_every must be at least 1")]
    ZeroLongBreakInterval,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pomodoro.long_break_every == 0 {
            return Err(ConfigError::ZeroLongBreakInterval);
        }
        Ok(())
    }

    /// Data directory, falling back to the working directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Default location: <config dir>/agenda/config.json
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agenda").join("config.json"))
}

/// Load config from a JSON file. A missing file gives the defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
