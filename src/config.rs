//! Settings read once at startup from `<config_dir>/wavdeck/config.toml`.
//!
//! Every key is optional. A missing file means defaults; a file that does
//! not parse is an error so typos do not go unnoticed.
use ratatui::style::Color;
use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::reporter::DEFAULT_TICK;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    /// Frames per audio block; pending seeks are applied once per block.
    pub block_frames: usize,
    pub seek_step_secs: f64,
    pub output_device: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK.as_millis() as u64,
            block_frames: 512,
            seek_step_secs: 5.0,
            output_device: None,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub theme: String,
    pub start_dir: Option<PathBuf>,
    pub frame_ms: u64,
    pub colors: ColorOverrides,
}

/// Per-colour tweaks on top of the chosen theme, e.g. `start = "#00ff00"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorOverrides {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub start: Option<Color>,
    pub stop: Option<Color>,
    pub pause: Option<Color>,
    pub slider: Option<Color>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: String::from("Classic"),
            start_dir: None,
            frame_ms: 50,
            colors: ColorOverrides::default(),
        }
    }
}

impl UiConfig {
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Where the file picker opens: the configured directory, else the
    /// desktop, else home, else the working directory.
    pub fn picker_dir(&self) -> PathBuf {
        self.start_dir
            .clone()
            .filter(|dir| dir.is_dir())
            .or_else(dirs::desktop_dir)
            .filter(|dir| dir.is_dir())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("wavdeck").join("wavdeck.log")))
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wavdeck").join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
