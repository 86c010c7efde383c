//! Viewer configuration: a small JSON file plus CLI overrides.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/ecview/config.json (fallback ~/.config/ecview/config.json)

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::bounds::DEFAULT_MARGIN;
use crate::source::DEFAULT_SOURCE_PATH;
use crate::update::{LoopConfig, DEFAULT_PERIOD, DEFAULT_WINDOW};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Strings handed to the renderer. Not part of the loop's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series_names: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "ectools demo".into(),
            x_label: "Time (s)".into(),
            y_label: "Power (W)".into(),
            series_names: vec!["WATTMETER".into(), "CPU_MINMAX".into(), "CPU_ADAPT".into()],
        }
    }
}

impl DisplayConfig {
    /// Legend entry for series `idx` (0 is the first value after the timestamp).
    pub fn series_name(&self, idx: usize) -> String {
        self.series_names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("series {}", idx + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub source: PathBuf,
    pub interval_ms: u64,
    pub window: usize,
    pub margin: f64,
    pub display: DisplayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_PATH),
            interval_ms: DEFAULT_PERIOD.as_millis() as u64,
            window: DEFAULT_WINDOW,
            margin: DEFAULT_MARGIN,
            display: DisplayConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid("interval_ms must be > 0".into()));
        }
        if self.window == 0 {
            return Err(ConfigError::Invalid("window must be > 0".into()));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::Invalid(
                "margin must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    /// The part of the config the poll loop needs.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            period: Duration::from_millis(self.interval_ms),
            window: self.window,
            margin: self.margin,
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("ecview")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ecview")
    }
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// A missing file yields the defaults; a broken one is an error.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ViewerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_config(path: &Path, cfg: &ViewerConfig) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let data = serde_json::to_vec_pretty(cfg).map_err(|e| write_err(e.into()))?;
    fs::write(path, data).map_err(write_err)
}
