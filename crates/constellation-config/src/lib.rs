//! Configuration for the constellation app.
//!
//! Settings live in `config.toml` under the platform config directory. The
//! theme is the one value the app writes back, so the last chosen theme is
//! restored on the next start.

use std::fs;
use std::path::{Path, PathBuf};

use constellation_core::Theme;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default delay between animation frames in milliseconds.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Errors from reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory to derive a config location from.
    #[error("could not determine a config directory")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be encoded.
    #[error("could not encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// App settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Last selected theme.
    pub theme: Theme,
    /// Delay between animation frames.
    pub frame_interval_ms: u64,
    /// Logical pixels per terminal column.
    pub cell_width: f64,
    /// Logical pixels per terminal row.
    pub cell_height: f64,
    /// Device pixel ratio reported to the renderer.
    pub pixel_ratio: f64,
    /// Draw a single static frame instead of animating.
    pub reduced_motion: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            cell_width: 8.0,
            cell_height: 16.0,
            pixel_ratio: 1.0,
            reduced_motion: false,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "constellation")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location, falling back to defaults.
    ///
    /// A missing file is not an error. An unreadable or malformed one is
    /// logged and ignored.
    pub fn load() -> Self {
        let loaded = Self::path().and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                warn!("using default configuration: {e}");
                Self::default()
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist a new theme to the default location, keeping other settings.
    pub fn save_theme(theme: Theme) -> Result<(), ConfigError> {
        let path = Self::path()?;
        Self::save_theme_to(&path, theme)
    }

    /// Persist a new theme to `path`, keeping other settings.
    pub fn save_theme_to(path: &Path, theme: Theme) -> Result<(), ConfigError> {
        let mut config = Self::load_from(path)?;
        config.theme = theme;
        config.save_to(path)?;
        debug!(path = %path.display(), %theme, "saved theme preference");
        Ok(())
    }

    /// Replace out-of-range numbers with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.frame_interval_ms == 0 {
            self.frame_interval_ms = defaults.frame_interval_ms;
        }
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            self.cell_width = defaults.cell_width;
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            self.cell_height = defaults.cell_height;
        }
        if !self.pixel_ratio.is_finite() {
            self.pixel_ratio = defaults.pixel_ratio;
        }
        self
    }
}
