//! Optional file logging.
//!
//! The terminal belongs to the UI, so logs go to
//! `<data dir>/constellation.log`, and only when `CONSTELLATION_LOG` holds a
//! filter directive such as `debug` or `constellation_background=trace`.

use std::fs::{self, File};
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CONSTELLATION_LOG";

/// Install the file logger if `CONSTELLATION_LOG` is set.
pub fn init() -> color_eyre::Result<()> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(());
    };

    let dirs = ProjectDirs::from("", "", "constellation")
        .ok_or_else(|| eyre!("could not determine a data directory for the log file"))?;
    fs::create_dir_all(dirs.data_dir())?;
    let file = File::create(dirs.data_dir().join("constellation.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("could not install logger: {e}"))
}
