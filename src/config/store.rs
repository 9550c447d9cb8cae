//! Live configuration handle.
//!
//! Readers take a cheap `Arc<Config>` snapshot; `reload` swaps it in place so
//! templates change for every message sent afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::common::error::{ConfigError, ConfigResult};
use crate::config::env::apply_env_overrides;
use crate::config::load_and_validate;
use crate::config::types::Config;

/// Bundled configuration written out when no file exists yet.
pub const DEFAULT_CONFIG: &str = include_str!("default.conf");

#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<Config>>,
}

impl ConfigStore {
    /// Open the config at `path`, writing the bundled default first if missing.
    ///
    /// Load failures are logged and the built-in defaults are used instead.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        ensure_default_config(&path);

        let config = match load_and_validate(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                warn!("Using built-in configuration defaults");
                apply_env_overrides(Config::default())
            }
        };

        Self {
            path: Some(path),
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// A store holding `config` with no backing file.
    pub fn fixed(config: Config) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Current configuration.
    pub fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&self.current.read())
    }

    /// Re-read the backing file. On failure the previous configuration stays active.
    pub fn reload(&self) -> ConfigResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        match load_and_validate(path) {
            Ok(config) => {
                *self.current.write() = Arc::new(config);
                info!("Reloaded configuration from {}", path.display());
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to reload {}: {} (keeping previous configuration)",
                    path.display(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Swap in a configuration directly.
    pub fn replace(&self, config: Config) {
        *self.current.write() = Arc::new(config);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn ensure_default_config(path: &Path) {
    if path.exists() {
        return;
    }
    if let Err(e) = write_default_config(path) {
        error!("Unable to save default config to {}: {}", path.display(), e);
    } else {
        info!("Wrote default configuration to {}", path.display());
    }
}

fn write_default_config(path: &Path) -> ConfigResult<()> {
    let io_error = |source: std::io::Error| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, DEFAULT_CONFIG).map_err(io_error)
}
