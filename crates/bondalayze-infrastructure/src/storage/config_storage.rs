//! config.toml: server, provider and per-stage settings.

use super::{StorageError, read_if_present};
use crate::paths::BondaPaths;
use bondalayze_core::config::AppConfig;
use std::path::{Path, PathBuf};

pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn open(paths: &BondaPaths) -> Result<Self, StorageError> {
        Ok(Self::at(paths.config_file()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every key is optional, so a missing or blank file is the default
    /// configuration.
    pub fn load(&self) -> Result<AppConfig, StorageError> {
        let Some(content) = read_if_present(&self.path)? else {
            tracing::debug!(
                "[ConfigStorage] {} absent or blank, using defaults",
                self.path.display()
            );
            return Ok(AppConfig::default());
        };
        toml::from_str(&content).map_err(|err| StorageError::Parse {
            path: self.path.clone(),
            format: "TOML",
            message: err.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
