//! secret.json: provider credentials, kept apart from config.toml so the
//! latter can be shared or committed.

use super::{StorageError, read_if_present};
use crate::paths::BondaPaths;
use bondalayze_core::config::SecretConfig;
use std::path::{Path, PathBuf};

/// Read-only access to secret.json. Never writes or validates keys.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn open(paths: &BondaPaths) -> Result<Self, StorageError> {
        Ok(Self::at(paths.secret_file()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fails with `Missing` when there is no secret.json; a blank file
    /// holds no credentials.
    pub fn load(&self) -> Result<SecretConfig, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::Missing(self.path.clone()));
        }
        let Some(content) = read_if_present(&self.path)? else {
            return Ok(SecretConfig::default());
        };
        serde_json::from_str(&content).map_err(|err| StorageError::Parse {
            path: self.path.clone(),
            format: "JSON",
            message: err.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
