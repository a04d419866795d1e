//! Unified path management for bondalayze configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/bondalayze/        # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//! ```
//!
//! `BONDALAYZE_CONFIG_DIR` replaces the whole directory, which is how tests
//! and containers point the server somewhere else.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_DIR_ENV: &str = "BONDALAYZE_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves configuration paths, optionally rooted at an explicit directory.
#[derive(Debug, Clone, Default)]
pub struct BondaPaths {
    base: Option<PathBuf>,
}

impl BondaPaths {
    /// `base = None` resolves from the environment and the home directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    ///
    /// Priority: explicit base > `BONDALAYZE_CONFIG_DIR` > `~/.config/bondalayze`.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("bondalayze"))
    }

    /// Path to config.toml
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path to secret.json
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }
}
