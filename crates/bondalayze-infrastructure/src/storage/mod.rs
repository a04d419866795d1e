//! Loaders for the files in the config directory.

pub mod config_storage;
pub mod secret_storage;

pub use config_storage::ConfigStorage;
pub use secret_storage::SecretStorage;

use crate::paths::PathError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {format} in {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Cannot locate the config directory: {0}")]
    NoConfigDir(#[from] PathError),
}

/// File contents, `None` when the file does not exist or is blank.
fn read_if_present(path: &Path) -> Result<Option<String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
