//! Local store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("directory file I/O failed: {0}")]
    Io(String),

    #[error("directory file is corrupt: {0}")]
    Corrupt(String),

    #[error("home directory not found; cannot locate the local directory store")]
    NoHomeDir,
}
