//! # mazy-store
//!
//! Local user-directory store backing Mazylab's offline (local) mode.
//!
//! A single JSON document holds two slots: the serialized user list
//! (`users`) and the serialized current session pointer (`current_user`).
//! Single-writer, single-process; no locking.

mod error;

pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mazy_core::User;

const DIRECTORY_FILE_NAME: &str = "directory.json";

/// A locally registered user: the shared `User` view plus the stored
/// credential local-mode login checks against. Remote mode never
/// materializes this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

/// On-disk layout: two string-keyed slots in one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    users: Vec<LocalUser>,
    #[serde(default)]
    current_user: Option<User>,
}

/// File-backed directory store.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    path: PathBuf,
}

impl DirectoryStore {
    /// Store backed by the given file path. No I/O happens until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, `~/.mazylab/directory.json`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if the home directory cannot be resolved.
    pub fn open_default() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::new(home.join(".mazylab").join(DIRECTORY_FILE_NAME)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All locally registered users. A missing file is an empty directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on unreadable or corrupt data.
    pub fn list_users(&self) -> Result<Vec<LocalUser>, StoreError> {
        Ok(self.read()?.users)
    }

    /// Replace the user list, preserving the current-user slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub fn save_users(&self, users: &[LocalUser]) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.users = users.to_vec();
        self.write(&file)
    }

    /// The persisted current session pointer, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on unreadable or corrupt data.
    pub fn current_user(&self) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.current_user)
    }

    /// Set or clear the persisted current session pointer, preserving the
    /// user list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub fn set_current_user(&self, user: Option<&User>) -> Result<(), StoreError> {
        let mut file = self.read()?;
        file.current_user = user.cloned();
        self.write(&file)
    }

    fn read(&self) -> Result<DirectoryFile, StoreError> {
        if !self.path.exists() {
            return Ok(DirectoryFile::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Io(format!("read {}: {e}", self.path.display())))?;
        if raw.trim().is_empty() {
            return Ok(DirectoryFile::default());
        }
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn write(&self, file: &DirectoryFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let raw = serde_json::to_string_pretty(file)
            .map_err(|e| StoreError::Io(format!("serialize directory: {e}")))?;
        fs::write(&self.path, raw)
            .map_err(|e| StoreError::Io(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::Io(format!("chmod {}: {e}", self.path.display())))?;
        }

        Ok(())
    }
}
