//! Access-token cache: OS keychain with a file fallback.
//!
//! Lets a restarted process restore its session without re-prompting for
//! credentials. A cache miss is never an error; a stale token is detected
//! by the gateway when it validates against the backend.

use std::fs;
use std::path::PathBuf;

use crate::error::IdentityError;

const DEFAULT_KEYRING_SERVICE: &str = "mazylab";
const KEYRING_USER: &str = "session-token";
const SESSION_FILE_NAME: &str = "session";

/// Returns the keyring service name.
///
/// Override via `MAZY_KEYRING_SERVICE` for testing to avoid touching
/// production credentials.
fn keyring_service() -> String {
    std::env::var("MAZY_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

#[derive(Debug, Clone)]
pub struct TokenCache {
    file_path: PathBuf,
    use_keyring: bool,
}

impl TokenCache {
    /// Default cache: OS keychain, falling back to `~/.mazylab/session`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenCache` if the home directory cannot be
    /// resolved.
    pub fn new() -> Result<Self, IdentityError> {
        let home = dirs::home_dir().ok_or_else(|| {
            IdentityError::TokenCache("home directory not found; cannot cache session".into())
        })?;
        Ok(Self {
            file_path: home.join(".mazylab").join(SESSION_FILE_NAME),
            use_keyring: true,
        })
    }

    /// File-only cache at an explicit path. Used when a custom data
    /// directory is configured, and by tests.
    #[must_use]
    pub fn file_only(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            use_keyring: false,
        }
    }

    /// Store an access token. Falls back to the file if the keychain is
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenCache` if both keychain and file fail.
    pub fn store(&self, token: &str) -> Result<(), IdentityError> {
        if self.use_keyring {
            match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
                Ok(entry) => match entry.set_password(token) {
                    Ok(()) => return Ok(()),
                    Err(error) => {
                        tracing::warn!(%error, "keyring store failed; falling back to file");
                    }
                },
                Err(error) => {
                    tracing::warn!(%error, "keyring unavailable; falling back to file");
                }
            }
        }
        self.store_file(token)
    }

    /// Load a cached access token, if any. Priority: keychain, then file.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        if self.use_keyring {
            if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
                && let Ok(token) = entry.get_password()
                && !token.is_empty()
            {
                return Some(token);
            }
        }
        fs::read_to_string(&self.file_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Delete the cached token from keychain and file.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenCache` if the file exists but cannot be
    /// removed.
    pub fn delete(&self) -> Result<(), IdentityError> {
        if self.use_keyring {
            if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
                let _ = entry.delete_credential();
            }
        }
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).map_err(|e| {
                IdentityError::TokenCache(format!(
                    "failed to delete {}: {e}",
                    self.file_path.display()
                ))
            })?;
        }
        Ok(())
    }

    fn store_file(&self, token: &str) -> Result<(), IdentityError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                IdentityError::TokenCache(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(&self.file_path, token).map_err(|e| {
            IdentityError::TokenCache(format!("write {}: {e}", self.file_path.display()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600)).map_err(
                |e| {
                    IdentityError::TokenCache(format!(
                        "chmod {}: {e}",
                        self.file_path.display()
                    ))
                },
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_only_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let cache = TokenCache::file_only(tmp.path().join("session"));

        assert!(cache.load().is_none());
        cache.store("jwt-abc123").unwrap();
        assert_eq!(cache.load().as_deref(), Some("jwt-abc123"));

        cache.delete().unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn whitespace_only_file_is_a_miss() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session");
        std::fs::write(&path, "  \n ").unwrap();
        let cache = TokenCache::file_only(&path);
        assert!(cache.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let cache = TokenCache::file_only(tmp.path().join("session"));
        cache.store("jwt-abc123").unwrap();

        let mode = std::fs::metadata(tmp.path().join("session"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "session file should be 0600");
    }

    #[test]
    fn delete_with_nothing_cached_is_ok() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let cache = TokenCache::file_only(tmp.path().join("session"));
        cache.delete().unwrap();
    }
}
