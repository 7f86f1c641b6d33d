//! General application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Override for the local data directory (directory file, cached session
    /// token). Empty means `~/.mazylab`.
    #[serde(default)]
    pub data_dir: String,
}

impl GeneralConfig {
    /// Resolve the local data directory.
    ///
    /// Returns `None` only when no override is set and the home directory
    /// cannot be determined.
    #[must_use]
    pub fn data_path(&self) -> Option<PathBuf> {
        if self.data_dir.is_empty() {
            dirs::home_dir().map(|h| h.join(".mazylab"))
        } else {
            Some(PathBuf::from(&self.data_dir))
        }
    }

    /// Whether a custom data directory override is set.
    #[must_use]
    pub fn has_custom_data_dir(&self) -> bool {
        !self.data_dir.is_empty()
    }
}
