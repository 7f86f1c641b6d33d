//! Recovery / bootstrap administrator configuration.

use serde::{Deserialize, Serialize};

fn default_admin_email() -> String {
    "admin@mazylab.com".to_string()
}

fn default_bootstrap_password() -> String {
    "mazylab-admin".to_string()
}

/// The single distinguished administrative identity.
///
/// Used twice: as the bootstrap account for a fresh local-mode directory,
/// and as the only identity eligible for emergency access when the remote
/// backend is degraded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoveryConfig {
    /// Email of the designated recovery administrator.
    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    /// Password accepted for the first-ever local-mode login when the
    /// directory is empty. Has no effect in remote mode.
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            bootstrap_password: default_bootstrap_password(),
        }
    }
}
