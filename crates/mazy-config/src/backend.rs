//! Remote identity/profile backend configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend base URL (e.g., `https://abc123.backend.mazylab.com`).
    #[serde(default)]
    pub url: String,

    /// Public (anonymous) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,

    /// Elevated service key for admin-only operations (user deletion,
    /// password updates). Optional; admin operations fail without it.
    #[serde(default)]
    pub service_key: String,
}

impl BackendConfig {
    /// Whether the remote backend should be used at all.
    ///
    /// This is the single input to the session controller's startup
    /// LocalMode/RemoteMode decision: URL present and well-formed, plus a
    /// non-empty public key. An invalid URL forces local mode rather than
    /// failing at the first network call.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.anon_key.is_empty() && self.url_is_valid()
    }

    /// Whether admin-only operations can be attempted.
    #[must_use]
    pub fn has_service_key(&self) -> bool {
        !self.service_key.is_empty()
    }

    /// Minimal URL shape check: http(s) scheme plus a non-empty host.
    #[must_use]
    pub fn url_is_valid(&self) -> bool {
        let Some(rest) = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
        else {
            return false;
        };
        let host = rest.split('/').next().unwrap_or_default();
        !host.is_empty() && !host.contains(char::is_whitespace)
    }

    /// Base URL with any trailing slash removed, for joining request paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
