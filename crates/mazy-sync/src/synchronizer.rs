//! PostgREST-style client for the `profiles` table.

use mazy_config::BackendConfig;
use mazy_core::{Profile, UserUpdate};
use mazy_identity::IdentityGateway;

use crate::error::SyncError;

#[derive(Clone)]
pub struct ProfileSynchronizer {
    base_url: String,
    anon_key: String,
    /// Bearer for REST calls: the service key when configured (directory
    /// writes touch other users' rows), otherwise the anon key.
    rest_key: String,
    client: reqwest::Client,
    gateway: IdentityGateway,
}

impl ProfileSynchronizer {
    #[must_use]
    pub fn new(config: &BackendConfig, gateway: IdentityGateway) -> Self {
        let rest_key = if config.has_service_key() {
            config.service_key.clone()
        } else {
            config.anon_key.clone()
        };
        Self {
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            rest_key,
            client: reqwest::Client::new(),
            gateway,
        }
    }

    /// Fetch the profile row for an identity id. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `SyncError::Network` on transport failure, `SyncError::Backend` on a
    /// non-success response.
    pub async fn fetch_profile(&self, identity_id: &str) -> Result<Option<Profile>, SyncError> {
        let url = format!(
            "{}/rest/v1/profiles?identity_id=eq.{}&select=*",
            self.base_url,
            urlencoding::encode(identity_id)
        );
        Ok(self.fetch_rows(&url).await?.into_iter().next())
    }

    /// Fetch the profile row matching an email. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_profile`].
    pub async fn fetch_profile_by_email(&self, email: &str) -> Result<Option<Profile>, SyncError> {
        let url = format!(
            "{}/rest/v1/profiles?email=eq.{}&select=*",
            self.base_url,
            urlencoding::encode(email)
        );
        Ok(self.fetch_rows(&url).await?.into_iter().next())
    }

    /// Every profile row, ordered by email. The caller projects these into
    /// the directory cache.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_profile`].
    pub async fn fetch_all_profiles(&self) -> Result<Vec<Profile>, SyncError> {
        let url = format!("{}/rest/v1/profiles?select=*&order=email.asc", self.base_url);
        self.fetch_rows(&url).await
    }

    /// Apply a partial update to the profile behind `email` and return the
    /// updated row, so the caller can refresh its in-memory view when the
    /// edited account is the active one.
    ///
    /// Only the fields the update names are sent; an empty update is a no-op
    /// read.
    ///
    /// # Errors
    ///
    /// `SyncError::UserNotFound` when the email resolves to no profile;
    /// otherwise as [`Self::fetch_profile`].
    pub async fn apply_update(&self, email: &str, update: &UserUpdate) -> Result<Profile, SyncError> {
        let current = self.resolve(email).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let url = format!(
            "{}/rest/v1/profiles?identity_id=eq.{}",
            self.base_url,
            urlencoding::encode(&current.identity_id)
        );
        let resp = self
            .client
            .patch(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.rest_key)
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("update profile: {e}")))?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }
        let mut rows: Vec<Profile> = resp
            .json()
            .await
            .map_err(|e| SyncError::Backend(format!("parse updated profile: {e}")))?;
        rows.pop().ok_or_else(|| SyncError::UserNotFound(email.to_string()))
    }

    /// Delete the account behind `email`.
    ///
    /// The identity record is removed through the gateway's admin surface;
    /// the profile row cascades through the backend's referential behavior.
    ///
    /// # Errors
    ///
    /// `SyncError::CannotDeleteSelf` when `email` is the active user, checked
    /// before any network call. `SyncError::UserNotFound` when it resolves to
    /// no profile.
    pub async fn delete_by_email(&self, email: &str, active_email: &str) -> Result<(), SyncError> {
        if email.eq_ignore_ascii_case(active_email) {
            return Err(SyncError::CannotDeleteSelf);
        }
        let profile = self.resolve(email).await?;
        self.gateway.admin_delete_user(&profile.identity_id).await?;
        Ok(())
    }

    /// Insert a profile row. Used after sign-up when the backend did not
    /// populate role/expiry itself.
    ///
    /// # Errors
    ///
    /// As [`Self::fetch_profile`].
    pub async fn insert_profile(&self, profile: &Profile) -> Result<Profile, SyncError> {
        let url = format!("{}/rest/v1/profiles", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.rest_key)
            .header("Prefer", "return=representation")
            .json(profile)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("insert profile: {e}")))?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }
        let mut rows: Vec<Profile> = resp
            .json()
            .await
            .map_err(|e| SyncError::Backend(format!("parse inserted profile: {e}")))?;
        rows.pop()
            .ok_or_else(|| SyncError::Backend("insert returned no row".into()))
    }

    /// Resolve an email to its profile row or fail with `UserNotFound`.
    async fn resolve(&self, email: &str) -> Result<Profile, SyncError> {
        self.fetch_profile_by_email(email)
            .await?
            .ok_or_else(|| SyncError::UserNotFound(email.to_string()))
    }

    async fn fetch_rows(&self, url: &str) -> Result<Vec<Profile>, SyncError> {
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.rest_key)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("fetch profiles: {e}")))?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| SyncError::Backend(format!("parse profiles: {e}")))
    }
}

async fn backend_error(resp: reqwest::Response) -> SyncError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let detail = body.trim();
    if detail.is_empty() {
        SyncError::Backend(format!("HTTP {status}"))
    } else {
        SyncError::Backend(format!("HTTP {status}: {detail}"))
    }
}
