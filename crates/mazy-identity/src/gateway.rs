//! The gateway to the remote identity provider.
//!
//! All auth REST calls go through here. The gateway owns the in-process
//! session, the cached token, and the broadcast bus the session controller
//! subscribes to.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::{RwLock, broadcast};

use mazy_config::BackendConfig;
use mazy_core::{Identity, UserMetadata};

use crate::error::IdentityError;
use crate::events::{AuthEvent, AuthEventKind, Session};
use crate::token_cache::TokenCache;

/// Fixed bound on the interactive sign-in race.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

const EVENT_BUS_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct IdentityGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    base_url: String,
    anon_key: String,
    service_key: String,
    client: reqwest::Client,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
    cache: TokenCache,
    login_timeout: Duration,
}

impl IdentityGateway {
    /// Gateway with the default token cache.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenCache` if the default cache location
    /// cannot be resolved.
    pub fn new(config: &BackendConfig) -> Result<Self, IdentityError> {
        Ok(Self::with_token_cache(config, TokenCache::new()?))
    }

    /// Gateway with an explicit token cache.
    #[must_use]
    pub fn with_token_cache(config: &BackendConfig, cache: TokenCache) -> Self {
        Self::with_options(config, cache, LOGIN_TIMEOUT)
    }

    /// Gateway with an explicit cache and sign-in timeout (tests shrink the
    /// timeout; production uses [`LOGIN_TIMEOUT`]).
    #[must_use]
    pub fn with_options(config: &BackendConfig, cache: TokenCache, login_timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            inner: Arc::new(GatewayInner {
                base_url: config.base_url().to_string(),
                anon_key: config.anon_key.clone(),
                service_key: config.service_key.clone(),
                client: reqwest::Client::new(),
                session: RwLock::new(None),
                events,
                cache,
                login_timeout,
            }),
        }
    }

    /// Subscribe to session transitions for the lifetime of the process.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    /// The current in-process session, if any.
    pub async fn get_session(&self) -> Option<Session> {
        self.inner.session.read().await.clone()
    }

    /// Verify credentials, raced against the sign-in timeout.
    ///
    /// The losing side of the race is abandoned, not cancelled: the spawned
    /// call keeps running, and if it eventually succeeds it still records
    /// the session and publishes the event. Callers re-check
    /// [`Self::get_session`] after a timeout for exactly this reason.
    ///
    /// # Errors
    ///
    /// `IdentityError::Timeout` when the timer wins; otherwise the mapped
    /// provider error.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        correlation: Option<u64>,
    ) -> Result<Session, IdentityError> {
        let inner = Arc::clone(&self.inner);
        let email = email.to_owned();
        let password = password.to_owned();
        let call = tokio::spawn(async move {
            inner.password_grant(&email, &password, correlation).await
        });

        match tokio::time::timeout(self.inner.login_timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(IdentityError::Unknown(format!(
                "sign-in task failed: {join_error}"
            ))),
            Err(_elapsed) => Err(IdentityError::Timeout),
        }
    }

    /// Register a new identity.
    ///
    /// If the provider auto-creates a session (email confirmation disabled),
    /// it is installed and published with the given correlation id so the
    /// caller can suppress the notification and sign out again.
    ///
    /// # Errors
    ///
    /// `IdentityError::AlreadyRegistered` when the email exists; otherwise
    /// the mapped provider error.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
        correlation: Option<u64>,
    ) -> Result<Identity, IdentityError> {
        let url = format!("{}/auth/v1/signup", self.inner.base_url);
        let resp = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await
            .map_err(|e| IdentityError::Network(format!("sign-up: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &body));
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| IdentityError::Unknown(format!("parse sign-up response: {e}")))?;

        if value.get("access_token").is_some() {
            #[derive(Deserialize)]
            struct SignUpSession {
                access_token: String,
                user: Identity,
            }
            let granted: SignUpSession = serde_json::from_value(value)
                .map_err(|e| IdentityError::Unknown(format!("parse sign-up session: {e}")))?;
            let session = Session {
                access_token: granted.access_token,
                identity: granted.user,
            };
            self.inner.install_session(session.clone(), correlation).await;
            return Ok(session.identity);
        }

        serde_json::from_value(value)
            .map_err(|e| IdentityError::Unknown(format!("parse sign-up identity: {e}")))
    }

    /// Best-effort sign-out.
    ///
    /// The in-process session and cached token are cleared before the
    /// network call; a rejected or failed logout request is logged and
    /// otherwise ignored.
    ///
    /// Returns `true` when a session existed and a `SignedOut` event was
    /// published, `false` when there was nothing to clear. Callers that
    /// issued a correlation token must withdraw it on `false`, since no
    /// event will ever carry it.
    pub async fn sign_out(&self, correlation: Option<u64>) -> bool {
        let session = self.inner.session.write().await.take();
        if let Err(error) = self.inner.cache.delete() {
            tracing::warn!(%error, "failed to clear cached session token");
        }
        let Some(session) = session else { return false };

        let _ = self.inner.events.send(AuthEvent {
            kind: AuthEventKind::SignedOut,
            correlation,
        });

        let url = format!("{}/auth/v1/logout", self.inner.base_url);
        let result = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => tracing::warn!(status = %resp.status(), "backend sign-out rejected"),
            Err(error) => tracing::warn!(%error, "backend sign-out failed"),
        }
        true
    }

    /// Resolve the identity behind an access token.
    ///
    /// Returns `Ok(None)` when the token is no longer accepted.
    ///
    /// # Errors
    ///
    /// Returns the mapped provider error for responses other than success
    /// or 401/403.
    pub async fn get_identity(&self, access_token: &str) -> Result<Option<Identity>, IdentityError> {
        let url = format!("{}/auth/v1/user", self.inner.base_url);
        let resp = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Network(format!("get identity: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json()
                .await
                .map(Some)
                .map_err(|e| IdentityError::Unknown(format!("parse identity: {e}")));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(parse_auth_error(status.as_u16(), &body))
    }

    /// Restore a session from the cached token, validating it against the
    /// backend. Publishes `SignedIn` with the given correlation id on
    /// success. A stale token is dropped silently.
    pub async fn restore_session(&self, correlation: Option<u64>) -> Option<Session> {
        if let Some(existing) = self.get_session().await {
            return Some(existing);
        }
        let token = self.inner.cache.load()?;
        match self.get_identity(&token).await {
            Ok(Some(identity)) => {
                let session = Session {
                    access_token: token,
                    identity,
                };
                self.inner.install_session(session.clone(), correlation).await;
                Some(session)
            }
            Ok(None) => {
                if let Err(error) = self.inner.cache.delete() {
                    tracing::warn!(%error, "failed to drop stale session token");
                }
                None
            }
            Err(error) => {
                tracing::warn!(%error, "session restore failed");
                None
            }
        }
    }

    /// Delete an identity via the provider's admin surface. The profile row
    /// cascades through the backend's referential behavior.
    ///
    /// # Errors
    ///
    /// `IdentityError::MisconfiguredBackend` without a service key;
    /// otherwise the mapped provider error.
    pub async fn admin_delete_user(&self, identity_id: &str) -> Result<(), IdentityError> {
        let key = self.require_service_key()?;
        let url = format!("{}/auth/v1/admin/users/{identity_id}", self.inner.base_url);
        let resp = self
            .inner
            .client
            .delete(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| IdentityError::Network(format!("admin delete: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &body));
        }
        Ok(())
    }

    /// Set a new password for an identity via the provider's admin surface.
    ///
    /// # Errors
    ///
    /// `IdentityError::MisconfiguredBackend` without a service key;
    /// otherwise the mapped provider error.
    pub async fn admin_update_password(
        &self,
        identity_id: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let key = self.require_service_key()?;
        let url = format!("{}/auth/v1/admin/users/{identity_id}", self.inner.base_url);
        let resp = self
            .inner
            .client
            .put(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| IdentityError::Network(format!("admin password update: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &body));
        }
        Ok(())
    }

    fn require_service_key(&self) -> Result<&str, IdentityError> {
        if self.inner.service_key.is_empty() {
            return Err(IdentityError::MisconfiguredBackend);
        }
        Ok(&self.inner.service_key)
    }
}

impl GatewayInner {
    async fn password_grant(
        &self,
        email: &str,
        password: &str,
        correlation: Option<u64>,
    ) -> Result<Session, IdentityError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Network(format!("sign-in: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &body));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            user: Identity,
        }
        let granted: TokenResponse = resp
            .json()
            .await
            .map_err(|e| IdentityError::Unknown(format!("parse sign-in response: {e}")))?;

        let session = Session {
            access_token: granted.access_token,
            identity: granted.user,
        };
        self.install_session(session.clone(), correlation).await;
        Ok(session)
    }

    /// Record a new session and publish the transition exactly once.
    async fn install_session(&self, session: Session, correlation: Option<u64>) {
        if let Err(error) = self.cache.store(&session.access_token) {
            tracing::warn!(%error, "failed to cache session token");
        }
        *self.session.write().await = Some(session.clone());
        let _ = self.events.send(AuthEvent {
            kind: AuthEventKind::SignedIn(session),
            correlation,
        });
    }
}

/// Map a provider error response onto the error taxonomy.
///
/// Checks the structured `error_code`/`error` fields first, then falls back
/// to message text, then to `Unknown` carrying the raw detail.
fn parse_auth_error(status: u16, body: &str) -> IdentityError {
    let value: serde_json::Value = serde_json::from_str(body).unwrap_or(serde_json::Value::Null);
    let code = value
        .get("error_code")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .unwrap_or_default();
    let message = value
        .get("error_description")
        .or_else(|| value.get("msg"))
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or(body)
        .trim();
    let lower = message.to_lowercase();

    if status == 401 && (code == "invalid_api_key" || lower.contains("api key")) {
        return IdentityError::MisconfiguredBackend;
    }
    if code == "email_not_confirmed" || lower.contains("email not confirmed") {
        return IdentityError::EmailNotConfirmed;
    }
    if matches!(code, "invalid_credentials" | "invalid_grant")
        || lower.contains("invalid login credentials")
    {
        return IdentityError::InvalidCredentials;
    }
    if matches!(code, "user_already_exists" | "email_exists")
        || lower.contains("already registered")
        || lower.contains("already exists")
    {
        return IdentityError::AlreadyRegistered;
    }
    if message.is_empty() {
        return IdentityError::Unknown(format!("HTTP {status}"));
    }
    IdentityError::Unknown(format!("HTTP {status}: {message}"))
}
