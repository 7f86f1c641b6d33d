//! The session controller: mode decision, login and registration flows,
//! directory operations, and the published state channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};

use mazy_config::{MazyConfig, RecoveryConfig};
use mazy_core::{Profile, Role, User, UserMetadata, UserUpdate, extend_expiry};
use mazy_identity::{AuthEvent, AuthEventKind, IdentityError, IdentityGateway, TokenCache};
use mazy_store::{DirectoryStore, LocalUser, StoreError};
use mazy_sync::ProfileSynchronizer;

use crate::error::SessionError;
use crate::recovery::RecoveryIdentity;
use crate::state::{SessionMode, SessionState};
use crate::suppression::SuppressionTokens;

/// How long a failed sign-in waits before the mandatory session re-check,
/// giving an abandoned (timed-out) call a chance to land.
const SESSION_RECHECK_GRACE: Duration = Duration::from_millis(250);

const DIRECTORY_FILE_NAME: &str = "directory.json";
const SESSION_FILE_NAME: &str = "session";

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    /// True only for the emergency-access path.
    pub emergency: bool,
    /// Set when login succeeded in a degraded way the user should know about.
    pub warning: Option<String>,
}

/// The session controller. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    backend: Backend,
    recovery: RecoveryIdentity,
    bootstrap_password: String,
    tokens: Arc<SuppressionTokens>,
    state: watch::Sender<SessionState>,
    event_loop_started: AtomicBool,
}

enum Backend {
    Local {
        store: DirectoryStore,
    },
    Remote {
        gateway: IdentityGateway,
        sync: ProfileSynchronizer,
    },
}

impl SessionController {
    /// Build a controller from configuration, deciding the mode **once**:
    /// a configured backend means remote mode, anything else (missing URL,
    /// malformed URL, missing key) means local mode. The decision is never
    /// re-evaluated for the lifetime of the controller.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` when no data directory can be resolved,
    /// or `SessionError::Identity` when the token cache cannot be set up.
    pub fn new(config: &MazyConfig) -> Result<Self, SessionError> {
        if config.backend.is_configured() {
            let cache = if config.general.has_custom_data_dir() {
                let data = config.general.data_path().ok_or(StoreError::NoHomeDir)?;
                TokenCache::file_only(data.join(SESSION_FILE_NAME))
            } else {
                TokenCache::new()?
            };
            let gateway = IdentityGateway::with_token_cache(&config.backend, cache);
            let sync = ProfileSynchronizer::new(&config.backend, gateway.clone());
            Ok(Self::remote(gateway, sync, &config.recovery))
        } else {
            let data = config.general.data_path().ok_or(StoreError::NoHomeDir)?;
            let store = DirectoryStore::new(data.join(DIRECTORY_FILE_NAME));
            Ok(Self::local(store, &config.recovery))
        }
    }

    /// Local-mode controller over an explicit directory store.
    #[must_use]
    pub fn local(store: DirectoryStore, recovery: &RecoveryConfig) -> Self {
        Self::build(Backend::Local { store }, recovery)
    }

    /// Remote-mode controller over explicit gateway and synchronizer parts.
    #[must_use]
    pub fn remote(
        gateway: IdentityGateway,
        sync: ProfileSynchronizer,
        recovery: &RecoveryConfig,
    ) -> Self {
        Self::build(Backend::Remote { gateway, sync }, recovery)
    }

    fn build(backend: Backend, recovery: &RecoveryConfig) -> Self {
        let mode = match backend {
            Backend::Local { .. } => SessionMode::Local,
            Backend::Remote { .. } => SessionMode::Remote,
        };
        let (state, _) = watch::channel(SessionState::new(mode));
        Self {
            inner: Arc::new(ControllerInner {
                backend,
                recovery: RecoveryIdentity::new(recovery),
                bootstrap_password: recovery.bootstrap_password.clone(),
                tokens: Arc::new(SuppressionTokens::new()),
                state,
                event_loop_started: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.inner.state.borrow().mode
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Initialize the controller.
    ///
    /// Remote mode starts the auth event loop, restores any cached session
    /// and resolves it into a logged-in state. Local mode loads the persisted
    /// current user and directory.
    ///
    /// # Errors
    ///
    /// Store or synchronizer failures; a missing cached session is not an
    /// error.
    pub async fn init(&self) -> Result<(), SessionError> {
        match &self.inner.backend {
            Backend::Local { store } => {
                let current = store.current_user()?;
                let users = local_directory(store)?;
                self.inner.publish(current, users, false);
                Ok(())
            }
            Backend::Remote { gateway, sync } => {
                self.start_event_loop(gateway);
                let token = self.inner.tokens.issue();
                match gateway.restore_session(Some(token)).await {
                    Some(session) => {
                        let user = self.inner.resolve_remote_user(&session.identity, sync).await?;
                        let users = self.inner.load_directory(sync).await;
                        self.inner.publish(Some(user), users, false);
                    }
                    None => self.inner.tokens.discard(token),
                }
                Ok(())
            }
        }
    }

    /// Log in. See [`ControllerInner::login_remote`] for the remote flow.
    ///
    /// # Errors
    ///
    /// `SessionError::Identity` with the failure category; never a panic,
    /// never a raw transport string.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        match &self.inner.backend {
            Backend::Local { store } => self.inner.login_local(store, email, password),
            Backend::Remote { gateway, sync } => {
                self.inner.login_remote(gateway, sync, email, password).await
            }
        }
    }

    /// Register a new account. Never establishes a session.
    ///
    /// # Errors
    ///
    /// `SessionError::Validation` before any I/O when name or phone is
    /// blank; `IdentityError::AlreadyRegistered` (never retried) when the
    /// email exists.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone: &str,
    ) -> Result<(), SessionError> {
        validate_registration(email, password, name, phone)?;
        match &self.inner.backend {
            Backend::Local { store } => {
                self.inner.register_local(store, email, password, name, phone)
            }
            Backend::Remote { gateway, .. } => {
                self.inner
                    .register_remote(gateway, email, password, name, phone)
                    .await
            }
        }
    }

    /// Add a user to the directory (admin operation).
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` on a duplicate email; validation and backend
    /// errors otherwise.
    pub async fn add_user(&self, user: &User, password: &str) -> Result<(), SessionError> {
        validate_registration(&user.email, password, &user.name, &user.phone)?;
        match &self.inner.backend {
            Backend::Local { store } => self.inner.add_user_local(store, user, password),
            Backend::Remote { gateway, sync } => {
                self.inner.add_user_remote(gateway, sync, user, password).await
            }
        }
    }

    /// Apply a partial update to the user behind `email` and return the
    /// refreshed record. Fields the update does not name are untouched. When
    /// the edited account is the active one, the published current user is
    /// refreshed too.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the email resolves to nothing.
    pub async fn update_user(&self, email: &str, update: &UserUpdate) -> Result<User, SessionError> {
        match &self.inner.backend {
            Backend::Local { store } => self.inner.update_user_local(store, email, update),
            Backend::Remote { sync, .. } => self.inner.update_user_remote(sync, email, update).await,
        }
    }

    /// Delete the user behind `email`.
    ///
    /// # Errors
    ///
    /// `CannotDeleteSelf` when `email` is the active user, rejected before
    /// any I/O in both modes.
    pub async fn delete_user(&self, email: &str) -> Result<(), SessionError> {
        let active = self.inner.state.borrow().current_user.clone();
        if let Some(active) = &active
            && active.email.eq_ignore_ascii_case(email)
        {
            return Err(SessionError::CannotDeleteSelf);
        }
        match &self.inner.backend {
            Backend::Local { store } => self.inner.delete_user_local(store, email),
            Backend::Remote { sync, .. } => {
                let active_email = active.map(|u| u.email).unwrap_or_default();
                sync.delete_by_email(email, &active_email).await?;
                let users = self.inner.load_directory(sync).await;
                self.inner.publish_users(users);
                Ok(())
            }
        }
    }

    /// Extend a subscription by `days`, baselining at *now* when the current
    /// expiry is absent or already past.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the email resolves to nothing.
    pub async fn extend_subscription(&self, email: &str, days: i64) -> Result<User, SessionError> {
        let current = match &self.inner.backend {
            Backend::Local { store } => {
                find_local_user(store, email)?
                    .ok_or_else(|| SessionError::UserNotFound(email.to_string()))?
                    .user
                    .expires_at
            }
            Backend::Remote { sync, .. } => sync
                .fetch_profile_by_email(email)
                .await?
                .ok_or_else(|| SessionError::UserNotFound(email.to_string()))?
                .expires_at,
        };
        let extended = extend_expiry(current, days, Utc::now());
        let update = UserUpdate::builder().expires_at(Some(extended)).build();
        self.update_user(email, &update).await
    }

    /// Change a user's password.
    ///
    /// # Errors
    ///
    /// `Validation` on a blank password before any I/O; `UserNotFound` when
    /// the email resolves to nothing.
    pub async fn update_password(&self, email: &str, new_password: &str) -> Result<(), SessionError> {
        if new_password.trim().is_empty() {
            return Err(SessionError::Validation("Password is required.".into()));
        }
        match &self.inner.backend {
            Backend::Local { store } => {
                let mut users = store.list_users()?;
                let entry = users
                    .iter_mut()
                    .find(|u| u.user.email.eq_ignore_ascii_case(email))
                    .ok_or_else(|| SessionError::UserNotFound(email.to_string()))?;
                entry.password = new_password.to_string();
                store.save_users(&users)?;
                Ok(())
            }
            Backend::Remote { gateway, sync } => {
                let profile = sync
                    .fetch_profile_by_email(email)
                    .await?
                    .ok_or_else(|| SessionError::UserNotFound(email.to_string()))?;
                gateway
                    .admin_update_password(&profile.identity_id, new_password)
                    .await?;
                Ok(())
            }
        }
    }

    /// Log out. The published state is cleared synchronously before this
    /// returns; the network sign-out is spawned and never awaited.
    ///
    /// # Errors
    ///
    /// Local mode only: the persisted session pointer could not be cleared.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.inner.publish_current(None, false);
        match &self.inner.backend {
            Backend::Local { store } => {
                store.set_current_user(None)?;
            }
            Backend::Remote { gateway, .. } => {
                let token = self.inner.tokens.issue();
                let gateway = gateway.clone();
                let tokens = Arc::clone(&self.inner.tokens);
                tokio::spawn(async move {
                    if !gateway.sign_out(Some(token)).await {
                        tokens.discard(token);
                    }
                });
            }
        }
        Ok(())
    }

    /// Start the auth event loop exactly once. Holds the controller weakly
    /// so a dropped controller tears the loop down.
    fn start_event_loop(&self, gateway: &IdentityGateway) {
        if self
            .inner
            .event_loop_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let mut events = gateway.subscribe();
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(inner) = weak.upgrade() else { break };
                        inner.handle_auth_event(event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

impl ControllerInner {
    /// Remote login, in order:
    /// 1. spawn a best-effort sign-out of any stale session;
    /// 2. race `sign_in` against the gateway's fixed timeout;
    /// 3. on failure, the mandatory single session re-check: the abandoned
    ///    call may have landed a live session for this email, which counts
    ///    as success;
    /// 4. still failed and the email is the recovery identity (and the error
    ///    is not bad credentials): emergency access;
    /// 5. otherwise the typed failure.
    async fn login_remote(
        &self,
        gateway: &IdentityGateway,
        sync: &ProfileSynchronizer,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        if gateway.get_session().await.is_some() {
            let stale_token = self.tokens.issue();
            let stale = gateway.clone();
            let tokens = Arc::clone(&self.tokens);
            tokio::spawn(async move {
                if !stale.sign_out(Some(stale_token)).await {
                    tokens.discard(stale_token);
                }
            });
        }

        let token = self.tokens.issue();
        let session = match gateway.sign_in(email, password, Some(token)).await {
            Ok(session) => session,
            Err(error) => {
                if matches!(error, IdentityError::Timeout) {
                    tokio::time::sleep(SESSION_RECHECK_GRACE).await;
                }
                match gateway.get_session().await {
                    Some(live) if live.identity.email.eq_ignore_ascii_case(email) => live,
                    _ => {
                        self.tokens.discard(token);
                        if self.recovery.matches(email)
                            && !matches!(error, IdentityError::InvalidCredentials)
                        {
                            tracing::warn!(%error, "backend degraded; granting emergency access");
                            return Ok(self.emergency_login());
                        }
                        return Err(SessionError::Identity(error));
                    }
                }
            }
        };

        let user = self.resolve_remote_user(&session.identity, sync).await?;
        let users = self.load_directory(sync).await;
        self.publish(Some(user.clone()), users, false);
        Ok(LoginOutcome {
            user,
            emergency: false,
            warning: None,
        })
    }

    /// Emergency access: a synthesized in-memory admin for the recovery
    /// identity only. Nothing is persisted and no session exists.
    fn emergency_login(&self) -> LoginOutcome {
        let user = self.recovery.admin_user();
        self.state.send_modify(|state| {
            state.current_user = Some(user.clone());
            state.emergency = true;
        });
        LoginOutcome {
            user,
            emergency: true,
            warning: Some(
                "The backend could not be reached. You are signed in with emergency \
                 administrator access; changes are not synchronized."
                    .into(),
            ),
        }
    }

    fn login_local(
        &self,
        store: &DirectoryStore,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        let mut users = store.list_users()?;

        // Bootstrap: an empty directory accepts the configured recovery
        // admin once, creating the record as a side effect.
        if users.is_empty() && self.recovery.matches(email) && password == self.bootstrap_password {
            let admin = LocalUser {
                user: self.recovery.admin_user(),
                password: password.to_string(),
            };
            users.push(admin.clone());
            store.save_users(&users)?;
            store.set_current_user(Some(&admin.user))?;
            self.publish(Some(admin.user.clone()), vec![admin.user.clone()], false);
            return Ok(LoginOutcome {
                user: admin.user,
                emergency: false,
                warning: None,
            });
        }

        let matched = users
            .iter()
            .find(|u| u.user.email.eq_ignore_ascii_case(email) && u.password == password)
            .cloned()
            .ok_or(SessionError::Identity(IdentityError::InvalidCredentials))?;

        store.set_current_user(Some(&matched.user))?;
        let directory = users.into_iter().map(|u| u.user).collect();
        self.publish(Some(matched.user.clone()), directory, false);
        Ok(LoginOutcome {
            user: matched.user,
            emergency: false,
            warning: None,
        })
    }

    /// Remote registration. The sign-up call carries a suppression token so
    /// the auto-created session (when the provider grants one) never surfaces
    /// as a login; that session is signed out again before returning.
    async fn register_remote(
        &self,
        gateway: &IdentityGateway,
        email: &str,
        password: &str,
        name: &str,
        phone: &str,
    ) -> Result<(), SessionError> {
        let metadata = UserMetadata {
            name: name.to_string(),
            phone: phone.to_string(),
        };
        let token = self.tokens.issue();
        let result = gateway.sign_up(email, password, &metadata, Some(token)).await;
        if let Err(error) = result {
            self.tokens.discard(token);
            return Err(SessionError::Identity(error));
        }

        match gateway.get_session().await {
            Some(session) if session.identity.email.eq_ignore_ascii_case(email) => {
                let out_token = self.tokens.issue();
                if !gateway.sign_out(Some(out_token)).await {
                    self.tokens.discard(out_token);
                }
            }
            _ => self.tokens.discard(token),
        }
        Ok(())
    }

    fn register_local(
        &self,
        store: &DirectoryStore,
        email: &str,
        password: &str,
        name: &str,
        phone: &str,
    ) -> Result<(), SessionError> {
        let mut users = store.list_users()?;
        if users.iter().any(|u| u.user.email.eq_ignore_ascii_case(email)) {
            return Err(SessionError::Identity(IdentityError::AlreadyRegistered));
        }
        // The first account in a fresh directory administers it.
        let role = if users.is_empty() { Role::Admin } else { Role::General };
        users.push(LocalUser {
            user: User {
                email: email.to_string(),
                name: name.to_string(),
                phone: phone.to_string(),
                role,
                expires_at: None,
            },
            password: password.to_string(),
        });
        store.save_users(&users)?;
        self.publish_users(users.into_iter().map(|u| u.user).collect());
        Ok(())
    }

    fn add_user_local(
        &self,
        store: &DirectoryStore,
        user: &User,
        password: &str,
    ) -> Result<(), SessionError> {
        let mut users = store.list_users()?;
        if users
            .iter()
            .any(|u| u.user.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(SessionError::Identity(IdentityError::AlreadyRegistered));
        }
        users.push(LocalUser {
            user: user.clone(),
            password: password.to_string(),
        });
        store.save_users(&users)?;
        self.publish_users(users.into_iter().map(|u| u.user).collect());
        Ok(())
    }

    /// Remote add: sign the account up (suppressed, signed out again), then
    /// reconcile the profile row with the requested role and expiry.
    async fn add_user_remote(
        &self,
        gateway: &IdentityGateway,
        sync: &ProfileSynchronizer,
        user: &User,
        password: &str,
    ) -> Result<(), SessionError> {
        let metadata = UserMetadata {
            name: user.name.clone(),
            phone: user.phone.clone(),
        };
        let token = self.tokens.issue();
        let identity = match gateway.sign_up(&user.email, password, &metadata, Some(token)).await {
            Ok(identity) => identity,
            Err(error) => {
                self.tokens.discard(token);
                return Err(error.into());
            }
        };
        match gateway.get_session().await {
            Some(session) if session.identity.email.eq_ignore_ascii_case(&user.email) => {
                let out_token = self.tokens.issue();
                if !gateway.sign_out(Some(out_token)).await {
                    self.tokens.discard(out_token);
                }
            }
            _ => self.tokens.discard(token),
        }

        // The backend's sign-up trigger only fills the basics; make sure
        // the row carries the requested role and expiry.
        match sync.fetch_profile(&identity.id).await? {
            Some(existing) => {
                if existing.role != user.role || existing.expires_at != user.expires_at {
                    let update = UserUpdate::builder()
                        .role(user.role)
                        .expires_at(user.expires_at)
                        .build();
                    sync.apply_update(&user.email, &update).await?;
                }
            }
            None => {
                sync.insert_profile(&Profile::from_user(user, &identity.id)).await?;
            }
        }

        let users = self.load_directory(sync).await;
        self.publish_users(users);
        Ok(())
    }

    fn update_user_local(
        &self,
        store: &DirectoryStore,
        email: &str,
        update: &UserUpdate,
    ) -> Result<User, SessionError> {
        let mut users = store.list_users()?;
        let entry = users
            .iter_mut()
            .find(|u| u.user.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| SessionError::UserNotFound(email.to_string()))?;
        update.apply_to(&mut entry.user);
        let refreshed = entry.user.clone();
        store.save_users(&users)?;

        // If the edited account is the active one, the persisted session
        // pointer is refreshed immediately.
        let is_current = self
            .state
            .borrow()
            .current_user
            .as_ref()
            .is_some_and(|u| u.email.eq_ignore_ascii_case(email));
        if is_current {
            store.set_current_user(Some(&refreshed))?;
            self.publish_current(Some(refreshed.clone()), false);
        }
        self.publish_users(users.into_iter().map(|u| u.user).collect());
        Ok(refreshed)
    }

    async fn update_user_remote(
        &self,
        sync: &ProfileSynchronizer,
        email: &str,
        update: &UserUpdate,
    ) -> Result<User, SessionError> {
        let profile = sync.apply_update(email, update).await?;
        let refreshed = profile.to_user();

        let is_current = self
            .state
            .borrow()
            .current_user
            .as_ref()
            .is_some_and(|u| u.email.eq_ignore_ascii_case(email));
        if is_current {
            self.publish_current(Some(refreshed.clone()), false);
        }
        let users = self.load_directory(sync).await;
        self.publish_users(users);
        Ok(refreshed)
    }

    fn delete_user_local(&self, store: &DirectoryStore, email: &str) -> Result<(), SessionError> {
        let mut users = store.list_users()?;
        let before = users.len();
        users.retain(|u| !u.user.email.eq_ignore_ascii_case(email));
        if users.len() == before {
            return Err(SessionError::UserNotFound(email.to_string()));
        }
        store.save_users(&users)?;
        self.publish_users(users.into_iter().map(|u| u.user).collect());
        Ok(())
    }

    async fn handle_auth_event(&self, event: AuthEvent) {
        if let Some(correlation) = event.correlation
            && self.tokens.consume(correlation)
        {
            return;
        }
        let Backend::Remote { sync, .. } = &self.backend else {
            return;
        };
        match event.kind {
            AuthEventKind::SignedIn(session) => {
                match self.resolve_remote_user(&session.identity, sync).await {
                    Ok(user) => {
                        let users = self.load_directory(sync).await;
                        self.publish(Some(user), users, false);
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to resolve signed-in user");
                    }
                }
            }
            AuthEventKind::SignedOut => self.publish_current(None, false),
        }
    }

    /// Resolve an identity into the app-facing user. A missing profile row
    /// is recoverable: a minimal user is synthesized, admin-roled only for
    /// the recovery identity.
    async fn resolve_remote_user(
        &self,
        identity: &mazy_core::Identity,
        sync: &ProfileSynchronizer,
    ) -> Result<User, SessionError> {
        if let Some(profile) = sync.fetch_profile(&identity.id).await? {
            return Ok(profile.to_user());
        }
        tracing::warn!(email = %identity.email, "no profile row; synthesizing a minimal user");
        let role = if self.recovery.matches(&identity.email) {
            Role::Admin
        } else {
            Role::General
        };
        Ok(User {
            email: identity.email.clone(),
            name: identity.user_metadata.name.clone(),
            phone: identity.user_metadata.phone.clone(),
            role,
            expires_at: None,
        })
    }

    /// Rebuild the directory cache. A failed refresh keeps the previous
    /// cache and logs.
    async fn load_directory(&self, sync: &ProfileSynchronizer) -> Vec<User> {
        match sync.fetch_all_profiles().await {
            Ok(profiles) => profiles.iter().map(Profile::to_user).collect(),
            Err(error) => {
                tracing::warn!(%error, "directory refresh failed; keeping cached view");
                self.state.borrow().users.clone()
            }
        }
    }

    fn publish(&self, current_user: Option<User>, users: Vec<User>, emergency: bool) {
        self.state.send_modify(|state| {
            state.current_user = current_user;
            state.users = users;
            state.emergency = emergency;
        });
    }

    fn publish_current(&self, current_user: Option<User>, emergency: bool) {
        self.state.send_modify(|state| {
            state.current_user = current_user;
            state.emergency = emergency;
        });
    }

    fn publish_users(&self, users: Vec<User>) {
        self.state.send_modify(|state| {
            state.users = users;
        });
    }
}

fn local_directory(store: &DirectoryStore) -> Result<Vec<User>, SessionError> {
    Ok(store.list_users()?.into_iter().map(|u| u.user).collect())
}

fn find_local_user(store: &DirectoryStore, email: &str) -> Result<Option<LocalUser>, SessionError> {
    Ok(store
        .list_users()?
        .into_iter()
        .find(|u| u.user.email.eq_ignore_ascii_case(email)))
}

/// Field validation shared by registration and admin add. Runs before any
/// I/O.
fn validate_registration(
    email: &str,
    password: &str,
    name: &str,
    phone: &str,
) -> Result<(), SessionError> {
    if email.trim().is_empty() {
        return Err(SessionError::Validation("Email is required.".into()));
    }
    if password.trim().is_empty() {
        return Err(SessionError::Validation("Password is required.".into()));
    }
    if name.trim().is_empty() {
        return Err(SessionError::Validation("Name is required.".into()));
    }
    if phone.trim().is_empty() {
        return Err(SessionError::Validation("Phone number is required.".into()));
    }
    Ok(())
}
