use thiserror::Error;

use mazy_identity::IdentityError;
use mazy_store::StoreError;
use mazy_sync::SyncError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("the logged-in user cannot delete itself")]
    CannotDeleteSelf,

    #[error("no user found for {0}")]
    UserNotFound(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Human-readable message per error category, for direct display.
    ///
    /// Raw transport detail never leaks here; it stays on the source error
    /// for logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::CannotDeleteSelf | Self::Sync(SyncError::CannotDeleteSelf) => {
                "You cannot delete the account you are logged in with.".into()
            }
            Self::UserNotFound(email) | Self::Sync(SyncError::UserNotFound(email)) => {
                format!("No user found for {email}.")
            }
            Self::NotLoggedIn => "You are not logged in.".into(),
            Self::Identity(IdentityError::InvalidCredentials) => {
                "Invalid email or password.".into()
            }
            Self::Identity(IdentityError::AlreadyRegistered) => {
                "This email is already registered.".into()
            }
            Self::Identity(IdentityError::EmailNotConfirmed) => {
                "Confirm your email address before signing in.".into()
            }
            Self::Identity(IdentityError::MisconfiguredBackend) => {
                "The backend rejected the configured API key. Check the backend settings.".into()
            }
            Self::Identity(IdentityError::Timeout) => {
                "Sign-in timed out. Check your connection and try again.".into()
            }
            Self::Identity(_) | Self::Sync(_) => {
                "The remote service is unavailable. Try again later.".into()
            }
            Self::Store(_) => "The local user directory could not be accessed.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_never_leak_transport_detail() {
        let err = SessionError::Identity(IdentityError::Network(
            "connection refused (os error 111)".into(),
        ));
        let msg = err.user_message();
        assert!(!msg.contains("os error"));
        assert!(!msg.contains("111"));
    }

    #[test]
    fn each_category_has_a_distinct_message() {
        let errors = [
            SessionError::Identity(IdentityError::InvalidCredentials),
            SessionError::Identity(IdentityError::EmailNotConfirmed),
            SessionError::Identity(IdentityError::MisconfiguredBackend),
            SessionError::Identity(IdentityError::Timeout),
            SessionError::CannotDeleteSelf,
        ];
        let messages: std::collections::HashSet<String> =
            errors.iter().map(SessionError::user_message).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn nested_sync_guard_reads_the_same_as_the_local_one() {
        let nested = SessionError::Sync(SyncError::CannotDeleteSelf);
        assert_eq!(nested.user_message(), SessionError::CannotDeleteSelf.user_message());
    }
}
