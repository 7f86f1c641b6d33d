use thiserror::Error;

use mazy_identity::IdentityError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no user found for {0}")]
    UserNotFound(String),

    #[error("the logged-in user cannot delete itself")]
    CannotDeleteSelf,

    #[error("network error: {0}")]
    Network(String),

    #[error("profile store error: {0}")]
    Backend(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}
