use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("this email is already registered")]
    AlreadyRegistered,

    #[error("email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("backend rejected the API key; check MAZY_BACKEND__ANON_KEY / MAZY_BACKEND__SERVICE_KEY")]
    MisconfiguredBackend,

    #[error("sign-in timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("token cache error: {0}")]
    TokenCache(String),

    #[error("identity provider error: {0}")]
    Unknown(String),
}
