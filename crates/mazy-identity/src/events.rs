//! Session type and the auth event bus payloads.

use serde::{Deserialize, Serialize};

use mazy_core::Identity;

/// An authenticated session: the bearer token plus the identity it was
/// issued for. Lives in process memory; the token alone is additionally
/// cached for restart restoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub identity: Identity,
}

/// A session transition published on the gateway's broadcast bus.
///
/// `correlation` carries the suppression token of the local call that
/// caused the transition; transitions the gateway discovers on its own
/// (e.g. restoring a cached token) carry `None`.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub correlation: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum AuthEventKind {
    SignedIn(Session),
    SignedOut,
}
