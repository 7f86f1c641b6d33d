//! # mazy-identity
//!
//! Remote identity-provider gateway for Mazylab.
//!
//! Wraps the backend's auth REST surface (`/auth/v1/...`) via `reqwest`:
//! password sign-in with a bounded-time race, sign-up, best-effort sign-out,
//! session restore from a cached token (`keyring` with file fallback), and
//! the admin-only surface used by the profile synchronizer. State
//! transitions are published on a broadcast event bus so the session
//! controller observes every sign-in/sign-out exactly once.

pub mod error;
pub mod events;
pub mod gateway;
pub mod token_cache;

pub use error::IdentityError;
pub use events::{AuthEvent, AuthEventKind, Session};
pub use gateway::IdentityGateway;
pub use token_cache::TokenCache;
