//! # mazy-session
//!
//! The session controller: the single entry point consumers use to log in,
//! register, manage the user directory, and observe session state.
//!
//! At construction the controller decides, exactly once, whether it runs
//! against the remote backend or fully locally. Remote mode subscribes to
//! the identity gateway's auth event bus for the process lifetime; events
//! caused by the controller's own calls are suppressed through one-shot
//! correlation tokens. State is published through a `tokio::sync::watch`
//! channel; there is no ambient global.

pub mod controller;
pub mod error;
pub mod recovery;
pub mod state;
pub mod suppression;

pub use controller::{LoginOutcome, SessionController};
pub use error::SessionError;
pub use recovery::RecoveryIdentity;
pub use state::{SessionMode, SessionState};
