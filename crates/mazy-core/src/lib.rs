//! # mazy-core
//!
//! Shared data model for the Mazylab session and user-directory core.
//!
//! Contains only data types and pure functions, no I/O and no backend calls.
//! Produced and consumed by `mazy-store`, `mazy-identity`, `mazy-sync`,
//! and `mazy-session`.

pub mod entities;
pub mod enums;
pub mod expiry;
pub mod identity;
pub mod update;

pub use entities::{Profile, User};
pub use enums::Role;
pub use expiry::extend_expiry;
pub use identity::{Identity, UserMetadata};
pub use update::{UserUpdate, UserUpdateBuilder};
