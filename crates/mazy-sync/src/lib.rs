//! # mazy-sync
//!
//! Profile synchronizer: the bridge between the app-facing user directory
//! and the remote profile store's `/rest/v1/profiles` table. Reads rebuild
//! the directory cache; writes PATCH only the fields a partial update names.
//! Account deletion goes through the identity gateway's admin surface, with
//! the self-deletion guard applied before any network call.

pub mod error;
pub mod synchronizer;

pub use error::SyncError;
pub use synchronizer::ProfileSynchronizer;
