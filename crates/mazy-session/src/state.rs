//! Published session state.

use mazy_core::User;

/// The operating mode, decided once at construction and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// No remote backend configured: the local directory store is the only
    /// source of truth.
    Local,
    /// A configured remote backend owns identity and profiles; the directory
    /// is a cache rebuilt on demand.
    Remote,
}

/// The state snapshot published through the controller's watch channel.
///
/// Consumers read or subscribe; they never mutate. UI flags (admin panel
/// visibility and the like) are derived from this, not stored on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub mode: SessionMode,
    pub current_user: Option<User>,
    /// Directory cache, rebuilt on demand. Never a source of truth.
    pub users: Vec<User>,
    /// Set only by the emergency-access path; cleared on logout.
    pub emergency: bool,
}

impl SessionState {
    #[must_use]
    pub const fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            current_user: None,
            users: Vec::new(),
            emergency: false,
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }
}
