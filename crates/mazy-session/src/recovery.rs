//! The designated recovery identity and its capabilities.

use mazy_config::RecoveryConfig;
use mazy_core::{Role, User};

/// Capability check for the single distinguished administrative identity.
///
/// Emergency access and local bootstrap both key off this check, never off
/// error-message text.
#[derive(Debug, Clone)]
pub struct RecoveryIdentity {
    email: String,
}

impl RecoveryIdentity {
    #[must_use]
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            email: config.admin_email.clone(),
        }
    }

    /// Whether `email` names the recovery administrator.
    #[must_use]
    pub fn matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The in-memory admin record used for emergency access and local
    /// bootstrap. Never persisted remotely.
    #[must_use]
    pub fn admin_user(&self) -> User {
        User {
            email: self.email.clone(),
            name: "Administrator".into(),
            phone: String::new(),
            role: Role::Admin,
            expires_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> RecoveryIdentity {
        RecoveryIdentity::new(&RecoveryConfig::default())
    }

    #[test]
    fn matches_is_case_insensitive() {
        let recovery = identity();
        assert!(recovery.matches("admin@mazylab.com"));
        assert!(recovery.matches("Admin@Mazylab.COM"));
        assert!(!recovery.matches("user@mazylab.com"));
    }

    #[test]
    fn synthesized_user_is_an_admin() {
        let user = identity().admin_user();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "admin@mazylab.com");
    }
}
