//! Core entities: the application-facing `User` and the backend `Profile` row.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// The application-facing merged view of an account.
///
/// Unique by email within the directory. The directory itself is a cache
/// rebuilt on demand, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    /// Subscription expiry. `None` = no active subscription.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A profile row in the remote profile store, keyed by identity id.
///
/// In remote mode a row should exist for every identity; its absence is a
/// recoverable condition handled by the session controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    pub identity_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Project the profile into the application-facing `User` view.
    #[must_use]
    pub fn to_user(&self) -> User {
        User {
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            expires_at: self.expires_at,
        }
    }

    /// Build a profile row from a `User` and its identity id.
    #[must_use]
    pub fn from_user(user: &User, identity_id: &str) -> Self {
        Self {
            identity_id: identity_id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            expires_at: user.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_user() -> User {
        User {
            email: "pat@example.com".into(),
            name: "Pat".into(),
            phone: "010-1234".into(),
            role: Role::Paid,
            expires_at: None,
        }
    }

    #[test]
    fn profile_projects_to_user_and_back() {
        let user = sample_user();
        let profile = Profile::from_user(&user, "id-1");
        assert_eq!(profile.identity_id, "id-1");
        assert_eq!(profile.to_user(), user);
    }

    #[test]
    fn user_deserializes_with_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(user.role, Role::General);
        assert!(user.name.is_empty());
        assert!(user.expires_at.is_none());
    }
}
