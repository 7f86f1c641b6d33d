//! Partial user update builder.
//!
//! Fields left unset mean "do not touch". `expires_at` is doubly optional so
//! clearing the expiry and leaving it alone are distinct operations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::User;
use crate::enums::Role;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl UserUpdate {
    #[must_use]
    pub fn builder() -> UserUpdateBuilder {
        UserUpdateBuilder::new()
    }

    /// True when no field is set; an empty update is a no-op.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.expires_at.is_none()
    }

    /// Apply the set fields to `user`, leaving omitted fields unchanged.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(expires_at) = self.expires_at {
            user.expires_at = expires_at;
        }
    }
}

pub struct UserUpdateBuilder(UserUpdate);

impl UserUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(UserUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.0.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.0.role = Some(role);
        self
    }

    #[must_use]
    pub fn expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.0.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn build(self) -> UserUpdate {
        self.0
    }
}

impl Default for UserUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn base_user() -> User {
        User {
            email: "pat@example.com".into(),
            name: "Pat".into(),
            phone: "010-1234".into(),
            role: Role::General,
            expires_at: None,
        }
    }

    #[test]
    fn omitted_fields_are_unchanged() {
        let mut user = base_user();
        UserUpdate::builder().phone("010-9999").build().apply_to(&mut user);

        assert_eq!(user.phone, "010-9999");
        assert_eq!(user.name, "Pat");
        assert_eq!(user.role, Role::General);
        assert!(user.expires_at.is_none());
    }

    #[test]
    fn expiry_can_be_cleared_explicitly() {
        let mut user = base_user();
        user.expires_at = Some(chrono::Utc::now());

        UserUpdate::builder().expires_at(None).build().apply_to(&mut user);
        assert!(user.expires_at.is_none());
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = UserUpdate::default();
        assert!(update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), "{}");
    }

    #[test]
    fn only_set_fields_are_serialized() {
        let update = UserUpdate::builder().name("New Name").build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "New Name" }));
    }

    #[test]
    fn applying_same_update_twice_is_idempotent() {
        let update = UserUpdate::builder().role(Role::Paid).name("New").build();
        let mut once = base_user();
        update.apply_to(&mut once);
        let mut twice = once.clone();
        update.apply_to(&mut twice);
        assert_eq!(once, twice);
    }
}
