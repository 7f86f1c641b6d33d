//! Identity types issued by the remote identity provider.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A backend-issued account record, independent of profile fields.
///
/// Produced by `mazy-identity`, consumed by `mazy-session`. The credential
/// used to obtain it is never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Identity {
    /// Opaque provider-assigned id.
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Free-form metadata captured at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}
