//! Application-level enums.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Application role of a user.
///
/// `Admin` manages the directory; `Paid` holds an active subscription;
/// `General` is the default for everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    General,
    Paid,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::General => "general",
            Self::Paid => "paid",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::General
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "general" => Ok(Self::General),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
