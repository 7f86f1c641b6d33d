//! Configuration errors.

use thiserror::Error;

/// Every load failure funnels through figment: malformed TOML, an env value
/// that does not parse, or a field of the wrong type. Missing or unset
/// sections are not errors; `is_configured` predicates decide what to do
/// with them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),
}
