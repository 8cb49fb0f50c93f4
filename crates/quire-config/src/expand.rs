//! Environment variable expansion for configuration strings.

use std::env::VarError;

use shellexpand::LookupError;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string value.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` naming `field` if a referenced variable is
/// unset and has no default.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| lookup_error(&e, field))
}

/// Expand environment variables and a leading `~` in a path value.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` naming `field` if a referenced variable is
/// unset and has no default.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| lookup_error(&e, field))
}

fn lookup_error(err: &LookupError<VarError>, field: &str) -> ConfigError {
    ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", err.var_name),
    }
}
