//! Home directory and environment variable expansion for path strings.
//!
//! Supports:
//! - `~` and `~/...` - the current user's home directory
//! - `$VAR` and `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `~` and environment variable references in a path string.
///
/// Returns the original string unchanged if it holds neither `~` nor `$`.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains('$') && !value.starts_with('~') {
        return Ok(value.to_owned());
    }

    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{0}}} not set", e.var_name),
        })
}
