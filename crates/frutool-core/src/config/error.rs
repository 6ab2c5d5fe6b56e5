use thiserror::Error;

use super::datetime::DateTimeError;

/// Errors returned by the TOML configuration layer.
///
/// # Examples
/// ```
/// use frutool_core::ConfigError;
///
/// let err = ConfigError::InvalidValue {
///     section: "board".to_string(),
///     key: "mfg_date_time".to_string(),
///     message: "must be a string".to_string(),
/// };
/// assert_eq!(err.to_string(), "[board] mfg_date_time: must be a string");
/// ```
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot render TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("[board] mfg_date_time: {0}")]
    DateTime(#[from] DateTimeError),
    #[error("[{section}] {key}: {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
