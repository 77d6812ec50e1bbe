// Configuration Errors
// Typed failures raised while converting YAML configuration into widget configuration

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid color '{value}' for '{field}'")]
    InvalidColor { field: &'static str, value: String },

    #[error("'{field}' must be a finite, non-negative number (got {value})")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("unknown indicator width mode '{0}' (expected \"dynamic\" or a number)")]
    UnknownIndicatorWidth(String),
}
