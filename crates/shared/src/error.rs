//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote data store error (RPC transport or response).
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Writing a report or export failed.
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Whether the caller may retry or ask the user to adjust input.
    ///
    /// Upstream fetch failures are recoverable; the presentation layer gates
    /// report computation on a successful fetch and may simply try again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::ExternalService(_) => true,
            Self::Configuration(_) | Self::Export(_) => false,
        }
    }

    /// Returns the stable error code for logs and presentation consumers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Export(_) => "EXPORT_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverable() {
        assert!(AppError::Validation(String::new()).is_recoverable());
        assert!(AppError::ExternalService(String::new()).is_recoverable());
        assert!(!AppError::Configuration(String::new()).is_recoverable());
        assert!(!AppError::Export(String::new()).is_recoverable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::ExternalService(String::new()).error_code(),
            "EXTERNAL_SERVICE_ERROR"
        );
        assert_eq!(AppError::Export(String::new()).error_code(), "EXPORT_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Export("reports/x.csv: disk full".into()).to_string(),
            "Export error: reports/x.csv: disk full"
        );
        assert_eq!(
            AppError::ExternalService("msg".into()).to_string(),
            "External service error: msg"
        );
        assert_eq!(
            AppError::Configuration("msg".into()).to_string(),
            "Configuration error: msg"
        );
    }
}
