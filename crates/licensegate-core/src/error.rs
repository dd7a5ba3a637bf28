//! Unified application error types for LicenseGate.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] taxonomy doubles
//! as the contract with callers: each kind carries an HTTP status hint and
//! a retry classification.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The presented license key does not exist.
    InvalidKey,
    /// The license exists but has been deactivated.
    Disabled,
    /// The license has no remaining quota.
    LimitExceeded,
    /// Caller-supplied input could not be parsed or validated.
    InvalidInput,
    /// A license with the same key already exists.
    DuplicateKey,
    /// The targeted record does not exist.
    NotFound,
    /// The underlying transactional store failed.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// The external text-generation backend failed.
    ExternalService,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// HTTP status a routing layer should use for this kind.
    pub fn http_status_hint(&self) -> u16 {
        match self {
            Self::InvalidKey => 401,
            Self::Disabled | Self::LimitExceeded => 403,
            Self::InvalidInput => 400,
            Self::DuplicateKey => 409,
            Self::NotFound => 404,
            Self::ExternalService => 502,
            Self::Storage | Self::Configuration | Self::Internal => 500,
        }
    }

    /// Whether a caller may reasonably retry the same request.
    ///
    /// Only storage failures qualify. Quota and validation outcomes are
    /// final for the request that produced them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }

    /// Whether this kind is an expected outcome rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey
                | Self::Disabled
                | Self::LimitExceeded
                | Self::InvalidInput
                | Self::DuplicateKey
                | Self::NotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "INVALID_KEY"),
            Self::Disabled => write!(f, "DISABLED"),
            Self::LimitExceeded => write!(f, "LIMIT_EXCEEDED"),
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
            Self::DuplicateKey => write!(f, "DUPLICATE_KEY"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Storage => write!(f, "STORAGE_FAILURE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout LicenseGate.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKey, message)
    }

    /// Create a disabled-license error.
    pub fn disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Disabled, message)
    }

    /// Create a limit-exceeded error.
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LimitExceeded, message)
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create a duplicate-key error.
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateKey, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// HTTP status hint of the underlying kind.
    pub fn http_status_hint(&self) -> u16 {
        self.kind.http_status_hint()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::InvalidInput,
            format!("JSON error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("Database error: {err}"), err)
    }
}
