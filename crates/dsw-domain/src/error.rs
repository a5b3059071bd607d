//! Error handling types

use crate::value_objects::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Adapter operation that produced a [`ProviderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    /// Register a new deposit
    Create,
    /// Poll the registration status of a deposit
    Status,
    /// Probe backend availability
    HealthCheck,
    /// Map the standard payload into the backend's shape
    Transform,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Status => "status",
            Self::HealthCheck => "health_check",
            Self::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// Classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Network failure reaching the backend
    Transport,
    /// The per-call timeout elapsed
    Timeout,
    /// The backend answered with a server fault or a throttle (5xx, 429)
    Unavailable,
    /// The backend answered and rejected the request
    Application,
    /// The payload could not be mapped for this backend
    Validation,
    /// The provider circuit is open and the call was not attempted
    CircuitOpen,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::Application => "application",
            Self::Validation => "validation",
            Self::CircuitOpen => "circuit_open",
        };
        f.write_str(name)
    }
}

/// Normalized failure raised by a provider adapter
///
/// Every adapter wraps its transport, validation and business errors into
/// this single shape so callers never see backend-specific error types.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{provider} {operation} failed ({kind}): {message}")]
pub struct ProviderError {
    /// Backend that failed
    pub provider: ProviderKind,
    /// Operation being performed
    pub operation: ProviderOperation,
    /// Failure classification
    pub kind: ProviderErrorKind,
    /// Human readable description, verbatim from the backend when available
    pub message: String,
    /// HTTP status returned by the backend, if any
    pub status_code: Option<u16>,
}

impl ProviderError {
    fn build(
        provider: ProviderKind,
        operation: ProviderOperation,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            operation,
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// Network-level failure
    pub fn transport(
        provider: ProviderKind,
        operation: ProviderOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::build(provider, operation, ProviderErrorKind::Transport, message)
    }

    /// Per-call timeout elapsed
    pub fn timeout(provider: ProviderKind, operation: ProviderOperation, elapsed_ms: u64) -> Self {
        Self::build(
            provider,
            operation,
            ProviderErrorKind::Timeout,
            format!("request timed out after {elapsed_ms}ms"),
        )
    }

    /// Backend answered with a server fault or throttle
    pub fn unavailable(
        provider: ProviderKind,
        operation: ProviderOperation,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::build(provider, operation, ProviderErrorKind::Unavailable, message)
        }
    }

    /// Backend rejected the request
    pub fn application(
        provider: ProviderKind,
        operation: ProviderOperation,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            ..Self::build(provider, operation, ProviderErrorKind::Application, message)
        }
    }

    /// Payload could not be mapped or the response could not be read
    pub fn validation(
        provider: ProviderKind,
        operation: ProviderOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::build(provider, operation, ProviderErrorKind::Validation, message)
    }

    /// Call short-circuited by an open breaker
    pub fn circuit_open(provider: ProviderKind, operation: ProviderOperation) -> Self {
        Self::build(
            provider,
            operation,
            ProviderErrorKind::CircuitOpen,
            "circuit breaker is open",
        )
    }

    /// Transport failures and timeouts are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ProviderErrorKind::Transport
                | ProviderErrorKind::Timeout
                | ProviderErrorKind::Unavailable
        )
    }
}

/// Main error type for Deposit Switch
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid routing configuration; fatal and never retried
    #[error("Configuration validation error: {message}")]
    ConfigValidation {
        /// Which value was rejected and why
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failure reported by a provider adapter
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Persistence backend (config store, rate-limit store) failure
    #[error("Store error: {message}")]
    Store {
        /// Description of the store error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a configuration validation error
    pub fn config_validation<S: Into<String>>(message: S) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a configuration error without a source
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error without a source
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an infrastructure error without a source
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Whether another attempt of the same operation could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Errors that must abort the request immediately
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigValidation { .. })
    }

    /// Provider error carried by this error, if any
    pub fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::Internal { message }
    }
}
