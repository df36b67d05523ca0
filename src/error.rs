//! Error handling for domain-scout

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for domain-scout
#[derive(Error, Debug, Clone)]
pub enum DomainScoutError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("DNS error ({provider}): {message}")]
    Dns {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Cancelled: {message}")]
    Cancelled { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainScoutError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a DNS-level error (the resolver answered, but not usefully)
    pub fn dns(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Dns {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Deterministic failure category used as classification evidence
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Dns { .. } | Self::Parse { .. } => ErrorCategory::DnsError,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Check if this failure weakly suggests the queried domain exists.
    ///
    /// Timeouts correlate with slow, live zones, and DNS-level failures
    /// such as SERVFAIL correlate with registered-but-misconfigured
    /// domains. Connectivity failures on our side say nothing about the
    /// target.
    pub fn suggests_domain_exists(&self) -> bool {
        self.category().suggests_domain_exists()
    }

    /// The HTTP status carried by this error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network { status_code, .. } | Self::Dns { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether a single retry is worthwhile: timeouts and transient
    /// 5xx gateway failures only.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Dns { status_code, .. } => {
                matches!(status_code, Some(500) | Some(502) | Some(503) | Some(504))
            }
            _ => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your provider setup", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_ms } => {
                format!("⏱️  Operation '{}' timed out after {}ms\n💡 Try increasing the timeout or reducing concurrency", operation, timeout_ms)
            }
            Self::Dns { provider, message, .. } => {
                format!("⚠️  Resolver '{}' failed: {}", provider, message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary resolver issue, try again", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Cancelled { message } => {
                format!("🛑 Cancelled: {}", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Broad failure taxonomy recorded in evidence trails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Network,
    Timeout,
    #[serde(rename = "dns")]
    DnsError,
    Unknown,
}

impl ErrorCategory {
    /// Whether failures of this category correlate with an existing domain
    pub fn suggests_domain_exists(&self) -> bool {
        matches!(self, Self::Timeout | Self::DnsError)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Timeout => write!(f, "timeout"),
            ErrorCategory::DnsError => write!(f, "dns"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// A failure reduced to what classification needs to know about it.
///
/// Built once at the point of failure and never touched afterwards, so
/// the same error always yields the same evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
    pub suggests_domain_exists: bool,
}

impl ClassifiedError {
    pub fn from_error(err: &DomainScoutError) -> Self {
        Self {
            category: err.category(),
            message: err.to_string(),
            suggests_domain_exists: err.suggests_domain_exists(),
        }
    }
}

impl From<&DomainScoutError> for ClassifiedError {
    fn from(err: &DomainScoutError) -> Self {
        Self::from_error(err)
    }
}

/// Convert from common error types
impl From<reqwest::Error> for DomainScoutError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 5000)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_request() {
            Self::network("Request failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for DomainScoutError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("DoH request", 5000)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DomainScoutError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DomainScoutError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainScoutError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::DomainScoutError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainScoutError::validation(format!($fmt, $($arg)*))
    };
}
