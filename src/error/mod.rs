//! Error types for modulle.

use thiserror::Error;

/// Primary error type for all modulle operations.
#[derive(Error, Debug)]
pub enum ModulleError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },
}

/// Coarse error classification used by retry decisions and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Unknown,
}

impl ModulleError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::InvalidUrl(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ModulleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_category() {
        assert_eq!(
            ModulleError::api(401, "bad key").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            ModulleError::api(429, "slow down").category(),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ModulleError::api(503, "unavailable").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            ModulleError::api(404, "missing").category(),
            ErrorCategory::Api
        );
    }

    #[test]
    fn retryable_covers_transient_failures() {
        assert!(ModulleError::api(500, "boom").is_retryable());
        assert!(ModulleError::RateLimited {
            retry_after_ms: None
        }
        .is_retryable());
        assert!(ModulleError::Timeout(30_000).is_retryable());
        assert!(!ModulleError::api(401, "bad key").is_retryable());
        assert!(!ModulleError::Configuration("missing key".into()).is_retryable());
    }
}
