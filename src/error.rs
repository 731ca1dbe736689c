//! Error handling for text-studio

use thiserror::Error;

/// Main error type for text-studio
#[derive(Error, Debug, Clone)]
pub enum StudioError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: String,
        message: String,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Timeout error: {operation} timed out{}", after_secs(.timeout_secs))]
    Timeout {
        operation: String,
        /// `None` when the limit was enforced by the HTTP client
        timeout_secs: Option<u64>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

fn after_secs(timeout_secs: &Option<u64>) -> String {
    timeout_secs.map_or(String::new(), |s| format!(" after {}s", s))
}

impl StudioError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
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

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs: Some(timeout_secs),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Whether the upstream reported an exhausted quota or rate limit
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
            || matches!(self, Self::Network { status_code: Some(429), .. })
    }

    /// Whether the provider could not be used at all (missing or rejected credentials)
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Authentication { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!(
                    "❌ Configuration problem: {}\n💡 Check your .env file or environment",
                    message
                )
            }
            Self::Validation { message } => {
                format!(
                    "❌ Invalid request: {}\n💡 Check the prompt, maxLength and temperature fields",
                    message
                )
            }
            Self::Provider { provider, message } => {
                format!("❌ Provider ({}) error: {}", provider, message)
            }
            Self::Network {
                message,
                status_code,
                ..
            } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!(
                    "❌ Network error{}: {}\n💡 Check your internet connection",
                    status, message
                )
            }
            Self::Authentication { message } => {
                format!(
                    "❌ Authentication failed: {}\n💡 Verify your API keys are correct",
                    message
                )
            }
            Self::RateLimit {
                message,
                retry_after,
            } => {
                let retry = retry_after.map_or(String::new(), |s| format!(" Retry in {}s.", s));
                format!("⏱️  Rate limit exceeded: {}{}", message, retry)
            }
            Self::Timeout {
                operation,
                timeout_secs,
            } => {
                format!(
                    "⏱️  Operation '{}' timed out{}\n💡 Try increasing PROVIDER_TIMEOUT_SECS",
                    operation,
                    after_secs(timeout_secs)
                )
            }
            Self::Parse { message, .. } => {
                format!(
                    "❌ Parse error: {}\n💡 The upstream service returned an unexpected response",
                    message
                )
            }
            Self::Io { message } => {
                format!("❌ IO error: {}", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::Timeout {
                operation: "HTTP request".to_string(),
                timeout_secs: None,
            }
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_decode() {
            Self::parse(err.to_string(), None)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StudioError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::StudioError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::StudioError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::StudioError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::StudioError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_classification() {
        assert!(StudioError::rate_limit("quota", None).is_quota());
        assert!(StudioError::network("too many", Some(429), None).is_quota());
        assert!(!StudioError::network("bad gateway", Some(502), None).is_quota());
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(StudioError::authentication("bad key").is_unavailable());
        assert!(StudioError::config("no key").is_unavailable());
        assert!(!StudioError::timeout("call", 10).is_unavailable());
    }

    #[test]
    fn test_timeout_messages() {
        let err = StudioError::timeout("openai call", 10);
        assert_eq!(err.to_string(), "Timeout error: openai call timed out after 10s");

        let err = StudioError::Timeout {
            operation: "HTTP request".to_string(),
            timeout_secs: None,
        };
        assert_eq!(err.to_string(), "Timeout error: HTTP request timed out");
        assert!(!err.user_message().contains("0s"));
    }

    #[test]
    fn test_macros() {
        let err = validation_error!("maxLength must be positive, got {}", 0);
        assert!(err.to_string().contains("got 0"));
        let err = config_error!("missing key");
        assert!(matches!(err, StudioError::Config { .. }));
    }
}
