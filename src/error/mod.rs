//! Error types for the Lyric client.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Lyric operations.
#[derive(Error, Debug)]
pub enum LyricError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP 401/403 from any endpoint, or no usable token to refresh with.
    #[error("Authentication error{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LyricError {
    /// Create an API error for a non-success status.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Authentication failure reported by the server.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Authentication {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Authentication failure detected locally (no token, no refresh token).
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Authentication {
            status: None,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to the matching error kind.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::rejected(status, body),
            _ => Self::api(status, body),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Api { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::Network(_) | Self::Timeout(_) | Self::Serialization(_) => {
                ErrorCategory::Transport
            }
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            Self::Api { status, .. } => match status {
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether the request never produced an HTTP status (timeout, connection, bad body).
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// Whether this error is potentially retryable by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Transport | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Timeout(_) => RecoverySuggestion::IncreaseTimeout,
            _ => match self.category() {
                ErrorCategory::Authentication => RecoverySuggestion::Reauthorize,
                ErrorCategory::Transport | ErrorCategory::Server => {
                    RecoverySuggestion::RetryWithBackoff
                }
                ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
                ErrorCategory::InvalidArgument => RecoverySuggestion::FixRequest,
                ErrorCategory::Api => RecoverySuggestion::ContactSupport,
            },
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LyricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_splits_auth_and_api_errors() {
        assert!(matches!(
            LyricError::from_status(401, "nope"),
            LyricError::Authentication {
                status: Some(401),
                ..
            }
        ));
        assert!(matches!(
            LyricError::from_status(403, "nope"),
            LyricError::Authentication {
                status: Some(403),
                ..
            }
        ));
        assert!(matches!(
            LyricError::from_status(404, "missing"),
            LyricError::Api { status: 404, .. }
        ));
    }

    #[test]
    fn authentication_display_includes_status_when_known() {
        assert_eq!(
            LyricError::rejected(401, "expired").to_string(),
            "Authentication error (status 401): expired"
        );
        assert_eq!(
            LyricError::unauthenticated("no refresh token").to_string(),
            "Authentication error: no refresh token"
        );
    }

    #[test]
    fn server_errors_are_retryable_but_client_errors_are_not() {
        assert!(LyricError::api(503, "busy").is_retryable());
        assert!(!LyricError::api(400, "bad").is_retryable());
        assert!(!LyricError::rejected(401, "x").is_retryable());
    }
}
