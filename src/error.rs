//! Error types for the AI Journalist client
//!
//! Three families reach callers: network failures (no response at all),
//! API failures (a response arrived but was judged unsuccessful) and
//! validation failures raised before anything is sent.

use thiserror::Error;

use crate::transport::TransportError;

/// Fallback text shown when an error carries no usable message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Main error type for the client
#[derive(Error, Debug)]
pub enum JournalistError {
    /// No response envelope was received (timeout, DNS, connection refused)
    #[error("Network error: {message}")]
    Network { message: String, timed_out: bool },

    /// A response was received but was not a success
    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalistError {
    pub fn api(message: impl Into<String>) -> Self {
        JournalistError::Api {
            message: message.into(),
            status: None,
        }
    }

    /// The user-facing message, without the category prefix.
    pub fn message(&self) -> String {
        let message = match self {
            JournalistError::Network { message, .. } => message.clone(),
            JournalistError::Api { message, .. } => message.clone(),
            JournalistError::Validation(err) => err.to_string(),
            JournalistError::Config(message) => message.clone(),
            JournalistError::InvalidUrl { .. } | JournalistError::Serialization(_) => {
                self.to_string()
            }
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, JournalistError::Network { .. })
    }

    pub fn is_api(&self) -> bool {
        matches!(self, JournalistError::Api { .. })
    }
}

impl From<TransportError> for JournalistError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network { message, timed_out } => {
                JournalistError::Network { message, timed_out }
            }
            TransportError::InvalidUrl { url, reason } => JournalistError::InvalidUrl { url, reason },
        }
    }
}

/// Caller-side input errors, raised before a request is built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter {what}")]
    MissingInput { what: &'static str },

    #[error("Please enter at least {min} characters of content")]
    ContentTooShort { min: usize },

    #[error("Unsupported target language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Please select a target language")]
    MissingLanguage,

    #[error("Unknown summary format '{0}' (expected bulletPoint, paragraph or keyHighlight)")]
    UnknownFormat(String),

    #[error("Number of articles must be at least 1")]
    NoArticlesRequested,
}

pub type JournalistResult<T> = Result<T, JournalistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_category() {
        let err = JournalistError::api("bad url");
        assert_eq!(err.message(), "bad url");
        assert_eq!(err.to_string(), "API error: bad url");
        assert!(err.is_api());
    }

    #[test]
    fn test_empty_message_falls_back() {
        let err = JournalistError::Network {
            message: "  ".into(),
            timed_out: false,
        };
        assert_eq!(err.message(), GENERIC_ERROR_MESSAGE);
        assert!(err.is_network());
    }

    #[test]
    fn test_validation_converts() {
        let err: JournalistError = ValidationError::MissingLanguage.into();
        assert_eq!(err.message(), "Please select a target language");
    }
}
