// manigoal-core/src/errors.rs
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while producing a companion reply.
#[derive(Error, Debug)]
pub enum CompanionError {
    /// Error related to configuration loading or validation.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Transport-level failure talking to the completion endpoint.
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion endpoint answered with a non-2xx status.
    #[error("API Error: {status} {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected completion shape.
    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),

    /// The completion call did not finish in time and was abandoned.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The user message was blank.
    #[error("Cannot respond to an empty message")]
    EmptyMessage,
}

impl CompanionError {
    pub fn config(msg: impl Into<String>) -> Self {
        CompanionError::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        CompanionError::InvalidResponse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompanionError::config("missing key");
        assert_eq!(err.to_string(), "Configuration Error: missing key");

        let err = CompanionError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("upstream"));

        let err = CompanionError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }
}
