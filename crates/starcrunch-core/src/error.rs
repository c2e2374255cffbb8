//! Error types for Starcrunch.

use thiserror::Error;

/// Result type alias using Starcrunch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Starcrunch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// User has never interacted with the bot
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Task not found for this user
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Completion API call failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::UserNotFound(_) | Error::TaskNotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("daily note".to_string());
        assert_eq!(err.to_string(), "Not found: daily note");
    }

    #[test]
    fn test_error_display_user_not_found() {
        let err = Error::UserNotFound("123456789012345678".to_string());
        assert_eq!(err.to_string(), "User not found: 123456789012345678");
    }

    #[test]
    fn test_error_display_task_not_found() {
        let err = Error::TaskNotFound("0190-abc".to_string());
        assert_eq!(err.to_string(), "Task not found: 0190-abc");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("text is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: text is required");
    }

    #[test]
    fn test_error_display_inference() {
        let err = Error::Inference("model timeout".to_string());
        assert_eq!(err.to_string(), "Inference error: model timeout");
    }

    #[test]
    fn test_is_not_found_family() {
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::UserNotFound("x".into()).is_not_found());
        assert!(Error::TaskNotFound("x".into()).is_not_found());
        assert!(!Error::InvalidInput("x".into()).is_not_found());
        assert!(!Error::Internal("x".into()).is_not_found());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
