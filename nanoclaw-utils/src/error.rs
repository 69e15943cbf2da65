//! Error types for nanoclaw
//!
//! Provides a unified error type used across all nanoclaw crates.

use std::path::PathBuf;

/// Main error type for nanoclaw operations
#[derive(Debug, thiserror::Error)]
pub enum NanoclawError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    DirCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Serialization Errors ===

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid IPC file {path}: {message}")]
    InvalidIpcFile { path: PathBuf, message: String },

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    // === Protocol Errors ===

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: u64 },

    // === Command Errors ===

    #[error("Command failed: {0}")]
    Command(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NanoclawError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable
    ///
    /// A JSON error on an IPC file usually means the reader raced a writer
    /// that does not use the temp-then-rename discipline.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Timeout { .. })
    }
}

/// Result type alias using NanoclawError
pub type Result<T> = std::result::Result<T, NanoclawError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Display Tests ====================

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = NanoclawError::Io(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = NanoclawError::FileWrite {
            path: PathBuf::from("/workspace/ipc/tasks/1-abc.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("/workspace/ipc/tasks/1-abc.json"));
    }

    #[test]
    fn test_error_display_dir_create() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = NanoclawError::DirCreate {
            path: PathBuf::from("/readonly/messages"),
            source: io_err,
        };
        assert!(err.to_string().starts_with("Failed to create directory /readonly/messages"));
    }

    #[test]
    fn test_error_display_timeout() {
        let err = NanoclawError::Timeout {
            what: "response".into(),
            seconds: 10,
        };
        assert_eq!(err.to_string(), "Timed out after 10s waiting for response");
    }

    #[test]
    fn test_error_display_missing_env() {
        let err = NanoclawError::MissingEnv("NANOCLAW_CHAT_JID".into());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: NANOCLAW_CHAT_JID"
        );
    }

    // ==================== Constructor Tests ====================

    #[test]
    fn test_constructors() {
        assert!(matches!(NanoclawError::config("x"), NanoclawError::Config(_)));
        assert!(matches!(NanoclawError::protocol("x"), NanoclawError::Protocol(_)));
        assert!(matches!(NanoclawError::command("x"), NanoclawError::Command(_)));
        assert!(matches!(NanoclawError::internal("x"), NanoclawError::Internal(_)));
    }

    // ==================== Retryable Tests ====================

    #[test]
    fn test_json_error_is_retryable() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"result\":").unwrap_err();
        assert!(NanoclawError::Json(json_err).is_retryable());
    }

    #[test]
    fn test_config_error_not_retryable() {
        assert!(!NanoclawError::config("bad").is_retryable());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: NanoclawError = io_err.into();
        assert!(matches!(err, NanoclawError::Io(_)));
    }
}
