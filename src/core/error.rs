//! Error types for the logger

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The actor did not answer a request/response command in time
    #[error("No reply from logger actor within {timeout:?}")]
    ReplyTimeout { timeout: Duration },

    /// The actor is gone (cancelled, exited, or never started)
    #[error("Logger actor stopped")]
    ActorStopped,

    /// A logger state could not be duplicated
    #[error("Snapshot failed: {0}")]
    SnapshotFailed(String),

    /// Attachment key collides with a fixed record field
    #[error("Field '{0}' is reserved by the log record")]
    ReservedField(String),

    /// Host or executable lookup failed at startup
    #[error("Failed to discover {what}: {message}")]
    Discovery { what: String, message: String },

    /// Unknown IANA time zone name
    #[error("Invalid time zone: '{0}'")]
    InvalidTimeZone(String),

}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn snapshot<S: Into<String>>(msg: S) -> Self {
        LoggerError::SnapshotFailed(msg.into())
    }

    pub fn discovery(what: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Discovery {
            what: what.into(),
            message: message.into(),
        }
    }
}
