//! Core error types and traits for Warden

use thiserror::Error;

/// Result type alias for Warden operations
pub type WardenResult<T> = Result<T, WardenError>;

/// Unified error trait implemented by every Warden error.
///
/// - error_code(): unique code for programmatic error identification
/// - message(): human-readable error message
/// - context(): optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if retrying the same operation could succeed
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> WardenResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WardenResult<T>;
}

impl<T> ResultExt<T> for WardenResult<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> WardenResult<T> {
        self.map_err(|e| e.with_context(context.to_string()))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WardenResult<T> {
        self.map_err(|e| e.with_context(f().to_string()))
    }
}

/// Main error type for Warden
#[derive(Error, Debug, Clone)]
pub enum WardenError {
    /// Invalid construction-time configuration, e.g. a system-prompt hook
    /// whose prompt lacks its marker, or an unreadable settings file
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Malformed caller input such as a session id that is not 32 hex chars
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// A hook callback exceeded its matcher's timeout
    #[error("Timed out after {millis} ms: {message}")]
    Timeout {
        millis: u64,
        message: String,
        context: Option<String>,
    },

    /// A hook callback failed
    #[error("Hook error in matcher '{matcher}': {message}")]
    Hook {
        matcher: String,
        message: String,
        context: Option<String>,
    },

    /// The interactive answerer failed to produce an answer
    #[error("Approval error: {message}")]
    Approval {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON encode/decode errors, including malformed event log lines
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
