//! Constructor methods for WardenError

use std::time::Duration;

use super::types::WardenError;

impl WardenError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
            context: None,
        }
    }

    /// Create an invalid input error naming the offending field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a timeout error
    pub fn timeout(limit: Duration, message: impl Into<String>) -> Self {
        Self::Timeout {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            message: message.into(),
            context: None,
        }
    }

    /// Create a hook callback error
    pub fn hook(matcher: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            matcher: matcher.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Create an answerer failure
    pub fn approval(message: impl Into<String>) -> Self {
        Self::Approval {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with the path involved
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to an existing error
    pub fn with_context(mut self, new_context: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::Config { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Timeout { context, .. }
            | Self::Hook { context, .. }
            | Self::Approval { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::Other { context, .. } => context,
        };
        *slot = Some(new_context.into());
        self
    }
}
