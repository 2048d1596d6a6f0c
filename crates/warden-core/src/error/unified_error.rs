//! UnifiedError trait implementation for WardenError

use super::types::{UnifiedError, WardenError};

impl UnifiedError for WardenError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "WARDEN_CONFIG",
            Self::InvalidInput { .. } => "WARDEN_INVALID_INPUT",
            Self::Timeout { .. } => "WARDEN_TIMEOUT",
            Self::Hook { .. } => "WARDEN_HOOK",
            Self::Approval { .. } => "WARDEN_APPROVAL",
            Self::Io { .. } => "WARDEN_IO",
            Self::Json { .. } => "WARDEN_JSON",
            Self::Other { .. } => "WARDEN_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::Timeout { message, .. }
            | Self::Hook { message, .. }
            | Self::Approval { message, .. }
            | Self::Io { message, .. }
            | Self::Json { message, .. }
            | Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Timeout { context, .. }
            | Self::Hook { context, .. }
            | Self::Approval { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io { .. })
    }
}
