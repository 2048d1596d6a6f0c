//! From trait implementations for WardenError conversions

use serde_json::error::Category;

use super::types::WardenError;

impl From<anyhow::Error> for WardenError {
    fn from(error: anyhow::Error) -> Self {
        // Keep the variant when a WardenError was only wrapped for transport
        match error.downcast::<WardenError>() {
            Ok(inner) => inner,
            Err(error) => Self::other(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for WardenError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(error: serde_json::Error) -> Self {
        match error.classify() {
            Category::Io => Self::io(error.to_string()),
            Category::Syntax | Category::Data | Category::Eof => Self::json(error.to_string()),
        }
    }
}

impl From<toml::de::Error> for WardenError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML: {}", error))
    }
}

impl From<serde_yaml::Error> for WardenError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("Failed to parse YAML: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anyhow_round_trip_keeps_variant() {
        let original = WardenError::timeout(std::time::Duration::from_millis(5), "slow");
        let message = original.to_string();
        let err = WardenError::from(anyhow::Error::new(original));
        assert!(matches!(err, WardenError::Timeout { millis: 5, .. }));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_foreign_anyhow_becomes_other() {
        let err = WardenError::from(anyhow::anyhow!("outer").context("ctx"));
        assert!(matches!(err, WardenError::Other { .. }));
    }

    #[test]
    fn test_json_syntax_error() {
        let err: WardenError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, WardenError::Json { .. }));
    }
}
