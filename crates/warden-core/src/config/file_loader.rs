//! File-based settings loading

use std::fs;
use std::path::Path;
use tracing::debug;

use super::settings::Settings;
use crate::error::{ResultExt, WardenError, WardenResult};

/// Config file syntax, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Format::Toml,
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

/// Load settings from a TOML, YAML or JSON file. A missing file yields the
/// defaults.
pub fn load_from_file(path: &Path) -> WardenResult<Settings> {
    if !path.exists() {
        debug!("No config file at {}; using defaults", path.display());
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        WardenError::io_with_path(
            format!("Failed to read config file: {}", e),
            path.display().to_string(),
        )
    })?;

    parse(&content, Format::of(path)).context(format!("Loading '{}'", path.display()))
}

fn parse(content: &str, format: Format) -> WardenResult<Settings> {
    let settings = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionMode;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[permission]
mode = "prompt"

[hooks]
rewrite_enabled = true
default_timeout_ms = 1500

[storage]
root = "/var/lib/warden"
"#,
        )
        .unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.permission.mode, PermissionMode::Prompt);
        assert!(settings.hooks.rewrite_enabled);
        assert_eq!(settings.hooks.default_timeout_ms, Some(1500));
        assert_eq!(settings.storage.root.as_deref(), Some("/var/lib/warden"));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "permission:\n  mode: bypass\nlogging:\n  format: json\n").unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.permission.mode, PermissionMode::Bypass);
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"permission": {"mode": "deny"}}"#).unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.permission.mode, PermissionMode::Deny);
        assert!(!settings.hooks.rewrite_enabled);
    }

    #[test]
    fn test_yaml_syntax_error_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "permission: [unclosed\n").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, WardenError::Config { .. }));
        assert!(err.to_string().contains("YAML"));
    }

    #[test]
    fn test_format_by_extension() {
        assert_eq!(Format::of(Path::new("a.toml")), Format::Toml);
        assert_eq!(Format::of(Path::new("a.yml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("a.conf")), Format::Json);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let settings = load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[permission]\nmode = \"sometimes\"\n").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, WardenError::Config { .. }));
    }
}
