//! Warden settings model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use super::environment::{Environment, expand_path};
use super::file_loader::load_from_file;
use crate::error::{WardenError, WardenResult};
use crate::permission::PermissionMode;
use crate::utils::json::coerce_bool;

pub const CONFIG_ENV: &str = "WARDEN_CONFIG";
pub const HOME_ENV: &str = "WARDEN_HOME";
pub const PERMISSION_MODE_ENV: &str = "WARDEN_PERMISSION_MODE";
pub const REWRITE_PROMPTS_ENV: &str = "WARDEN_REWRITE_PROMPTS";
pub const LOG_LEVEL_ENV: &str = "WARDEN_LOG_LEVEL";

const DATA_DIR: &str = ".warden";
const CONFIG_FILE: &str = "config.toml";

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub permission: PermissionSettings,
    pub hooks: HookSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub mode: PermissionMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Let hooks replace the user prompt and the model input
    pub rewrite_enabled: bool,
    /// Timeout for matchers that do not declare one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timeout_ms: Option<u64>,
}

impl HookSettings {
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Data directory; `~` is expanded. Defaults to `~/.warden`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Settings {
    /// Config file, then `WARDEN_*` overrides
    pub fn load(env: &dyn Environment) -> WardenResult<Self> {
        let mut settings = match Self::config_path(env) {
            Some(path) => {
                debug!("Loading settings from {}", path.display());
                load_from_file(&path)?
            }
            None => Self::default(),
        };
        settings.apply_env(env)?;
        Ok(settings)
    }

    /// `WARDEN_CONFIG` if set, else `~/.warden/config.toml`
    pub fn config_path(env: &dyn Environment) -> Option<PathBuf> {
        match env.var(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Some(expand_path(env, &path)),
            None => env
                .home_dir()
                .map(|home| home.join(DATA_DIR).join(CONFIG_FILE)),
        }
    }

    /// Apply environment overrides on top of the loaded values
    pub fn apply_env(&mut self, env: &dyn Environment) -> WardenResult<()> {
        if let Some(home) = env.var(HOME_ENV).filter(|v| !v.trim().is_empty()) {
            self.storage.root = Some(home);
        }

        if let Some(mode) = env.var(PERMISSION_MODE_ENV) {
            self.permission.mode = mode.parse().map_err(|_| {
                WardenError::config(format!("Invalid {} value: '{}'", PERMISSION_MODE_ENV, mode))
            })?;
        }

        if let Some(raw) = env.var(REWRITE_PROMPTS_ENV) {
            self.hooks.rewrite_enabled =
                coerce_bool(&Value::String(raw.clone())).ok_or_else(|| {
                    WardenError::config(format!(
                        "Invalid {} value: '{}'",
                        REWRITE_PROMPTS_ENV, raw
                    ))
                })?;
        }

        if let Some(level) = env.var(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Resolved data directory
    pub fn storage_root(&self, env: &dyn Environment) -> WardenResult<PathBuf> {
        match &self.storage.root {
            Some(root) => Ok(expand_path(env, root)),
            None => env
                .home_dir()
                .map(|home| home.join(DATA_DIR))
                .ok_or_else(|| {
                    WardenError::config(
                        "Cannot determine home directory; set storage.root or WARDEN_HOME",
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticEnvironment;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.permission.mode, PermissionMode::Default);
        assert!(!settings.hooks.rewrite_enabled);
        assert_eq!(settings.hooks.default_timeout(), None);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let home = TempDir::new().unwrap();
        let env = StaticEnvironment::new().with_home(home.path());
        let settings = Settings::load(&env).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.storage_root(&env).unwrap(),
            home.path().join(".warden")
        );
    }

    #[test]
    fn test_load_reads_home_config() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".warden")).unwrap();
        fs::write(
            home.path().join(".warden/config.toml"),
            "[hooks]\nrewrite_enabled = true\n",
        )
        .unwrap();

        let env = StaticEnvironment::new().with_home(home.path());
        let settings = Settings::load(&env).unwrap();
        assert!(settings.hooks.rewrite_enabled);
    }

    #[test]
    fn test_warden_config_points_at_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"permission": {"mode": "prompt"}}"#).unwrap();

        let env = StaticEnvironment::new().with_var(CONFIG_ENV, path.to_string_lossy());
        let settings = Settings::load(&env).unwrap();
        assert_eq!(settings.permission.mode, PermissionMode::Prompt);
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[permission]\nmode = \"deny\"\n").unwrap();

        let env = StaticEnvironment::new()
            .with_home("/home/agent")
            .with_var(CONFIG_ENV, path.to_string_lossy())
            .with_var(PERMISSION_MODE_ENV, "bypass")
            .with_var(REWRITE_PROMPTS_ENV, "yes")
            .with_var(LOG_LEVEL_ENV, "debug")
            .with_var(HOME_ENV, "~/state");
        let settings = Settings::load(&env).unwrap();

        assert_eq!(settings.permission.mode, PermissionMode::Bypass);
        assert!(settings.hooks.rewrite_enabled);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(
            settings.storage_root(&env).unwrap(),
            PathBuf::from("/home/agent/state")
        );
    }

    #[test]
    fn test_invalid_env_values_are_rejected() {
        let env = StaticEnvironment::new().with_var(PERMISSION_MODE_ENV, "sometimes");
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply_env(&env),
            Err(WardenError::Config { .. })
        ));

        let env = StaticEnvironment::new().with_var(REWRITE_PROMPTS_ENV, "maybe");
        assert!(settings.apply_env(&env).is_err());
    }

    #[test]
    fn test_storage_root_requires_home() {
        let settings = Settings::default();
        assert!(settings.storage_root(&StaticEnvironment::new()).is_err());
    }
}
