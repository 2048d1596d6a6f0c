//! Injected environment capability

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of environment variables and the user's home directory
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
    fn home_dir(&self) -> Option<PathBuf>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Fixed variables and home directory, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
    home: Option<PathBuf>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}

/// Expand a leading `~` against the environment's home directory
pub fn expand_path(env: &dyn Environment, raw: &str) -> PathBuf {
    let home = || {
        env.home_dir()
            .map(|home| home.to_string_lossy().into_owned())
    };
    PathBuf::from(shellexpand::tilde_with_context(raw, home).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_static_environment() {
        let env = StaticEnvironment::new()
            .with_var("WARDEN_HOME", "/srv/warden")
            .with_home("/home/agent");
        assert_eq!(env.var("WARDEN_HOME").as_deref(), Some("/srv/warden"));
        assert_eq!(env.var("MISSING"), None);
        assert_eq!(env.home_dir().as_deref(), Some(Path::new("/home/agent")));
    }

    #[test]
    fn test_expand_path_uses_injected_home() {
        let env = StaticEnvironment::new().with_home("/home/agent");
        assert_eq!(
            expand_path(&env, "~/.warden"),
            PathBuf::from("/home/agent/.warden")
        );
        assert_eq!(expand_path(&env, "/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_expand_path_bare_tilde_and_nested_home() {
        let env = StaticEnvironment::new().with_home(PathBuf::from("/home").join("agent"));
        assert_eq!(expand_path(&env, "~"), PathBuf::from("/home/agent"));
        assert_eq!(
            expand_path(&env, "~/data/logs"),
            PathBuf::from("/home/agent/data/logs")
        );
    }

    #[test]
    fn test_expand_path_without_home_keeps_tilde() {
        let env = StaticEnvironment::new();
        assert_eq!(expand_path(&env, "~/x"), PathBuf::from("~/x"));
    }
}
