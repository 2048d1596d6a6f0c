//! Settings and environment access
//!
//! [`Settings`] come from an optional config file plus a handful of
//! `WARDEN_*` environment overrides. Every environment lookup goes through the
//! [`Environment`] trait so tests can pin the home directory and variables.

pub mod environment;
pub mod file_loader;
pub mod settings;

pub use environment::{Environment, StaticEnvironment, SystemEnvironment, expand_path};
pub use file_loader::load_from_file;
pub use settings::{
    HookSettings, LoggingSettings, PermissionSettings, Settings, StorageSettings,
};
