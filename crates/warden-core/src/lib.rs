//! Warden Core Library
//!
//! The control plane of an agent runtime: the session event model, the hook
//! pipeline that can observe, rewrite or block in-flight data at six lifecycle
//! points, the permission gate consulted before every tool call, and the
//! settings that configure them.

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod hooks;
pub mod permission;
pub mod utils;

// Re-export commonly used types
pub use config::{Environment, Settings, StaticEnvironment, SystemEnvironment};
pub use context::CallContext;
pub use error::{ResultExt, UnifiedError, WardenError, WardenResult};
pub use events::{Event, EventKind, HookEvent};
pub use hooks::{
    CallbackHook, HookCallback, HookDecision, HookEngine, HookEngineFactory, HookMatcher,
    HookOutcome, HookPoint, HookRegistry, ModelOutput,
};
pub use permission::{ApprovalResult, PermissionGate, PermissionMode, Question, QuestionAnswerer};
