//! Hook pipeline for Warden
//!
//! Hooks intercept in-flight data at six fixed lifecycle points. For each point
//! the [`HookEngine`] walks the registered [`HookMatcher`]s in order; a matcher
//! whose wildcard pattern matches the subject (the tool name for tool points,
//! the point's own name otherwise) runs its callbacks, which may rewrite the
//! value or block the step.
//!
//! # Examples
//!
//! ```rust
//! use warden_core::context::CallContext;
//! use warden_core::hooks::{CallbackHook, HookDecision, HookEngine, HookMatcher, HookPoint, HookRegistry};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let guard = HookMatcher::new("no-rm", "Bash")?.with_callback(CallbackHook::new(|payload| async move {
//!     let command = payload["tool_input"]["command"].as_str().unwrap_or_default().to_string();
//!     if command.starts_with("rm ") {
//!         Ok(HookDecision::block("rm is not allowed").with_action("blocked rm"))
//!     } else {
//!         Ok(HookDecision::pass())
//!     }
//! }));
//!
//! let mut registry = HookRegistry::new();
//! registry.register(HookPoint::PreToolUse, guard);
//! let engine = HookEngine::new(registry);
//!
//! let outcome = engine
//!     .pre_tool_use("Bash", json!({"command": "rm -rf /"}), &CallContext::new())
//!     .await?;
//! assert!(outcome.is_blocked());
//! assert_eq!(outcome.events.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod callback_hook;
pub mod executor;
pub mod factory;
pub mod matcher;
pub mod registry;
pub mod types;

pub use crate::events::HookEvent;
pub use callback_hook::{CallbackHook, HookCallback, SharedHookCallback};
pub use executor::{HookEngine, rewrite_last_user_prompt};
pub use factory::{HookEngineFactory, SystemPromptInjector};
pub use matcher::{HookMatcher, PatternMatcher, matches};
pub use registry::HookRegistry;
pub use types::{HookDecision, HookOutcome, HookPoint, ModelOutput};
