//! Warden: the control plane of an agent runtime
//!
//! The agent loop calls the hook engine around every model and tool call,
//! asks the permission gate before running a tool, and appends everything it
//! produces to the session event store. [`ControlPlane`] wires the three
//! together from [`Settings`].

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

pub use warden_core::config::{
    Environment, LoggingSettings, Settings, StaticEnvironment, SystemEnvironment,
};
pub use warden_core::context::CallContext;
pub use warden_core::error::{ResultExt, UnifiedError, WardenError, WardenResult};
pub use warden_core::events::{Event, EventKind, HookEvent};
pub use warden_core::hooks::{
    CallbackHook, HookCallback, HookDecision, HookEngine, HookEngineFactory, HookMatcher,
    HookOutcome, HookPoint, HookRegistry, ModelOutput,
};
pub use warden_core::permission::{
    ApprovalResult, PermissionGate, PermissionMode, Question, QuestionAnswerer,
};
pub use warden_session::{SessionEventStore, SessionMeta};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `settings.level`. Fails if a subscriber is already set.
pub fn init_tracing(settings: &LoggingSettings, env: &dyn Environment) -> anyhow::Result<()> {
    let directive = env
        .var("RUST_LOG")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| settings.level.clone());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", directive, e))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match settings.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}

/// Permission gate, hook registry and event store built from one [`Settings`]
#[derive(Debug)]
pub struct ControlPlane {
    settings: Settings,
    gate: PermissionGate,
    hooks: HookRegistry,
    store: Arc<SessionEventStore>,
}

impl ControlPlane {
    /// Load settings from the environment and build from them
    pub fn load(env: &dyn Environment) -> WardenResult<Self> {
        let settings = Settings::load(env)?;
        Self::from_settings(settings, env)
    }

    /// Gate in the configured mode, empty hook registry, store at the data root
    pub fn from_settings(settings: Settings, env: &dyn Environment) -> WardenResult<Self> {
        let store = SessionEventStore::from_settings(&settings, env)?;
        tracing::info!(
            "Control plane ready (permission mode: {}, storage: {})",
            settings.permission.mode,
            store.root().display()
        );
        Ok(Self {
            gate: PermissionGate::new(settings.permission.mode),
            hooks: HookRegistry::new(),
            store: Arc::new(store),
            settings,
        })
    }

    /// Attach the front end that answers approval questions
    pub fn with_answerer(mut self, answerer: impl QuestionAnswerer + 'static) -> Self {
        self.gate = self.gate.with_answerer(answerer);
        self
    }

    pub fn register_hook(&mut self, point: HookPoint, matcher: HookMatcher) -> &mut Self {
        self.hooks.register(point, matcher);
        self
    }

    /// Engine over the registered hooks with the configured rewrite flag and
    /// default timeout
    pub fn engine(&self) -> HookEngine {
        HookEngine::new(self.hooks.clone())
            .with_rewrite(self.settings.hooks.rewrite_enabled)
            .with_default_timeout(self.settings.hooks.default_timeout())
    }

    /// Append a hook outcome's audit records to a session log
    pub async fn record_hook_events(
        &self,
        session_id: &str,
        events: &[HookEvent],
    ) -> WardenResult<Vec<Event>> {
        let mut stamped = Vec::with_capacity(events.len());
        for record in events {
            stamped.push(
                self.store
                    .append_event(session_id, Event::from(record.clone()))
                    .await?,
            );
        }
        Ok(stamped)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn store(&self) -> Arc<SessionEventStore> {
        Arc::clone(&self.store)
    }
}
