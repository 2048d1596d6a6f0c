//! Callback hooks
//!
//! A hook callback is a single async capability: payload in, decision out.
//! Implement [`HookCallback`] on your own type, or wrap a closure in
//! [`CallbackHook`].

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::types::HookDecision;
use crate::error::WardenResult;

/// Receives a hook payload and decides what happens to the in-flight value.
///
/// Returning an error aborts the whole hook chain; the error reaches the
/// caller unchanged.
#[async_trait]
pub trait HookCallback: Send + Sync {
    async fn call(&self, payload: Value) -> WardenResult<HookDecision>;
}

/// Shared callback type
pub type SharedHookCallback = Arc<dyn HookCallback>;

type CallbackFn = dyn Fn(Value) -> BoxFuture<'static, WardenResult<HookDecision>> + Send + Sync;

/// Closure-backed hook callback
#[derive(Clone)]
pub struct CallbackHook {
    callback: Arc<CallbackFn>,
}

impl CallbackHook {
    /// Wrap an async closure
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = WardenResult<HookDecision>> + Send + 'static,
    {
        let boxed: Arc<CallbackFn> = Arc::new(move |payload| callback(payload).boxed());
        Self { callback: boxed }
    }

    /// Wrap a synchronous closure
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(Value) -> WardenResult<HookDecision> + Send + Sync + 'static,
    {
        Self::new(move |payload| std::future::ready(callback(payload)))
    }
}

#[async_trait]
impl HookCallback for CallbackHook {
    async fn call(&self, payload: Value) -> WardenResult<HookDecision> {
        (self.callback)(payload).await
    }
}

impl fmt::Debug for CallbackHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHook").finish_non_exhaustive()
    }
}
