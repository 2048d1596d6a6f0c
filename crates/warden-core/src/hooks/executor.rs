//! Hook execution engine
//!
//! All six hook points share [`HookEngine::run_chain`]; each public operation
//! only supplies the subject name, the payload builder and the override rule
//! for its point.

use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::callback_hook::HookCallback;
use super::matcher::HookMatcher;
use super::registry::HookRegistry;
use super::types::{HookDecision, HookOutcome, HookPoint, ModelOutput};
use crate::context::CallContext;
use crate::error::{WardenError, WardenResult};
use crate::events::HookEvent;

/// Runs registered hooks at each lifecycle point.
///
/// The engine is immutable: every invocation keeps its state in locals, so one
/// engine can serve concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct HookEngine {
    registry: HookRegistry,
    rewrite_enabled: bool,
    default_timeout: Option<Duration>,
}

impl HookEngine {
    /// Create an engine with prompt rewriting disabled
    pub fn new(registry: HookRegistry) -> Self {
        Self {
            registry,
            rewrite_enabled: false,
            default_timeout: None,
        }
    }

    /// Allow hooks to rewrite the user prompt and the model input
    pub fn with_rewrite(mut self, enabled: bool) -> Self {
        self.rewrite_enabled = enabled;
        self
    }

    /// Timeout for matchers that do not declare their own
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn rewrite_enabled(&self) -> bool {
        self.rewrite_enabled
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// `UserPromptSubmit`: payload `{prompt, context, hook_point}`
    pub async fn user_prompt_submit(
        &self,
        prompt: impl Into<String>,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<String>> {
        let point = HookPoint::UserPromptSubmit;
        let ctx = serde_json::to_value(context)?;
        let rewrite = self.rewrite_enabled;
        self.run_chain(
            point,
            point.as_str(),
            prompt.into(),
            |prompt| json!({"prompt": prompt, "context": ctx, "hook_point": point}),
            |prompt, decision| match decision.prompt.as_deref() {
                Some(new_prompt) if rewrite && !new_prompt.trim().is_empty() => {
                    new_prompt.to_string()
                }
                Some(_) if !rewrite => {
                    debug!("Ignoring prompt override at {}: rewriting disabled", point);
                    prompt
                }
                _ => prompt,
            },
        )
        .await
    }

    /// `SessionCompacting`: payload `{output, context, hook_point}`
    pub async fn session_compacting(
        &self,
        output: Value,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<Value>> {
        let point = HookPoint::SessionCompacting;
        let ctx = serde_json::to_value(context)?;
        self.run_chain(
            point,
            point.as_str(),
            output,
            |output| json!({"output": output, "context": ctx, "hook_point": point}),
            |output, decision| match &decision.compaction_output {
                Some(new_output) if new_output.is_object() => new_output.clone(),
                Some(_) => {
                    warn!("Ignoring non-object compaction override at {}", point);
                    output
                }
                None => output,
            },
        )
        .await
    }

    /// `BeforeModelCall`: payload `{input, context, hook_point}`
    pub async fn before_model_call(
        &self,
        input: Vec<Value>,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<Vec<Value>>> {
        let point = HookPoint::BeforeModelCall;
        let ctx = serde_json::to_value(context)?;
        let rewrite = self.rewrite_enabled;
        self.run_chain(
            point,
            point.as_str(),
            input,
            |input| json!({"input": input, "context": ctx, "hook_point": point}),
            |input, decision| {
                if !rewrite {
                    if decision.model_input.is_some() || decision.prompt.is_some() {
                        debug!("Ignoring model input override at {}: rewriting disabled", point);
                    }
                    return input;
                }
                if let Some(new_input) = &decision.model_input {
                    return new_input.clone();
                }
                match decision.prompt.as_deref() {
                    Some(prompt) if !prompt.trim().is_empty() => {
                        rewrite_last_user_prompt(input, prompt)
                    }
                    _ => input,
                }
            },
        )
        .await
    }

    /// `AfterModelCall`: payload `{assistant_text, context, hook_point}`
    pub async fn after_model_call(
        &self,
        output: ModelOutput,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<ModelOutput>> {
        let point = HookPoint::AfterModelCall;
        let ctx = serde_json::to_value(context)?;
        self.run_chain(
            point,
            point.as_str(),
            output,
            |output| json!({"assistant_text": output.text, "context": ctx, "hook_point": point}),
            |output, decision| decision.model_output.clone().unwrap_or(output),
        )
        .await
    }

    /// `PreToolUse`: payload `{tool_name, tool_input, context, hook_point}`
    pub async fn pre_tool_use(
        &self,
        tool_name: &str,
        tool_input: Value,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<Value>> {
        let point = HookPoint::PreToolUse;
        let ctx = serde_json::to_value(context)?;
        self.run_chain(
            point,
            tool_name,
            tool_input,
            |input| {
                json!({
                    "tool_name": tool_name,
                    "tool_input": input,
                    "context": ctx,
                    "hook_point": point,
                })
            },
            |input, decision| decision.tool_input.clone().unwrap_or(input),
        )
        .await
    }

    /// `PostToolUse`: payload `{tool_name, tool_output, context, hook_point}`
    pub async fn post_tool_use(
        &self,
        tool_name: &str,
        tool_output: Value,
        context: &CallContext,
    ) -> WardenResult<HookOutcome<Value>> {
        let point = HookPoint::PostToolUse;
        let ctx = serde_json::to_value(context)?;
        self.run_chain(
            point,
            tool_name,
            tool_output,
            |output| {
                json!({
                    "tool_name": tool_name,
                    "tool_output": output,
                    "context": ctx,
                    "hook_point": point,
                })
            },
            |output, decision| decision.tool_output.clone().unwrap_or(output),
        )
        .await
    }

    /// Walk the matchers of `point` in order, applying overrides as they come
    async fn run_chain<T, P, A>(
        &self,
        point: HookPoint,
        subject: &str,
        initial: T,
        build_payload: P,
        apply_override: A,
    ) -> WardenResult<HookOutcome<T>>
    where
        P: Fn(&T) -> Value,
        A: Fn(T, &HookDecision) -> T,
    {
        let matchers = self.registry.matchers_for(point);
        let mut value = initial;
        let mut events = Vec::with_capacity(matchers.len());

        if matchers.is_empty() {
            return Ok(HookOutcome {
                value,
                events,
                decision: None,
            });
        }

        debug!(
            "Evaluating {} matcher(s) at {} (subject: {})",
            matchers.len(),
            point,
            subject
        );

        for matcher in matchers {
            let matched = matcher.matches(subject);
            if !matched || matcher.callbacks().is_empty() {
                debug!(
                    "Matcher '{}' at {}: matched={}, nothing to run",
                    matcher.name(),
                    point,
                    matched
                );
                events.push(audit(point, matcher, matched, Duration::ZERO, None));
                continue;
            }

            let payload = build_payload(&value);
            let started = Instant::now();
            // The matcher's result is its last callback's decision, unmodified
            let mut decision = HookDecision::pass();
            for callback in matcher.callbacks() {
                decision = self
                    .invoke(point, matcher, callback.as_ref(), payload.clone())
                    .await?;
                if decision.block {
                    break;
                }
            }
            let elapsed = started.elapsed();
            events.push(audit(
                point,
                matcher,
                true,
                elapsed,
                decision.action.clone(),
            ));

            if decision.block {
                info!(
                    "Matcher '{}' blocked {} (subject: {}): {}",
                    matcher.name(),
                    point,
                    subject,
                    decision
                        .reason
                        .as_deref()
                        .or(decision.action.as_deref())
                        .unwrap_or("no reason given")
                );
                return Ok(HookOutcome {
                    value,
                    events,
                    decision: Some(decision),
                });
            }

            value = apply_override(value, &decision);
        }

        Ok(HookOutcome {
            value,
            events,
            decision: None,
        })
    }

    /// Run one callback, bounded by the matcher's timeout
    async fn invoke(
        &self,
        point: HookPoint,
        matcher: &HookMatcher,
        callback: &dyn HookCallback,
        payload: Value,
    ) -> WardenResult<HookDecision> {
        match matcher.timeout().or(self.default_timeout) {
            Some(limit) => tokio::time::timeout(limit, callback.call(payload))
                .await
                .map_err(|_| {
                    warn!(
                        "Matcher '{}' at {} timed out after {:?}",
                        matcher.name(),
                        point,
                        limit
                    );
                    WardenError::timeout(
                        limit,
                        format!("hook matcher '{}' at {}", matcher.name(), point),
                    )
                })?,
            None => callback.call(payload).await,
        }
    }
}

fn audit(
    point: HookPoint,
    matcher: &HookMatcher,
    matched: bool,
    elapsed: Duration,
    action: Option<String>,
) -> HookEvent {
    HookEvent {
        hook_point: point.to_string(),
        matcher: matcher.name().to_string(),
        matched,
        duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        action,
    }
}

/// Replace the `content` of the last user turn whose content is plain text.
///
/// Entries with structured content, other roles and every other field are left
/// alone. Without such a turn the input is returned unchanged.
pub fn rewrite_last_user_prompt(mut input: Vec<Value>, prompt: &str) -> Vec<Value> {
    let target = input.iter_mut().rev().find(|entry| {
        entry.get("role").and_then(Value::as_str) == Some("user")
            && entry.get("content").is_some_and(Value::is_string)
    });
    if let Some(entry) = target {
        entry["content"] = Value::String(prompt.to_string());
    }
    input
}
