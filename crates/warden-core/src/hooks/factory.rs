//! Canned hook engines
//!
//! Currently one recipe: an engine that makes sure a fixed system prompt is the
//! first entry of every model request, without ever stacking duplicates.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use super::callback_hook::HookCallback;
use super::executor::HookEngine;
use super::matcher::HookMatcher;
use super::registry::HookRegistry;
use super::types::{HookDecision, HookPoint};
use crate::error::{WardenError, WardenResult};
use crate::utils::json::text_content;

const PREPENDED: &str = "system prompt prepended";
const ALREADY_PRESENT: &str = "system prompt already present";

/// Builds ready-made [`HookEngine`]s
pub struct HookEngineFactory;

impl HookEngineFactory {
    /// Engine with a single `BeforeModelCall` matcher that prepends `prompt`
    /// as a system message unless the first entry already carries `marker`.
    ///
    /// Fails with a config error if `marker` is empty or absent from `prompt`.
    pub fn system_prompt(
        prompt: impl Into<String>,
        marker: impl Into<String>,
        label: Option<&str>,
    ) -> WardenResult<HookEngine> {
        let injector = SystemPromptInjector::new(prompt, marker, label)?;
        let mut registry = HookRegistry::new();
        registry.register(HookPoint::BeforeModelCall, injector.into_matcher()?);
        Ok(HookEngine::new(registry).with_rewrite(true))
    }
}

/// Callback that keeps a marked system prompt at the head of the model input
#[derive(Debug, Clone)]
pub struct SystemPromptInjector {
    prompt: String,
    marker: String,
    label: Option<String>,
}

impl SystemPromptInjector {
    pub fn new(
        prompt: impl Into<String>,
        marker: impl Into<String>,
        label: Option<&str>,
    ) -> WardenResult<Self> {
        let prompt = prompt.into();
        let marker = marker.into();
        if marker.is_empty() {
            return Err(WardenError::config("System prompt marker must not be empty"));
        }
        if !prompt.contains(&marker) {
            return Err(WardenError::config(format!(
                "System prompt does not contain its marker '{}'",
                marker
            )));
        }
        Ok(Self {
            prompt: prompt.trim().to_string(),
            marker,
            label: label.map(str::to_string),
        })
    }

    /// Wrap the injector in a catch-all matcher
    pub fn into_matcher(self) -> WardenResult<HookMatcher> {
        let name = match &self.label {
            Some(label) => format!("system-prompt:{}", label),
            None => "system-prompt".to_string(),
        };
        Ok(HookMatcher::new(name, "*")?.with_callback(self))
    }

    /// True when the first entry is a system message that carries the marker
    pub fn is_present(&self, input: &[Value]) -> bool {
        input.first().is_some_and(|first| {
            first.get("role").and_then(Value::as_str) == Some("system")
                && first
                    .get("content")
                    .and_then(text_content)
                    .is_some_and(|text| text.contains(&self.marker))
        })
    }

    fn action(&self, base: &str) -> String {
        match &self.label {
            Some(label) => format!("{} ({})", base, label),
            None => base.to_string(),
        }
    }
}

#[async_trait]
impl HookCallback for SystemPromptInjector {
    async fn call(&self, payload: Value) -> WardenResult<HookDecision> {
        let input = match payload.get("input") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        if self.is_present(&input) {
            debug!("System prompt marker '{}' already present", self.marker);
            return Ok(HookDecision::pass().with_action(self.action(ALREADY_PRESENT)));
        }

        let mut model_input = Vec::with_capacity(input.len() + 1);
        model_input.push(json!({"role": "system", "content": self.prompt}));
        model_input.extend(input);
        Ok(HookDecision::pass()
            .with_model_input(model_input)
            .with_action(self.action(PREPENDED)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallContext;

    const PROMPT: &str = "  <!-- warden:rules -->\nAlways answer in English.\n";
    const MARKER: &str = "<!-- warden:rules -->";

    #[test]
    fn test_marker_must_be_in_prompt() {
        let err = HookEngineFactory::system_prompt("Be nice.", MARKER, None).unwrap_err();
        assert!(matches!(err, WardenError::Config { .. }));
        let err = HookEngineFactory::system_prompt("Be nice.", "", None).unwrap_err();
        assert!(matches!(err, WardenError::Config { .. }));
    }

    #[tokio::test]
    async fn test_prepends_trimmed_prompt_once() {
        let engine = HookEngineFactory::system_prompt(PROMPT, MARKER, None).unwrap();
        let context = CallContext::new();
        let input = vec![json!({"role": "user", "content": "hi"})];

        let first = engine.before_model_call(input, &context).await.unwrap();
        assert_eq!(first.value.len(), 2);
        assert_eq!(
            first.value[0],
            json!({"role": "system", "content": PROMPT.trim()})
        );
        assert_eq!(first.events[0].action.as_deref(), Some(PREPENDED));

        let second = engine
            .before_model_call(first.value.clone(), &context)
            .await
            .unwrap();
        assert_eq!(second.value, first.value);
        assert_eq!(second.events[0].action.as_deref(), Some(ALREADY_PRESENT));
    }

    #[tokio::test]
    async fn test_label_is_appended_to_actions() {
        let engine = HookEngineFactory::system_prompt(PROMPT, MARKER, Some("rules")).unwrap();
        let outcome = engine
            .before_model_call(Vec::new(), &CallContext::new())
            .await
            .unwrap();
        assert_eq!(outcome.value.len(), 1);
        assert_eq!(
            outcome.events[0].action.as_deref(),
            Some("system prompt prepended (rules)")
        );
        assert_eq!(outcome.events[0].matcher, "system-prompt:rules");
    }

    #[tokio::test]
    async fn test_only_first_entry_is_inspected() {
        let engine = HookEngineFactory::system_prompt(PROMPT, MARKER, None).unwrap();
        let input = vec![
            json!({"role": "user", "content": "hi"}),
            json!({"role": "system", "content": PROMPT}),
        ];
        let outcome = engine
            .before_model_call(input, &CallContext::new())
            .await
            .unwrap();
        assert_eq!(outcome.value.len(), 3);
        assert_eq!(outcome.value[0]["role"], "system");
    }

    #[tokio::test]
    async fn test_marker_found_in_text_parts() {
        let injector = SystemPromptInjector::new(PROMPT, MARKER, None).unwrap();
        let input = vec![json!({
            "role": "system",
            "content": [{"type": "text", "text": PROMPT}],
        })];
        assert!(injector.is_present(&input));

        let decision = injector
            .call(json!({"input": input}))
            .await
            .unwrap();
        assert!(decision.model_input.is_none());
    }

    #[test]
    fn test_other_system_prompt_is_not_mistaken() {
        let injector = SystemPromptInjector::new(PROMPT, MARKER, None).unwrap();
        let input = vec![json!({"role": "system", "content": "You are helpful."})];
        assert!(!injector.is_present(&input));
    }
}
