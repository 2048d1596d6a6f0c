//! Hook type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::WardenError;
use crate::events::HookEvent;

/// The six lifecycle positions where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPoint {
    /// The user submitted a prompt
    UserPromptSubmit,
    /// Conversation history is being compacted
    SessionCompacting,
    /// Right before a model request is sent
    BeforeModelCall,
    /// Right after a model response arrived
    AfterModelCall,
    /// Before a tool executes
    PreToolUse,
    /// After a tool executed
    PostToolUse,
}

impl HookPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::UserPromptSubmit => "UserPromptSubmit",
            HookPoint::SessionCompacting => "SessionCompacting",
            HookPoint::BeforeModelCall => "BeforeModelCall",
            HookPoint::AfterModelCall => "AfterModelCall",
            HookPoint::PreToolUse => "PreToolUse",
            HookPoint::PostToolUse => "PostToolUse",
        }
    }

    /// Tool points match against the tool name; the others against their own label
    pub fn is_tool_point(&self) -> bool {
        matches!(self, HookPoint::PreToolUse | HookPoint::PostToolUse)
    }

    pub fn all() -> &'static [HookPoint] {
        &[
            HookPoint::UserPromptSubmit,
            HookPoint::SessionCompacting,
            HookPoint::BeforeModelCall,
            HookPoint::AfterModelCall,
            HookPoint::PreToolUse,
            HookPoint::PostToolUse,
        ]
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookPoint {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookPoint::all()
            .iter()
            .copied()
            .find(|point| point.as_str() == s)
            .ok_or_else(|| WardenError::invalid_input(format!("Unknown hook point: {}", s)))
    }
}

/// A complete model response, as seen by `AfterModelCall` hooks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

impl ModelOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// What a hook callback wants done with the in-flight value.
///
/// Only the override field relevant to the hook point is consulted; the rest
/// are ignored. `action` is a free-text label copied into the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookDecision {
    pub block: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// UserPromptSubmit, or the last user turn at BeforeModelCall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// SessionCompacting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compaction_output: Option<Value>,
    /// BeforeModelCall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_input: Option<Vec<Value>>,
    /// AfterModelCall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_output: Option<ModelOutput>,
    /// PreToolUse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<Value>,
    /// PostToolUse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<Value>,
}

impl HookDecision {
    /// Let the value through unchanged
    pub fn pass() -> Self {
        Self::default()
    }

    /// Stop the whole step
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            block: true,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_compaction_output(mut self, output: Value) -> Self {
        self.compaction_output = Some(output);
        self
    }

    pub fn with_model_input(mut self, input: Vec<Value>) -> Self {
        self.model_input = Some(input);
        self
    }

    pub fn with_model_output(mut self, output: ModelOutput) -> Self {
        self.model_output = Some(output);
        self
    }

    pub fn with_tool_input(mut self, input: Value) -> Self {
        self.tool_input = Some(input);
        self
    }

    pub fn with_tool_output(mut self, output: Value) -> Self {
        self.tool_output = Some(output);
        self
    }
}

/// Result of running one hook point
#[derive(Debug, Clone, PartialEq)]
pub struct HookOutcome<T> {
    /// The value after every applied override (unchanged by a blocking matcher)
    pub value: T,
    /// One audit record per matcher evaluated, in order
    pub events: Vec<HookEvent>,
    /// The blocking decision, if the chain stopped early
    pub decision: Option<HookDecision>,
}

impl<T> HookOutcome<T> {
    pub fn is_blocked(&self) -> bool {
        self.decision.as_ref().is_some_and(|d| d.block)
    }

    /// Explanation for a blocked step: the reason, else the action label
    pub fn block_message(&self) -> Option<String> {
        let decision = self.decision.as_ref().filter(|d| d.block)?;
        let matcher = self
            .events
            .last()
            .map(|e| e.matcher.as_str())
            .unwrap_or("unknown");
        Some(
            decision
                .reason
                .clone()
                .or_else(|| decision.action.clone())
                .unwrap_or_else(|| format!("Blocked by hook matcher '{}'", matcher)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_point_round_trip_names() {
        for point in HookPoint::all() {
            assert_eq!(point.as_str().parse::<HookPoint>().unwrap(), *point);
            assert_eq!(
                serde_json::to_value(point).unwrap(),
                json!(point.as_str())
            );
        }
        assert!("preToolUse".parse::<HookPoint>().is_err());
    }

    #[test]
    fn test_tool_points() {
        assert!(HookPoint::PreToolUse.is_tool_point());
        assert!(HookPoint::PostToolUse.is_tool_point());
        assert!(!HookPoint::BeforeModelCall.is_tool_point());
    }

    #[test]
    fn test_decision_from_callback_json() {
        let decision: HookDecision =
            serde_json::from_value(json!({"block": true, "reason": "nope", "extra": 1})).unwrap();
        assert!(decision.block);
        assert_eq!(decision.reason.as_deref(), Some("nope"));
        assert_eq!(decision.tool_input, None);

        let empty: HookDecision = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, HookDecision::pass());
    }

    #[test]
    fn test_block_message_falls_back_to_action_then_matcher() {
        let mut outcome = HookOutcome {
            value: (),
            events: vec![HookEvent {
                hook_point: "PreToolUse".into(),
                matcher: "guard".into(),
                matched: true,
                duration_ms: 0,
                action: None,
            }],
            decision: Some(HookDecision::block("too risky")),
        };
        assert_eq!(outcome.block_message().as_deref(), Some("too risky"));

        outcome.decision = Some(HookDecision {
            block: true,
            action: Some("denied by policy".into()),
            ..Default::default()
        });
        assert_eq!(outcome.block_message().as_deref(), Some("denied by policy"));

        outcome.decision = Some(HookDecision {
            block: true,
            ..Default::default()
        });
        assert_eq!(
            outcome.block_message().as_deref(),
            Some("Blocked by hook matcher 'guard'")
        );

        outcome.decision = None;
        assert!(!outcome.is_blocked());
        assert_eq!(outcome.block_message(), None);
    }
}
