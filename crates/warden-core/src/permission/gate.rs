//! Permission gate evaluation

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::handler::{QuestionAnswerer, SharedQuestionAnswerer};
use super::types::{ApprovalResult, PermissionMode, Question};
use crate::context::CallContext;
use crate::error::{ResultExt, WardenResult};
use crate::utils::json::{coerce_bool, coerce_i64, first_present_field};

/// The tool that carries approval questions itself; gating it would deadlock
const ASK_USER_QUESTION: &str = "AskUserQuestion";

const AFFIRMATIVE: &[&str] = &["y", "yes", "true", "1", "allow", "ok"];

/// Read-only tools allowed without asking in `default` mode, with the input
/// fields each one needs. A tool with several keys needs any one of them.
const SAFE_TOOLS: &[(&str, &[&str])] = &[
    ("Read", &["file_path", "filePath"]),
    ("Glob", &["pattern"]),
    ("Grep", &["query"]),
    ("Skill", &[]),
    ("SlashCommand", &[]),
    (ASK_USER_QUESTION, &[]),
];

/// Allow/deny policy for tool invocations
#[derive(Clone, Default)]
pub struct PermissionGate {
    mode: PermissionMode,
    answerer: Option<SharedQuestionAnswerer>,
}

impl PermissionGate {
    pub fn new(mode: PermissionMode) -> Self {
        Self {
            mode,
            answerer: None,
        }
    }

    pub fn bypass() -> Self {
        Self::new(PermissionMode::Bypass)
    }

    pub fn deny() -> Self {
        Self::new(PermissionMode::Deny)
    }

    pub fn prompt() -> Self {
        Self::new(PermissionMode::Prompt)
    }

    /// Attach the front end that answers approval questions
    pub fn with_answerer(mut self, answerer: impl QuestionAnswerer + 'static) -> Self {
        self.answerer = Some(Arc::new(answerer));
        self
    }

    pub fn with_shared_answerer(mut self, answerer: SharedQuestionAnswerer) -> Self {
        self.answerer = Some(answerer);
        self
    }

    pub fn mode(&self) -> PermissionMode {
        self.mode
    }

    pub fn has_answerer(&self) -> bool {
        self.answerer.is_some()
    }

    /// Decide whether `tool_name` may run with `input`.
    ///
    /// Denials are ordinary results. Only a failing answerer yields `Err`.
    pub async fn approve(
        &self,
        tool_name: &str,
        input: &Value,
        context: &CallContext,
    ) -> WardenResult<ApprovalResult> {
        if tool_name == ASK_USER_QUESTION {
            return Ok(ApprovalResult::allow());
        }

        let result = match self.mode {
            PermissionMode::Bypass => ApprovalResult::allow(),
            PermissionMode::Deny => ApprovalResult::deny(format!(
                "Tool '{}' is not allowed: permission mode is '{}'",
                tool_name, self.mode
            )),
            PermissionMode::Default => match safe_tool_check(tool_name, input) {
                Some(Ok(())) => ApprovalResult::allow(),
                Some(Err(message)) => ApprovalResult::deny(message),
                None => self.ask(tool_name, context).await?,
            },
            PermissionMode::Prompt => self.ask(tool_name, context).await?,
        };

        if result.allowed {
            debug!("Approved tool '{}' (mode: {})", tool_name, self.mode);
        } else {
            info!(
                "Denied tool '{}' (mode: {}): {}",
                tool_name,
                self.mode,
                result.deny_message.as_deref().unwrap_or_default()
            );
        }
        Ok(result)
    }

    async fn ask(&self, tool_name: &str, context: &CallContext) -> WardenResult<ApprovalResult> {
        let question = Question {
            id: context
                .tool_use_id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            prompt: format!("Allow tool '{}' to run?", tool_name),
            choices: vec!["yes".to_string(), "no".to_string()],
        };

        let Some(answerer) = &self.answerer else {
            return Ok(ApprovalResult::deny(format!(
                "Tool '{}' requires approval (mode: {}) but no interactive answerer is configured",
                tool_name, self.mode
            ))
            .with_question(question));
        };

        debug!("Asking for approval of tool '{}' (question {})", tool_name, question.id);
        let answer = answerer
            .ask(question.clone())
            .await
            .with_context(|| format!("asking approval for tool '{}'", tool_name))?;

        let result = if is_affirmative(&answer) {
            ApprovalResult::allow()
        } else {
            ApprovalResult::deny(format!("User declined to run tool '{}'", tool_name))
        };
        Ok(result.with_question(question))
    }
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("mode", &self.mode)
            .field("has_answerer", &self.answerer.is_some())
            .finish()
    }
}

/// `None` if the tool is outside the safe set, otherwise the schema check
fn safe_tool_check(tool_name: &str, input: &Value) -> Option<Result<(), String>> {
    let (_, required) = SAFE_TOOLS.iter().find(|(name, _)| *name == tool_name)?;
    if required.is_empty() {
        return Some(Ok(()));
    }
    let present = input
        .as_object()
        .and_then(|object| first_present_field(object, required))
        .is_some();
    if present {
        Some(Ok(()))
    } else {
        Some(Err(format!(
            "Tool '{}' input is invalid: missing required field '{}'",
            tool_name,
            required.join("' or '")
        )))
    }
}

/// Interpret an answer from the front end
fn is_affirmative(answer: &Value) -> bool {
    match answer {
        Value::String(s) => AFFIRMATIVE.contains(&s.trim().to_lowercase().as_str()),
        Value::Bool(_) | Value::Number(_) => {
            coerce_bool(answer) == Some(true) || coerce_i64(answer) == Some(1)
        }
        _ => false,
    }
}
