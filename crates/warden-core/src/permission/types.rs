//! Core types for the permission gate

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::WardenError;

/// Policy applied to every tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    /// Allow everything
    Bypass,
    /// Refuse everything except `AskUserQuestion`
    Deny,
    /// Allow the read-only safe set, ask for the rest
    #[default]
    Default,
    /// Ask for every tool
    Prompt,
}

impl PermissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Bypass => "bypass",
            PermissionMode::Deny => "deny",
            PermissionMode::Default => "default",
            PermissionMode::Prompt => "prompt",
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionMode {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bypass" => Ok(PermissionMode::Bypass),
            "deny" => Ok(PermissionMode::Deny),
            "default" => Ok(PermissionMode::Default),
            "prompt" => Ok(PermissionMode::Prompt),
            other => Err(WardenError::invalid_input_field(
                format!(
                    "Unknown permission mode '{}' (expected bypass, deny, default or prompt)",
                    other
                ),
                "permission.mode",
            )),
        }
    }
}

/// A yes/no question put to the user before a tool runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub choices: Vec<String>,
}

/// Outcome of one approval check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApprovalResult {
    pub allowed: bool,
    /// The question asked, if the interactive path ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    /// Replacement tool input. Reserved: no policy sets it yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_message: Option<String>,
}

impl ApprovalResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            ..Self::default()
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            deny_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.question = Some(question);
        self
    }
}
