//! Event payload variants

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Session started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitEvent {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

/// A prompt submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessageEvent {
    pub text: String,
}

/// A streaming fragment of assistant text (never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantDeltaEvent {
    pub text: String,
}

/// A complete assistant turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessageEvent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

/// The model requested a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseEvent {
    pub tool_use_id: String,
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

/// A tool invocation finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultEvent {
    pub tool_use_id: String,
    #[serde(default)]
    pub output: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

/// Audit record for one matcher evaluated by the hook engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEvent {
    /// Name of the hook point, e.g. `PreToolUse`
    pub hook_point: String,
    /// Name of the matcher that was evaluated
    pub matcher: String,
    /// Whether the matcher's pattern matched the subject
    pub matched: bool,
    /// Time spent in the matcher's callbacks
    pub duration_ms: u64,
    /// Action label reported by the last callback that ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Conversation history was summarized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionEvent {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_before: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_after: Option<u64>,
}

/// A failure surfaced by the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeErrorEvent {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fatal: bool,
}

/// The session produced its final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResultEvent {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

/// An event whose `type` is not one of the known variants.
///
/// `fields` holds every original field except `type`, `seq` and `ts`, which
/// live on the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughEvent {
    pub event_type: String,
    pub fields: Map<String, Value>,
}

/// The closed set of event payloads plus the open passthrough case
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Init(InitEvent),
    UserMessage(UserMessageEvent),
    AssistantDelta(AssistantDeltaEvent),
    AssistantMessage(AssistantMessageEvent),
    ToolUse(ToolUseEvent),
    ToolResult(ToolResultEvent),
    HookEvent(HookEvent),
    Compaction(CompactionEvent),
    RuntimeError(RuntimeErrorEvent),
    FinalResult(FinalResultEvent),
    Passthrough(PassthroughEvent),
}

impl EventKind {
    pub const INIT: &'static str = "init";
    pub const USER_MESSAGE: &'static str = "user_message";
    pub const ASSISTANT_DELTA: &'static str = "assistant_delta";
    pub const ASSISTANT_MESSAGE: &'static str = "assistant_message";
    pub const TOOL_USE: &'static str = "tool_use";
    pub const TOOL_RESULT: &'static str = "tool_result";
    pub const HOOK_EVENT: &'static str = "hook_event";
    pub const COMPACTION: &'static str = "compaction";
    pub const RUNTIME_ERROR: &'static str = "runtime_error";
    pub const FINAL_RESULT: &'static str = "final_result";

    /// The wire discriminator
    pub fn event_type(&self) -> &str {
        match self {
            Self::Init(_) => Self::INIT,
            Self::UserMessage(_) => Self::USER_MESSAGE,
            Self::AssistantDelta(_) => Self::ASSISTANT_DELTA,
            Self::AssistantMessage(_) => Self::ASSISTANT_MESSAGE,
            Self::ToolUse(_) => Self::TOOL_USE,
            Self::ToolResult(_) => Self::TOOL_RESULT,
            Self::HookEvent(_) => Self::HOOK_EVENT,
            Self::Compaction(_) => Self::COMPACTION,
            Self::RuntimeError(_) => Self::RUNTIME_ERROR,
            Self::FinalResult(_) => Self::FINAL_RESULT,
            Self::Passthrough(p) => &p.event_type,
        }
    }

    pub fn is_delta(&self) -> bool {
        matches!(self, Self::AssistantDelta(_))
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for EventKind {
                fn from(payload: $payload) -> Self {
                    EventKind::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    InitEvent => Init,
    UserMessageEvent => UserMessage,
    AssistantDeltaEvent => AssistantDelta,
    AssistantMessageEvent => AssistantMessage,
    ToolUseEvent => ToolUse,
    ToolResultEvent => ToolResult,
    HookEvent => HookEvent,
    CompactionEvent => Compaction,
    RuntimeErrorEvent => RuntimeError,
    FinalResultEvent => FinalResult,
    PassthroughEvent => Passthrough,
}
