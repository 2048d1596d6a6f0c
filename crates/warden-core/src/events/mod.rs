//! Session event model
//!
//! Every activity record the agent runtime produces is an [`Event`]: a common
//! envelope (`seq`, `ts`) around one [`EventKind`]. On the wire an event is a
//! flat JSON object discriminated by its `type` field:
//!
//! ```json
//! {"type":"tool_use","tool_use_id":"toolu_1","name":"Read","input":{"file_path":"a.txt"},"seq":3,"ts":1718000000.25}
//! ```
//!
//! `seq` and `ts` are only stamped by the session store at persistence time.
//! Types this crate does not know decode to [`EventKind::Passthrough`] and
//! re-encode with every original field intact.

mod codec;
mod kinds;

pub use kinds::{
    AssistantDeltaEvent, AssistantMessageEvent, CompactionEvent, EventKind, FinalResultEvent,
    HookEvent, InitEvent, PassthroughEvent, RuntimeErrorEvent, ToolResultEvent, ToolUseEvent,
    UserMessageEvent,
};

use serde_json::Value;

/// One session activity record
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Per-session sequence number, assigned when persisted
    pub seq: Option<u64>,
    /// Wall-clock seconds since the Unix epoch, assigned when persisted
    pub ts: Option<f64>,
    /// The typed payload
    pub kind: EventKind,
}

impl Event {
    /// Wrap a payload in an unstamped envelope
    pub fn new(kind: impl Into<EventKind>) -> Self {
        Self {
            seq: None,
            ts: None,
            kind: kind.into(),
        }
    }

    /// The wire discriminator of this event
    pub fn event_type(&self) -> &str {
        self.kind.event_type()
    }

    /// Streaming fragments are never persisted
    pub fn is_delta(&self) -> bool {
        self.kind.is_delta()
    }

    /// Return a copy stamped with a sequence number and timestamp
    pub fn stamped(mut self, seq: u64, ts: f64) -> Self {
        self.seq = Some(seq);
        self.ts = Some(ts);
        self
    }

    pub fn user_message(text: impl Into<String>) -> Self {
        Self::new(UserMessageEvent { text: text.into() })
    }

    pub fn assistant_delta(text: impl Into<String>) -> Self {
        Self::new(AssistantDeltaEvent { text: text.into() })
    }

    pub fn assistant_message(text: impl Into<String>) -> Self {
        Self::new(AssistantMessageEvent {
            text: text.into(),
            ..Default::default()
        })
    }

    pub fn tool_use(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        input: Value,
    ) -> Self {
        Self::new(ToolUseEvent {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            input,
        })
    }

    pub fn tool_result(tool_use_id: impl Into<String>, output: Value, is_error: bool) -> Self {
        Self::new(ToolResultEvent {
            tool_use_id: tool_use_id.into(),
            output,
            is_error,
        })
    }

    pub fn runtime_error(message: impl Into<String>, fatal: bool) -> Self {
        Self::new(RuntimeErrorEvent {
            message: message.into(),
            kind: None,
            fatal,
        })
    }

    /// Decode one JSON Lines record
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Encode as a single JSON Lines record, without the trailing newline
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<HookEvent> for Event {
    fn from(record: HookEvent) -> Self {
        Self::new(record)
    }
}
