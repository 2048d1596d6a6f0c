//! JSON encoding for [`Event`]
//!
//! Decoding reads the `type` discriminator and dispatches through a fixed
//! table of variant decoders; anything not in the table becomes a passthrough.

use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Event;
use super::kinds::*;

const TYPE_FIELD: &str = "type";
const SEQ_FIELD: &str = "seq";
const TS_FIELD: &str = "ts";

type VariantDecoder = fn(Value) -> serde_json::Result<EventKind>;

fn decode<T>(value: Value) -> serde_json::Result<EventKind>
where
    T: serde::de::DeserializeOwned + Into<EventKind>,
{
    serde_json::from_value::<T>(value).map(Into::into)
}

const DECODERS: &[(&str, VariantDecoder)] = &[
    (EventKind::INIT, decode::<InitEvent>),
    (EventKind::USER_MESSAGE, decode::<UserMessageEvent>),
    (EventKind::ASSISTANT_DELTA, decode::<AssistantDeltaEvent>),
    (EventKind::ASSISTANT_MESSAGE, decode::<AssistantMessageEvent>),
    (EventKind::TOOL_USE, decode::<ToolUseEvent>),
    (EventKind::TOOL_RESULT, decode::<ToolResultEvent>),
    (EventKind::HOOK_EVENT, decode::<HookEvent>),
    (EventKind::COMPACTION, decode::<CompactionEvent>),
    (EventKind::RUNTIME_ERROR, decode::<RuntimeErrorEvent>),
    (EventKind::FINAL_RESULT, decode::<FinalResultEvent>),
];

fn payload_fields(kind: &EventKind) -> serde_json::Result<Map<String, Value>> {
    let value = match kind {
        EventKind::Init(e) => serde_json::to_value(e)?,
        EventKind::UserMessage(e) => serde_json::to_value(e)?,
        EventKind::AssistantDelta(e) => serde_json::to_value(e)?,
        EventKind::AssistantMessage(e) => serde_json::to_value(e)?,
        EventKind::ToolUse(e) => serde_json::to_value(e)?,
        EventKind::ToolResult(e) => serde_json::to_value(e)?,
        EventKind::HookEvent(e) => serde_json::to_value(e)?,
        EventKind::Compaction(e) => serde_json::to_value(e)?,
        EventKind::RuntimeError(e) => serde_json::to_value(e)?,
        EventKind::FinalResult(e) => serde_json::to_value(e)?,
        EventKind::Passthrough(p) => return Ok(p.fields.clone()),
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ser::Error::custom(format!(
            "event payload encoded to a non-object: {}",
            other
        ))),
    }
}

/// Move `key` into the envelope only if it parses; otherwise it stays a
/// payload field so passthrough events keep it verbatim
fn take_envelope_field<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    parse: fn(&Value) -> Option<T>,
) -> Option<T> {
    let parsed = fields.get(key).and_then(parse)?;
    fields.remove(key);
    Some(parsed)
}

impl Event {
    /// Encode to a JSON object value
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let mut fields = payload_fields(&self.kind)?;
        fields.insert(TYPE_FIELD.to_string(), Value::from(self.event_type()));
        if let Some(seq) = self.seq {
            fields.insert(SEQ_FIELD.to_string(), Value::from(seq));
        }
        if let Some(ts) = self.ts {
            fields.insert(TS_FIELD.to_string(), Value::from(ts));
        }
        Ok(Value::Object(fields))
    }

    /// Decode from a JSON value
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(de::Error::custom("event must be a JSON object"));
        };

        let event_type = match fields.remove(TYPE_FIELD) {
            Some(Value::String(t)) => t,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "event `type` must be a string, got {}",
                    other
                )));
            }
            None => return Err(de::Error::missing_field(TYPE_FIELD)),
        };
        let seq = take_envelope_field(&mut fields, SEQ_FIELD, Value::as_u64);
        let ts = take_envelope_field(&mut fields, TS_FIELD, Value::as_f64);

        let kind = match DECODERS.iter().find(|(name, _)| *name == event_type) {
            Some((_, decoder)) => decoder(Value::Object(fields))?,
            None => EventKind::Passthrough(PassthroughEvent { event_type, fields }),
        };

        Ok(Self { seq, ts, kind })
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Event::from_value(raw).map_err(de::Error::custom)
    }
}
