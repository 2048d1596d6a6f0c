//! Session identity and metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Session ids are 32 hex characters
pub const SESSION_ID_LEN: usize = 32;

/// Contents of a session's `meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub session_id: String,
    /// Seconds since the Unix epoch
    pub created_at: f64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SessionMeta {
    pub fn new(session_id: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: now_seconds(),
            metadata,
        }
    }
}

/// Fresh random id: 32 lowercase hex characters
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn is_valid_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Wall-clock time as fractional epoch seconds
pub(crate) fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
