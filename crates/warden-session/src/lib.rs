//! Session event log for Warden
//!
//! Each session is a directory under `{root}/sessions/` holding:
//! - `meta.json`: id, creation time and caller metadata
//! - `events.jsonl`: one [`Event`](warden_core::Event) per line, append-only,
//!   with a per-session `seq` starting at 1
//!
//! Streaming deltas are never written. Sequence numbering survives process
//! restarts by recovering the last `seq` from the existing log.

pub mod session;
pub mod store;

pub use session::{SessionMeta, is_valid_session_id, new_session_id};
pub use store::SessionEventStore;
