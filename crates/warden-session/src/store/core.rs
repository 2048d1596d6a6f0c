//! Store struct, on-disk layout and session creation

use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use warden_core::config::{Environment, Settings};
use warden_core::error::{WardenError, WardenResult};

use crate::session::{SessionMeta, is_valid_session_id, new_session_id};

pub(super) const SESSIONS_DIR: &str = "sessions";
pub(super) const META_FILE: &str = "meta.json";
pub(super) const EVENTS_FILE: &str = "events.jsonl";

/// Next sequence number for one session; `None` until recovered from disk
pub(super) type SeqCursor = Arc<Mutex<Option<u64>>>;

/// Append-only JSONL event store
///
/// ```text
/// {root}/sessions/
///   0123456789abcdef0123456789abcdef/
///     meta.json
///     events.jsonl
/// ```
///
/// Safe to share between tasks; appends to one session are serialized by a
/// per-session cursor. Nothing coordinates separate processes.
#[derive(Debug)]
pub struct SessionEventStore {
    root: PathBuf,
    pub(super) cursors: DashMap<String, SeqCursor>,
}

impl SessionEventStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cursors: DashMap::new(),
        }
    }

    /// Store rooted at the configured data directory
    pub fn from_settings(settings: &Settings, env: &dyn Environment) -> WardenResult<Self> {
        Ok(Self::new(settings.storage_root(env)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(super) fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// Directory of a session; rejects anything but a 32-hex-character id
    pub fn session_dir(&self, id: &str) -> WardenResult<PathBuf> {
        if !is_valid_session_id(id) {
            return Err(WardenError::invalid_input_field(
                format!("Invalid session id '{}': expected 32 hex characters", id),
                "session_id",
            ));
        }
        Ok(self.sessions_dir().join(id))
    }

    pub fn events_path(&self, id: &str) -> WardenResult<PathBuf> {
        Ok(self.session_dir(id)?.join(EVENTS_FILE))
    }

    pub(super) fn meta_path(&self, id: &str) -> WardenResult<PathBuf> {
        Ok(self.session_dir(id)?.join(META_FILE))
    }

    pub(super) async fn ensure_session_dir(&self, id: &str) -> WardenResult<PathBuf> {
        let dir = self.session_dir(id)?;
        fs::create_dir_all(&dir).await.map_err(|e| {
            WardenError::io_with_path(
                format!("Failed to create session directory: {}", e),
                dir.display().to_string(),
            )
        })?;
        Ok(dir)
    }

    /// Create a session with a fresh id and write its `meta.json`
    pub async fn create_session(&self, metadata: HashMap<String, String>) -> WardenResult<String> {
        let id = new_session_id();
        self.ensure_session_dir(&id).await?;
        self.save_metadata(&SessionMeta::new(&id, metadata)).await?;
        info!("Created session {}", id);
        Ok(id)
    }

    /// Cursor for `id`, created on first use
    pub(super) fn cursor(&self, id: &str) -> SeqCursor {
        self.cursors.entry(id.to_string()).or_default().clone()
    }
}
