//! `meta.json` I/O and session listing

use tokio::fs;
use tracing::{debug, warn};

use warden_core::error::{WardenError, WardenResult};

use super::core::{META_FILE, SessionEventStore};
use crate::session::{SessionMeta, is_valid_session_id};

impl SessionEventStore {
    pub(super) async fn save_metadata(&self, meta: &SessionMeta) -> WardenResult<()> {
        let path = self.meta_path(&meta.session_id)?;
        let json = serde_json::to_string_pretty(meta)
            .map_err(|e| WardenError::json(format!("Failed to serialize metadata: {}", e)))?;

        fs::write(&path, json).await.map_err(|e| {
            WardenError::io_with_path(
                format!("Failed to write metadata file: {}", e),
                path.display().to_string(),
            )
        })?;

        debug!("Saved metadata for session {}", meta.session_id);
        Ok(())
    }

    /// Metadata of a session, `None` when it has no `meta.json`
    pub async fn load_metadata(&self, id: &str) -> WardenResult<Option<SessionMeta>> {
        let path = self.meta_path(id)?;
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(WardenError::io_with_path(
                    format!("Failed to read metadata file: {}", e),
                    path.display().to_string(),
                ));
            }
        };

        let meta = serde_json::from_str(&json)
            .map_err(|e| WardenError::json(format!("Failed to deserialize metadata: {}", e)))?;
        Ok(Some(meta))
    }

    /// True once `create_session` has written the session's metadata
    pub async fn session_exists(&self, id: &str) -> bool {
        match self.meta_path(id) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Every session with readable metadata, newest first
    pub async fn list_sessions(&self) -> WardenResult<Vec<SessionMeta>> {
        let dir = self.sessions_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(WardenError::io_with_path(
                    format!("Failed to list sessions: {}", e),
                    dir.display().to_string(),
                ));
            }
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_valid_session_id(&name) {
                continue;
            }
            match self.load_metadata(&name).await {
                Ok(Some(meta)) => sessions.push(meta),
                Ok(None) => warn!("Session {} has no {}; skipping", name, META_FILE),
                Err(e) => warn!("Skipping session {}: {}", name, e),
            }
        }

        sessions.sort_by(|a, b| b.created_at.total_cmp(&a.created_at));
        Ok(sessions)
    }
}
