//! Log decoding

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use warden_core::error::{WardenError, WardenResult};
use warden_core::events::Event;

use super::core::SessionEventStore;
use crate::session::is_valid_session_id;

impl SessionEventStore {
    /// All persisted events of a session, in file order.
    ///
    /// An invalid id or a missing log reads as empty. Any undecodable line
    /// fails the whole read.
    pub async fn read_events(&self, id: &str) -> WardenResult<Vec<Event>> {
        if !is_valid_session_id(id) {
            return Ok(Vec::new());
        }
        let path = self.events_path(id)?;
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(WardenError::io_with_path(
                    format!("Failed to open event log: {}", e),
                    path.display().to_string(),
                ));
            }
        };

        let mut lines = BufReader::new(file).lines();
        let mut events = Vec::new();
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line().await.map_err(|e| {
            WardenError::io_with_path(
                format!("Failed to read event log: {}", e),
                path.display().to_string(),
            )
        })? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let event = Event::from_json_line(&line).map_err(|e| {
                WardenError::json(format!(
                    "Failed to decode event at line {} of session {}: {}",
                    line_no, id, e
                ))
            })?;
            events.push(event);
        }

        debug!("Loaded {} events from session {}", events.len(), id);
        Ok(events)
    }
}
