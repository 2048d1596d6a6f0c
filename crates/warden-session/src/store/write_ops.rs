//! Appends and sequence recovery

use serde_json::Value;
use std::io::SeekFrom;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

use warden_core::error::{WardenError, WardenResult};
use warden_core::events::Event;

use super::core::SessionEventStore;
use crate::session::now_seconds;

/// Bytes read from the end of the log per recovery attempt
const TAIL_WINDOW: u64 = 64 * 1024;

impl SessionEventStore {
    /// Persist `event` and return it stamped with `seq` and `ts`.
    ///
    /// Delta events come back untouched and are not written.
    pub async fn append_event(&self, id: &str, event: Event) -> WardenResult<Event> {
        if event.is_delta() {
            return Ok(event);
        }

        let dir = self.ensure_session_dir(id).await?;
        let path = dir.join(super::core::EVENTS_FILE);

        // Held until the line is on disk so file order matches seq order
        let cursor = self.cursor(id);
        let mut next = cursor.lock().await;
        let seq = match *next {
            Some(seq) => seq,
            None => self.infer_next_seq(id).await?,
        };

        let event = event.stamped(seq, now_seconds());
        let json = event
            .to_json_line()
            .map_err(|e| WardenError::json(format!("Failed to serialize event: {}", e)))?;
        let mut json_line = String::with_capacity(json.len() + 1);
        json_line.push_str(&json);
        json_line.push('\n');

        let io_error = |action: &str, e: std::io::Error| {
            WardenError::io_with_path(
                format!("Failed to {} event log: {}", action, e),
                path.display().to_string(),
            )
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error("open", e))?;
        file.write_all(json_line.as_bytes())
            .await
            .map_err(|e| io_error("write", e))?;
        file.flush().await.map_err(|e| io_error("flush", e))?;

        *next = Some(seq + 1);
        debug!(
            "Appended {} event seq={} to session {}",
            event.event_type(),
            seq,
            id
        );
        Ok(event)
    }

    /// Next sequence number according to the log on disk.
    ///
    /// Scans the tail of the log backwards, past blank, malformed (including
    /// torn UTF-8) and `seq`-less lines, and returns one past the last
    /// readable `seq`, or 1 for an empty or missing log. The window doubles
    /// until a `seq` is found or the whole file has been scanned.
    pub async fn infer_next_seq(&self, id: &str) -> WardenResult<u64> {
        let path = self.events_path(id)?;
        let io_error = |action: &str, e: std::io::Error| {
            WardenError::io_with_path(
                format!("Failed to {} event log: {}", action, e),
                path.display().to_string(),
            )
        };

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
            Err(e) => return Err(io_error("open", e)),
        };
        let len = file.metadata().await.map_err(|e| io_error("stat", e))?.len();

        let mut window = TAIL_WINDOW;
        loop {
            let start = len.saturating_sub(window);
            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|e| io_error("seek", e))?;
            let mut tail = Vec::with_capacity((len - start) as usize);
            file.read_to_end(&mut tail)
                .await
                .map_err(|e| io_error("read", e))?;

            let mut lines: Vec<&[u8]> = tail.split(|b| *b == b'\n').collect();
            if start > 0 {
                // First line of a partial window may be cut
                lines.remove(0);
            }
            if let Some(seq) = last_seq(&lines, id) {
                debug!("Recovered seq {} for session {}", seq, id);
                return Ok(seq + 1);
            }
            if start == 0 {
                if len > 0 {
                    warn!("No readable seq in session {} log; restarting at 1", id);
                }
                return Ok(1);
            }
            window = window.saturating_mul(2);
        }
    }
}

/// Last `seq` among `lines`, scanning from the end
fn last_seq(lines: &[&[u8]], id: &str) -> Option<u64> {
    let mut skipped = 0usize;
    for line in lines.iter().rev() {
        if line.trim_ascii().is_empty() {
            continue;
        }
        let seq = serde_json::from_slice::<Value>(line)
            .ok()
            .and_then(|value| value.get("seq").and_then(Value::as_u64));
        match seq {
            Some(seq) => {
                if skipped > 0 {
                    warn!(
                        "Skipped {} unreadable trailing line(s) in session {} log",
                        skipped, id
                    );
                }
                return Some(seq);
            }
            None => skipped += 1,
        }
    }
    None
}
