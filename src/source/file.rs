//! Replay of recorded snapshots.
//!
//! `solwatch --record` writes a [`Snapshot`] as JSON; [`FileSource`] plays it
//! back. Judgments are derived again on replay, so a recording made before a
//! threshold or schema change shows the current interpretation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{DataSource, Snapshot};

/// A data source that replays a recorded snapshot file.
///
/// The file is re-read whenever its modification time moves forward, so a
/// `--record` loop in another process can keep overwriting it.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    recorded_at: Option<DateTime<Utc>>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            description: describe(&path, None),
            path,
            last_error: None,
            last_modified: None,
            recorded_at: None,
        }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the replayed snapshot was collected, once one has been read.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }

    /// True when the file is new or has been rewritten since the last read.
    fn changed_since_last_read(&self, modified: Option<SystemTime>) -> bool {
        match (self.last_modified, modified) {
            (None, _) => true,
            // Vanished after a good read: keep showing what we have
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        }
    }

    fn load(&self) -> Result<Snapshot, String> {
        let bytes = fs::read(&self.path).map_err(|e| format!("Read error: {}", e))?;
        let mut snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| format!("Parse error: {}", e))?;
        // A recording has no upcoming fetch
        snapshot.next_refresh = None;
        Ok(snapshot)
    }
}

fn describe(path: &Path, recorded_at: Option<DateTime<Utc>>) -> String {
    match recorded_at {
        Some(at) => format!(
            "recording: {} ({})",
            path.display(),
            at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("recording: {}", path.display()),
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Snapshot> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if !self.changed_since_last_read(modified) {
            return None;
        }

        match self.load() {
            Ok(snapshot) => {
                debug!(path = %self.path.display(), collected_at = %snapshot.collected_at, "replaying snapshot");
                self.last_error = None;
                self.last_modified = modified;
                self.recorded_at = Some(snapshot.collected_at);
                self.description = describe(&self.path, self.recorded_at);
                Some(snapshot)
            }
            Err(e) => {
                self.last_error = Some(e);
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
