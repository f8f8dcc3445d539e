//! JSON export of dashboards and raw snapshots.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Path that means "write to standard output".
pub const STDOUT_PATH: &str = "-";

/// Write `value` as pretty JSON to `path`, or to stdout if `path` is `-`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if path == Path::new(STDOUT_PATH) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        return Ok(());
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schemas;
    use crate::data::Dashboard;
    use crate::source::Snapshot;
    use chrono::Utc;

    #[test]
    fn test_write_snapshot_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snapshot = Snapshot::empty(Utc::now());

        write_json(&snapshot, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Snapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_write_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let dashboard = Dashboard::from_snapshot(&Snapshot::empty(Utc::now()), &Schemas::default());

        write_json(&dashboard, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["overall"]["label"], "Partially incomplete");
        assert_eq!(json["metrics"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let snapshot = Snapshot::empty(Utc::now());
        let err = write_json(&snapshot, Path::new("/nonexistent/dir/out.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to create"));
    }
}
