//! Snapshot persistence.
//!
//! The persisted file is an opaque sink: loading falls back to bootstrap
//! defaults on any failure, and saving is best-effort and never surfaces
//! an error to the caller. A failed save leaves the in-memory snapshot
//! authoritative for the rest of the operation.

use std::path::PathBuf;

use crate::config::Config;
use crate::snapshot::Snapshot;

const SNAPSHOT_FILE: &str = "snapshot.json";

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store at the default location next to the config file.
    pub fn open() -> Self {
        let path = Config::config_path()
            .map(|p| p.with_file_name(SNAPSHOT_FILE))
            .unwrap_or_else(|_| PathBuf::from(SNAPSHOT_FILE));
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the persisted snapshot, or bootstrap defaults when there is
    /// none or it cannot be read.
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            return Snapshot::bootstrap();
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Snapshot::bootstrap(),
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(_) => Snapshot::bootstrap(),
        }
    }

    /// Persist the snapshot, ignoring failures.
    pub fn save(&self, snapshot: &Snapshot) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let contents = match serde_json::to_string_pretty(snapshot) {
            Ok(c) => c,
            Err(_) => return,
        };

        let _ = std::fs::write(&self.path, contents);
    }
}
