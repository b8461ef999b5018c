//! Persistent snapshot storage
//!
//! Exactly one persisted snapshot exists per storage location, fully
//! overwritten on every run. The serialized form is line-oriented text,
//! one record per line:
//!
//! ```text
//! fingerprint,modified_at,full_path
//! ```
//!
//! The path is the last field and may itself contain commas, so parsing
//! splits each line on the first two commas only. The whole text is
//! compressed with raw DEFLATE before being written; no header, no
//! version field. The "when was the previous scan performed" timestamp is
//! the storage file's own mtime, not part of the payload.
//!
//! Failure policy is asymmetric by design: a location that is missing or
//! cannot be decompressed/parsed is treated as "no prior snapshot" (every
//! current file will then be reported as added — the conservative
//! behavior for a lost baseline), while a failed *write* is fatal to the
//! run, since silently continuing would falsify every future comparison.

use crate::error::{Result, VigilError};
use crate::types::{FileRecord, Snapshot};
use chrono::{DateTime, Utc};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads and saves the persisted snapshot at one storage location
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    location: PathBuf,
}

impl SnapshotStore {
    /// Create a store for the given location
    pub fn new(location: impl Into<PathBuf>) -> Self {
        SnapshotStore {
            location: location.into(),
        }
    }

    /// The storage location this store reads and overwrites
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Load the previously persisted snapshot and its timestamp
    ///
    /// Returns an empty snapshot and `None` when the location does not
    /// exist (no prior run) or when its content cannot be decompressed or
    /// parsed (corrupted baseline, discarded with a warning). Lines that
    /// do not yield exactly three comma-separated parts are dropped.
    pub fn load(&self) -> Result<(Snapshot, Option<DateTime<Utc>>)> {
        if !self.location.is_file() {
            debug!(location = %self.location.display(), "no prior snapshot");
            return Ok((Snapshot::new(), None));
        }

        let text = match fs::read(&self.location)
            .map_err(|err| VigilError::storage(err.to_string()))
            .and_then(|compressed| inflate(&compressed))
        {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    location = %self.location.display(),
                    error = %err,
                    "discarding unreadable snapshot, treating as first run"
                );
                return Ok((Snapshot::new(), None));
            }
        };

        let mut snapshot = Snapshot::new();
        for line in text.lines() {
            let mut parts = line.trim().splitn(3, ',');
            let (fingerprint, modified_at, path) =
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(fingerprint), Some(modified_at), Some(path)) => {
                        (fingerprint, modified_at, path)
                    }
                    _ => continue,
                };
            snapshot.insert(
                path.to_string(),
                FileRecord {
                    fingerprint: fingerprint.to_string(),
                    modified_at: modified_at.parse().unwrap_or(0),
                },
            );
        }

        let timestamp = fs::metadata(&self.location)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        debug!(
            location = %self.location.display(),
            files = snapshot.len(),
            "loaded prior snapshot"
        );
        Ok((snapshot, timestamp))
    }

    /// Persist the snapshot, fully overwriting the location
    ///
    /// The compressed payload is written to a temporary file and renamed
    /// into place so a crash mid-write never leaves a truncated baseline.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::StorageWriteFailed`] when the location
    /// cannot be written; callers must treat this as fatal for the run.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut lines: Vec<String> = snapshot
            .iter()
            .map(|(path, record)| {
                format!("{},{},{}", record.fingerprint, record.modified_at, path)
            })
            .collect();
        // Deterministic output keeps re-saves of identical snapshots
        // byte-identical.
        lines.sort_unstable();
        let payload = deflate(lines.join("\n").as_bytes())?;

        let temp_path = self.location.with_extension("tmp");
        fs::write(&temp_path, &payload).map_err(|err| VigilError::StorageWriteFailed {
            path: self.location.clone(),
            reason: err.to_string(),
        })?;
        fs::rename(&temp_path, &self.location).map_err(|err| VigilError::StorageWriteFailed {
            path: self.location.clone(),
            reason: err.to_string(),
        })?;

        debug!(
            location = %self.location.display(),
            files = snapshot.len(),
            bytes = payload.len(),
            "persisted snapshot"
        );
        Ok(())
    }
}

/// Compress text with raw DEFLATE
fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|err| VigilError::compression(err.to_string()))?;
    encoder
        .finish()
        .map_err(|err| VigilError::compression(err.to_string()))
}

/// Decompress raw DEFLATE back into text
fn inflate(data: &[u8]) -> Result<String> {
    let mut decoder = DeflateDecoder::new(data);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|err| VigilError::decompression(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| VigilError::decompression(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "/srv/site/index.php".to_string(),
            FileRecord {
                fingerprint: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
                modified_at: 1_600_000_000,
            },
        );
        snapshot.insert(
            "/srv/site/assets/app.js".to_string(),
            FileRecord {
                fingerprint: "0cc175b9c0f1b6a831c399e269772661".to_string(),
                modified_at: 1_600_000_100,
            },
        );
        snapshot
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("vigil.dat"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        let (loaded, timestamp) = store.load().unwrap();

        assert_eq!(loaded, snapshot);
        assert!(timestamp.is_some());
    }

    #[test]
    fn test_path_with_commas_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("vigil.dat"));

        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "/srv/site/report,final,v2.php".to_string(),
            FileRecord {
                fingerprint: "abc".to_string(),
                modified_at: 42,
            },
        );
        store.save(&snapshot).unwrap();

        let (loaded, _) = store.load().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_location_is_first_run() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("never-written.dat"));

        let (snapshot, timestamp) = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(timestamp.is_none());
    }

    #[test]
    fn test_corrupted_location_is_treated_as_first_run() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("vigil.dat");
        fs::write(&location, b"this is not deflate data").unwrap();

        let store = SnapshotStore::new(&location);
        let (snapshot, timestamp) = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(timestamp.is_none());
    }

    #[test]
    fn test_save_overwrites_fully() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("vigil.dat"));

        store.save(&sample_snapshot()).unwrap();

        let mut replacement = Snapshot::new();
        replacement.insert(
            "/srv/site/only.php".to_string(),
            FileRecord {
                fingerprint: "def".to_string(),
                modified_at: 7,
            },
        );
        store.save(&replacement).unwrap();

        let (loaded, _) = store.load().unwrap();
        assert_eq!(loaded, replacement);
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_empty_snapshot_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("vigil.dat"));

        store.save(&Snapshot::new()).unwrap();
        let (loaded, timestamp) = store.load().unwrap();
        assert!(loaded.is_empty());
        assert!(timestamp.is_some());
    }

    #[test]
    fn test_save_to_unwritable_location_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("missing-dir/vigil.dat"));

        let err = store.save(&sample_snapshot()).unwrap_err();
        assert!(err.invalidates_baseline());
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("vigil.dat");

        let text = "abc,100,/srv/a.php\nnot-a-record\nonly,two";
        fs::write(&location, deflate(text.as_bytes()).unwrap()).unwrap();

        let store = SnapshotStore::new(&location);
        let (snapshot, _) = store.load().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("/srv/a.php"));
    }
}
