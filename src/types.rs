//! Core data types used throughout the vigil library
//!
//! This module contains the fundamental data structures shared across
//! components:
//!
//! - **File system state**: [`FileRecord`], [`Snapshot`] — one tracked file
//!   and the full set captured by one scan pass
//! - **Results**: [`Finding`], [`FindingKind`], [`ScanOutcome`] — the
//!   differences detected by a run plus its summary metadata
//!
//! A [`Snapshot`] is a mapping from normalized absolute path to
//! [`FileRecord`]; the path is the unique key and iteration order carries
//! no meaning. Findings are produced fresh on every run and are never
//! persisted — only the snapshot itself survives between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fingerprint and modification time of one tracked file
///
/// Two records are equal only when both fields match; the differ compares
/// the record as a whole, so an mtime-only change is still reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Hex digest of the file content (see the hasher for strategy details)
    pub fingerprint: String,
    /// Last-modification timestamp, seconds since the Unix epoch
    pub modified_at: i64,
}

/// The set of tracked files captured by one scan pass
///
/// Keyed by normalized absolute path (forward slashes, no doubled
/// slashes). The *current* snapshot is built in memory by the walker; the
/// *previous* snapshot is loaded read-only from the snapshot store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: HashMap<String, FileRecord>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for a path
    pub fn insert(&mut self, path: String, record: FileRecord) {
        self.entries.insert(path, record);
    }

    /// Look up the record for a path
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    /// Whether a path is tracked in this snapshot
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of tracked files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot tracks no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(path, record)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileRecord)> {
        self.entries.iter()
    }

    /// Iterate over tracked paths in arbitrary order
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl FromIterator<(String, FileRecord)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, FileRecord)>>(iter: T) -> Self {
        Snapshot {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Classification of one detected difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    /// Path present in the previous snapshot but missing now
    Deleted,
    /// Path present now but absent from the previous snapshot
    Added,
    /// Path present in both with a differing record
    Modified,
}

/// One reportable difference between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// What happened to the path
    pub kind: FindingKind,
    /// Normalized absolute path of the affected file
    pub path: String,
    /// Current modification time; `None` for deleted files
    pub modified_at: Option<i64>,
}

impl Finding {
    /// Finding for a path that disappeared since the previous scan
    pub fn deleted(path: impl Into<String>) -> Self {
        Finding {
            kind: FindingKind::Deleted,
            path: path.into(),
            modified_at: None,
        }
    }

    /// Finding for a path that appeared since the previous scan
    pub fn added(path: impl Into<String>, modified_at: i64) -> Self {
        Finding {
            kind: FindingKind::Added,
            path: path.into(),
            modified_at: Some(modified_at),
        }
    }

    /// Finding for a path whose record changed since the previous scan
    pub fn modified(path: impl Into<String>, modified_at: i64) -> Self {
        Finding {
            kind: FindingKind::Modified,
            path: path.into(),
            modified_at: Some(modified_at),
        }
    }
}

/// Everything one run hands to the reporter
///
/// The ordered findings plus the summary metadata the report footer needs:
/// how many files the current snapshot tracks, when this scan ran, and
/// when the previous one did (`None` on a first run or after a corrupted
/// baseline was discarded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Ordered findings: deleted, then added, then modified
    pub findings: Vec<Finding>,
    /// Number of files in the current snapshot
    pub file_count: usize,
    /// Wall-clock time of this scan
    pub scanned_at: DateTime<Utc>,
    /// Timestamp of the previous scan, if one is known
    pub previous_scan: Option<DateTime<Utc>>,
}

impl ScanOutcome {
    /// Whether the run detected any differences
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}
