//! Directory traversal producing a snapshot
//!
//! The walker visits every entry under the configured roots in the
//! filesystem's native listing order, applies the ignore-path and
//! extension filters, and records `(fingerprint, mtime)` for each
//! included file keyed by its normalized absolute path.
//!
//! Filtering rules:
//!
//! - A directory whose normalized path exactly matches an ignore-list
//!   entry is pruned and never descended into.
//! - With a non-empty extension allow-list only files whose last
//!   dot-separated suffix (case-insensitive) is listed are included;
//!   extensionless files are excluded. An empty list includes everything.
//! - Entries that are neither regular files nor directories (broken
//!   symlinks, sockets, entries removed mid-scan) are skipped silently.
//!
//! All read failures are recoverable: an unlistable directory skips that
//! subtree, a file that cannot be read during hashing is skipped, each
//! with a warning. The snapshot simply will not contain what could not
//! be read, and the next readable run reconciles the difference.

use crate::config::ScanConfig;
use crate::error::Result;
use crate::hasher::Hasher;
use crate::types::{FileRecord, Snapshot};
use std::collections::HashSet;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursive tree walker with filtering
#[derive(Debug, Clone)]
pub struct TreeWalker {
    roots: Vec<String>,
    extensions: Vec<String>,
    ignore_dirs: HashSet<String>,
}

impl TreeWalker {
    /// Build a walker from the run configuration
    ///
    /// Filter inputs are normalized once here: extensions lowercased,
    /// ignore paths slash-normalized with trailing slashes trimmed.
    pub fn new(config: &ScanConfig) -> Self {
        TreeWalker {
            roots: config.roots.iter().map(|r| normalize_path(r)).collect(),
            extensions: config.normalized_extensions(),
            ignore_dirs: config
                .ignore_dirs
                .iter()
                .map(|d| normalize_path(d))
                .collect(),
        }
    }

    /// Walk all roots and produce the current snapshot
    pub fn walk(&self, hasher: &Hasher) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        for root in &self.roots {
            self.walk_root(root, hasher, &mut snapshot);
        }
        debug!(files = snapshot.len(), "walk complete");
        Ok(snapshot)
    }

    fn walk_root(&self, root: &str, hasher: &Hasher, snapshot: &mut Snapshot) {
        let ignore_dirs = &self.ignore_dirs;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() {
                    return true;
                }
                let normalized = normalize_path(&entry.path().to_string_lossy());
                !ignore_dirs.contains(&normalized)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root, error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.extension_allowed(entry.path()) {
                continue;
            }

            let path = normalize_path(&entry.path().to_string_lossy());
            let modified_at = match entry.metadata() {
                Ok(metadata) => mtime_seconds(&metadata),
                Err(err) => {
                    warn!(path, error = %err, "skipping file without readable metadata");
                    continue;
                }
            };
            let fingerprint = match hasher.fingerprint(entry.path()) {
                Ok(fingerprint) => fingerprint,
                Err(err) => {
                    warn!(path, error = %err, "skipping file that failed to hash");
                    continue;
                }
            };

            snapshot.insert(
                path,
                FileRecord {
                    fingerprint,
                    modified_at,
                },
            );
        }
    }

    /// Apply the extension allow-list to one file name
    fn extension_allowed(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        match name.rsplit_once('.') {
            Some((_, suffix)) => self.extensions.contains(&suffix.to_lowercase()),
            None => false,
        }
    }
}

/// Normalize a path string: backslashes to forward slashes, doubled
/// slashes collapsed
///
/// Keeps behavior consistent regardless of how root paths were supplied
/// (trailing separators, Windows-style separators, accidental `//`).
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

/// Modification time of a file as seconds since the Unix epoch
fn mtime_seconds(metadata: &std::fs::Metadata) -> i64 {
    match metadata.modified() {
        Ok(modified) => match modified.duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs() as i64,
            Err(err) => -(err.duration().as_secs() as i64),
        },
        // Platforms without mtime support; record a fixed sentinel so
        // comparison still keys off the fingerprint.
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Capabilities;
    use std::fs;
    use tempfile::TempDir;

    fn walker_for(root: &Path, extensions: &[&str], ignore: &[String]) -> TreeWalker {
        let config = ScanConfig {
            roots: vec![root.to_string_lossy().into_owned()],
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            ignore_dirs: ignore.to_vec(),
            ..ScanConfig::default()
        };
        TreeWalker::new(&config)
    }

    fn hasher() -> Hasher {
        Hasher::new(2_000_000, Capabilities::restricted())
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("C:\\www\\site"), "C:/www/site");
        assert_eq!(normalize_path("/var//www///site/"), "/var/www/site/");
        assert_eq!(normalize_path("/already/clean"), "/already/clean");
    }

    #[test]
    fn test_extension_filter() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "text").unwrap();
        fs::write(dir.path().join("a.PHP"), "<?php").unwrap();
        fs::write(dir.path().join("noext"), "bare").unwrap();
        fs::write(dir.path().join("b.js"), "js").unwrap();

        let walker = walker_for(dir.path(), &["php", "js"], &[]);
        let snapshot = walker.walk(&hasher()).unwrap();

        assert_eq!(snapshot.len(), 2);
        let paths: Vec<&String> = snapshot.paths().collect();
        assert!(paths.iter().any(|p| p.ends_with("a.PHP")));
        assert!(paths.iter().any(|p| p.ends_with("b.js")));
    }

    #[test]
    fn test_empty_allow_list_includes_all() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "text").unwrap();
        fs::write(dir.path().join("noext"), "bare").unwrap();

        let walker = walker_for(dir.path(), &[], &[]);
        let snapshot = walker.walk(&hasher()).unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_ignored_directory_is_pruned() {
        let dir = TempDir::new().unwrap();
        let kept = dir.path().join("kept");
        let skipped = dir.path().join("skipped");
        fs::create_dir_all(kept.join("nested")).unwrap();
        fs::create_dir_all(skipped.join("nested")).unwrap();
        fs::write(kept.join("nested/a.php"), "a").unwrap();
        fs::write(skipped.join("b.php"), "b").unwrap();
        fs::write(skipped.join("nested/c.php"), "c").unwrap();

        let ignore = vec![skipped.to_string_lossy().into_owned()];
        let walker = walker_for(dir.path(), &["php"], &ignore);
        let snapshot = walker.walk(&hasher()).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.paths().next().unwrap().ends_with("kept/nested/a.php"));
    }

    #[test]
    fn test_walk_is_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.php"), "alpha").unwrap();
        fs::write(dir.path().join("sub/b.php"), "beta").unwrap();

        let walker = walker_for(dir.path(), &["php"], &[]);
        let first = walker.walk(&hasher()).unwrap();
        let second = walker.walk(&hasher()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_missing_root_yields_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("never-created");
        let walker = walker_for(&gone, &[], &[]);
        let snapshot = walker.walk(&hasher()).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_recorded_mtime_matches_filesystem() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.php");
        fs::write(&file, "alpha").unwrap();
        filetime::set_file_mtime(&file, filetime::FileTime::from_unix_time(1_600_000_000, 0))
            .unwrap();

        let walker = walker_for(dir.path(), &["php"], &[]);
        let snapshot = walker.walk(&hasher()).unwrap();
        let record = snapshot.iter().next().unwrap().1;
        assert_eq!(record.modified_at, 1_600_000_000);
    }
}
