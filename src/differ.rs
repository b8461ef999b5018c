//! Three-way snapshot comparison
//!
//! Classifies every path in either snapshot as deleted, added, or
//! modified. Output order is fixed for report readability: all deletions
//! first, then additions, then modifications, with paths sorted
//! lexicographically within each phase so two runs over the same pair of
//! snapshots produce identical output.
//!
//! Modification compares the whole [`FileRecord`] — fingerprint *and*
//! mtime. An mtime-only change with unchanged content is still reported:
//! over-reporting is preferred to missing a real content change hidden
//! behind legitimate mtime noise.

use crate::types::{FileRecord, Finding, Snapshot};
use tracing::debug;

/// Compare the previous snapshot against the current one
///
/// Produces exactly one [`Finding`] per path whose record is not
/// identical across both snapshots, and none for identical paths.
pub fn compare(previous: &Snapshot, current: &Snapshot) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut deleted: Vec<&String> = previous
        .paths()
        .filter(|path| !current.contains(path))
        .collect();
    deleted.sort_unstable();
    for path in deleted {
        findings.push(Finding::deleted(path.clone()));
    }

    let mut added: Vec<(&String, &FileRecord)> = current
        .iter()
        .filter(|(path, _)| !previous.contains(path))
        .collect();
    added.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for (path, record) in added {
        findings.push(Finding::added(path.clone(), record.modified_at));
    }

    let mut modified: Vec<(&String, &FileRecord)> = current
        .iter()
        .filter(|(path, record)| {
            previous
                .get(path)
                .is_some_and(|previous_record| previous_record != *record)
        })
        .collect();
    modified.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for (path, record) in modified {
        findings.push(Finding::modified(path.clone(), record.modified_at));
    }

    debug!(findings = findings.len(), "comparison complete");
    findings
}
