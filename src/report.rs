//! Plain-text report rendering
//!
//! The reporter owns all presentation: the core hands it a
//! [`ScanOutcome`] and never prints anything itself. Rendering is a pure
//! function returning a `String`, so callers decide whether that goes to
//! stdout, a log, or a mail body.
//!
//! Every user-facing message comes from a [`MessageCatalog`] so reports
//! can be localized or re-worded from configuration without touching
//! code. Finding templates use `{path}` and `{time}` placeholders.

use crate::types::{Finding, FindingKind, ScanOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report message templates, overridable for localization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// Template for an added file; `{path}` and `{time}` placeholders
    pub added: String,
    /// Template for a deleted file; `{path}` placeholder
    pub deleted: String,
    /// Template for a modified file; `{path}` and `{time}` placeholders
    pub modified: String,
    /// Shown when the snapshots are identical
    pub diff_not_found: String,
    /// Header above the finding lines
    pub diff_found: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        MessageCatalog {
            added: "New file added: {path} {{time}}".to_string(),
            deleted: "Deleted file: {path}".to_string(),
            modified: "Modified file: {path} {{time}}".to_string(),
            diff_not_found: "Nothing to report.".to_string(),
            diff_found: "Differences found:".to_string(),
        }
    }
}

impl MessageCatalog {
    /// Render one finding line from its template
    pub fn format_finding(&self, finding: &Finding) -> String {
        let template = match finding.kind {
            FindingKind::Added => &self.added,
            FindingKind::Deleted => &self.deleted,
            FindingKind::Modified => &self.modified,
        };
        let time = finding
            .modified_at
            .map(format_epoch)
            .unwrap_or_default();
        template
            .replace("{path}", &finding.path)
            .replace("{time}", &time)
    }
}

/// Render the full plain-text report for one run
pub fn render(outcome: &ScanOutcome, messages: &MessageCatalog) -> String {
    let rule = "-".repeat(65);

    let body = if outcome.findings.is_empty() {
        messages.diff_not_found.clone()
    } else {
        let mut lines = vec![messages.diff_found.clone(), String::new()];
        lines.extend(outcome.findings.iter().map(|f| messages.format_finding(f)));
        lines.join("\n")
    };

    let previous = match outcome.previous_scan {
        Some(timestamp) => format!(
            "{} ({})",
            format_datetime(timestamp),
            format_age(timestamp, outcome.scanned_at)
        ),
        None => "unknown (no previous scan)".to_string(),
    };

    format!(
        "vigil ver. {version}\n{rule}\n\n{body}\n\n{rule}\nFound {count} files\nTimestamp: {now}\nLast scanning occurred on {previous}\n",
        version = env!("CARGO_PKG_VERSION"),
        rule = rule,
        body = body,
        count = outcome.file_count,
        now = format_datetime(outcome.scanned_at),
        previous = previous,
    )
}

/// Format an epoch-seconds timestamp for display
fn format_epoch(seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(seconds, 0) {
        Some(timestamp) => format_datetime(timestamp),
        None => seconds.to_string(),
    }
}

fn format_datetime(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Humanize the age of the previous scan
///
/// Coarse units on purpose: minutes under two hours, hours under two
/// days, days beyond that.
fn format_age(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let delta = (later - earlier).num_seconds().max(0);
    if delta < 2 * 3600 {
        format!("{} minutes ago", (delta + 30) / 60)
    } else if delta < 2 * 86_400 {
        format!("{} hours ago", (delta + 1800) / 3600)
    } else {
        format!("{} days ago", (delta + 43_200) / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outcome(findings: Vec<Finding>, previous: Option<DateTime<Utc>>) -> ScanOutcome {
        ScanOutcome {
            file_count: 3,
            findings,
            scanned_at: Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap(),
            previous_scan: previous,
        }
    }

    #[test]
    fn test_finding_lines_use_templates() {
        let messages = MessageCatalog::default();

        let added = Finding::added("/a/y.php", 1_600_000_000);
        assert_eq!(
            messages.format_finding(&added),
            "New file added: /a/y.php {2020-09-13 12:26:40}"
        );

        let deleted = Finding::deleted("/a/x.php");
        assert_eq!(messages.format_finding(&deleted), "Deleted file: /a/x.php");
    }

    #[test]
    fn test_empty_report_says_nothing_to_report() {
        let report = render(&outcome(vec![], None), &MessageCatalog::default());
        assert!(report.contains("Nothing to report."));
        assert!(report.contains("Found 3 files"));
        assert!(report.contains("unknown (no previous scan)"));
    }

    #[test]
    fn test_report_lists_findings_under_header() {
        let findings = vec![
            Finding::deleted("/a/x.php"),
            Finding::added("/a/y.php", 1_600_000_000),
        ];
        let previous = Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap();
        let report = render(&outcome(findings, Some(previous)), &MessageCatalog::default());

        assert!(report.contains("Differences found:"));
        assert!(report.contains("Deleted file: /a/x.php"));
        assert!(report.contains("New file added: /a/y.php"));
        assert!(report.contains("(3 hours ago)"));
    }

    #[test]
    fn test_age_units() {
        let base = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        assert_eq!(
            format_age(base - chrono::Duration::minutes(45), base),
            "45 minutes ago"
        );
        assert_eq!(
            format_age(base - chrono::Duration::hours(5), base),
            "5 hours ago"
        );
        assert_eq!(
            format_age(base - chrono::Duration::days(3), base),
            "3 days ago"
        );
    }

    #[test]
    fn test_custom_catalog() {
        let messages = MessageCatalog {
            deleted: "GELOESCHT: {path}".to_string(),
            ..MessageCatalog::default()
        };
        let line = messages.format_finding(&Finding::deleted("/a/x.php"));
        assert_eq!(line, "GELOESCHT: /a/x.php");
    }
}
