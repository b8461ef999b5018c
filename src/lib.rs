//! # Vigil - file-integrity monitoring through snapshot comparison
//!
//! Vigil walks a set of directory trees, computes a content fingerprint
//! and modification time for every matching file, and compares that
//! snapshot against the snapshot persisted by the previous run. Every
//! difference is classified as Added, Deleted, or Modified and rendered
//! into a plain-text report.
//!
//! ## Overview
//!
//! One run executes a fixed pipeline:
//!
//! 1. **Walk** the configured roots, applying extension and ignore-path
//!    filters, fingerprinting each included file ([`walker`], [`hasher`])
//! 2. **Load** the previously persisted snapshot and its timestamp
//!    ([`store`])
//! 3. **Compare** the two snapshots into an ordered list of findings
//!    ([`differ`])
//! 4. **Persist** the current snapshot as the new baseline ([`store`])
//! 5. Hand the findings plus run metadata to the reporter ([`report`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vigil::VigilBuilder;
//!
//! # fn main() -> vigil::Result<()> {
//! let vigil = VigilBuilder::new()
//!     .root("/var/www/public_html")
//!     .extensions(vec!["php".into(), "js".into(), "htm".into(), "html".into()])
//!     .ignore_dir("/var/www/public_html/cache")
//!     .storage_location("/var/lib/vigil/vigil.dat")
//!     .build()?;
//!
//! let outcome = vigil.run()?;
//! if outcome.has_findings() {
//!     println!("{}", vigil.render_report(&outcome));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! - **Snapshot**: the set of tracked files with fingerprint and mtime at
//!   one point in time. Only the immediately prior snapshot is kept; the
//!   storage location is fully overwritten every run.
//! - **Fingerprint**: an MD5 hex digest used purely for change detection.
//!   Files below the configured size threshold are hashed whole; larger
//!   files use a chunked two-level digest (or, opt-in, the system digest
//!   utility). See [`hasher`] for the trade-offs.
//! - **Finding**: one reported difference. A record is compared as a
//!   whole, so an mtime-only change is reported as Modified too.
//!
//! ## Operational notes
//!
//! - A missing or corrupted baseline is treated as a first run: every
//!   current file is reported as Added rather than failing.
//! - Unreadable files and directories are skipped with warnings; the
//!   only fatal condition in a healthy environment is failing to persist
//!   the new baseline.
//! - Runs are single-threaded; never schedule two runs against the same
//!   storage location concurrently.

pub mod config;
pub mod differ;
pub mod error;
pub mod hasher;
pub mod monitor;
pub mod report;
pub mod store;
pub mod types;
pub mod walker;

// Re-export main types for convenience
pub use config::ScanConfig;
pub use error::{Result, VigilError};
pub use hasher::{Capabilities, Hasher};
pub use monitor::{Vigil, VigilBuilder};
pub use report::MessageCatalog;
pub use store::SnapshotStore;
pub use types::{FileRecord, Finding, FindingKind, ScanOutcome, Snapshot};
pub use walker::TreeWalker;
