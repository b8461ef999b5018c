//! Scan orchestration
//!
//! [`Vigil`] is the main entry point: it owns the run configuration and
//! the components built from it, and executes the pipeline strictly in
//! order — walk the trees, load the prior snapshot, compare, persist the
//! current snapshot, hand back a [`ScanOutcome`].
//!
//! One run is single-threaded and synchronous; there is no cancellation.
//! Concurrent runs against the same storage location are unsafe: load and
//! save form an unsynchronized read-modify-write, so overlapping
//! invocations can stale-overwrite each other's baseline. Schedule one
//! invocation at a time (one cron entry, no overlap).
//!
//! ## Example
//!
//! ```rust,no_run
//! use vigil::VigilBuilder;
//!
//! # fn main() -> vigil::Result<()> {
//! let vigil = VigilBuilder::new()
//!     .root("/var/www/public_html")
//!     .extensions(vec!["php".into(), "js".into()])
//!     .storage_location("/var/lib/vigil/vigil.dat")
//!     .build()?;
//!
//! let outcome = vigil.run()?;
//! println!("{}", vigil.render_report(&outcome));
//! # Ok(())
//! # }
//! ```

use crate::config::ScanConfig;
use crate::differ;
use crate::error::Result;
use crate::hasher::{Capabilities, Hasher};
use crate::report::{self, MessageCatalog};
use crate::store::SnapshotStore;
use crate::types::ScanOutcome;
use crate::walker::TreeWalker;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

/// File-integrity monitor for a fixed configuration
#[derive(Debug)]
pub struct Vigil {
    config: ScanConfig,
    hasher: Hasher,
    walker: TreeWalker,
    store: SnapshotStore,
}

impl Vigil {
    /// Create a monitor, probing environment capabilities once
    pub fn new(config: ScanConfig) -> Result<Self> {
        let capabilities = Capabilities::detect(config.external_hasher);
        Self::with_capabilities(config, capabilities)
    }

    /// Create a monitor with pre-determined capabilities
    ///
    /// Used when the caller has already probed the environment (or wants
    /// to pin the hashing strategy in tests).
    pub fn with_capabilities(config: ScanConfig, capabilities: Capabilities) -> Result<Self> {
        config.validate()?;
        let hasher = Hasher::new(config.hash_threshold, capabilities);
        let walker = TreeWalker::new(&config);
        let store = SnapshotStore::new(config.storage_location.clone());
        Ok(Vigil {
            config,
            hasher,
            walker,
            store,
        })
    }

    /// The configuration this monitor runs with
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Execute one scan run
    ///
    /// Walk → load previous → compare → persist current, strictly in
    /// order. The current snapshot is persisted even when nothing
    /// changed, refreshing the "previous scan" timestamp.
    ///
    /// # Errors
    ///
    /// The only fatal condition in a healthy environment is a failed
    /// snapshot write ([`crate::VigilError::StorageWriteFailed`]);
    /// unreadable files and directories are skipped with warnings.
    pub fn run(&self) -> Result<ScanOutcome> {
        info!(roots = ?self.config.roots, "starting scan");
        let current = self.walker.walk(&self.hasher)?;
        info!(files = current.len(), "walk finished");

        let (previous, previous_scan) = self.store.load()?;
        let findings = differ::compare(&previous, &current);
        self.store.save(&current)?;

        info!(findings = findings.len(), "scan finished");
        Ok(ScanOutcome {
            file_count: current.len(),
            findings,
            scanned_at: Utc::now(),
            previous_scan,
        })
    }

    /// Render the plain-text report for an outcome of this monitor
    pub fn render_report(&self, outcome: &ScanOutcome) -> String {
        report::render(outcome, &self.config.messages)
    }
}

/// Fluent builder for [`Vigil`] instances
///
/// ```rust
/// use vigil::VigilBuilder;
///
/// let builder = VigilBuilder::new()
///     .root("/srv/site")
///     .ignore_dir("/srv/site/cache")
///     .hash_threshold(4_000_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VigilBuilder {
    roots: Vec<String>,
    extensions: Option<Vec<String>>,
    ignore_dirs: Vec<String>,
    hash_threshold: Option<u64>,
    storage_location: Option<PathBuf>,
    external_hasher: bool,
    messages: Option<MessageCatalog>,
}

impl VigilBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one root path to scan
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Replace the extension allow-list (empty means all files)
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Add one directory to skip entirely (exact absolute path)
    pub fn ignore_dir(mut self, dir: impl Into<String>) -> Self {
        self.ignore_dirs.push(dir.into());
        self
    }

    /// Set the size threshold for the large-file hashing strategies
    pub fn hash_threshold(mut self, threshold: u64) -> Self {
        self.hash_threshold = Some(threshold);
        self
    }

    /// Set where the snapshot is persisted
    pub fn storage_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    /// Allow invoking the system digest utility for large files
    pub fn external_hasher(mut self, allow: bool) -> Self {
        self.external_hasher = allow;
        self
    }

    /// Override the report message catalog
    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Assemble the configuration and construct the monitor
    pub fn build(self) -> Result<Vigil> {
        let defaults = ScanConfig::default();
        let config = ScanConfig {
            roots: self.roots,
            extensions: self.extensions.unwrap_or(defaults.extensions),
            ignore_dirs: self.ignore_dirs,
            hash_threshold: self.hash_threshold.unwrap_or(defaults.hash_threshold),
            storage_location: self.storage_location.unwrap_or(defaults.storage_location),
            external_hasher: self.external_hasher,
            messages: self.messages.unwrap_or_default(),
        };
        Vigil::new(config)
    }
}
