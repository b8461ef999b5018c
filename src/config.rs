//! Scan configuration
//!
//! Everything a run needs is gathered into one immutable [`ScanConfig`]
//! constructed at startup and passed by reference into the components.
//! The struct deserializes from JSON with per-field defaults, so a config
//! file only has to mention the fields it overrides:
//!
//! ```json
//! {
//!   "roots": ["/var/www/public_html"],
//!   "extensions": ["php", "js"],
//!   "storage_location": "/var/lib/vigil/vigil.dat"
//! }
//! ```
//!
//! Defaults mirror the conventional web-tree deployment: scan `.php`,
//! `.js`, `.htm`, `.html` files, hash threshold of 2,000,000 bytes,
//! external hashing disabled.

use crate::error::{Result, VigilError};
use crate::report::MessageCatalog;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default hash-strategy switch point, in bytes
pub const DEFAULT_HASH_THRESHOLD: u64 = 2_000_000;

/// Immutable configuration for one scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Ordered list of root paths to scan
    pub roots: Vec<String>,
    /// Extension allow-list, matched case-insensitively against the last
    /// dot-separated suffix; empty means "include all files"
    pub extensions: Vec<String>,
    /// Absolute directory paths to skip entirely (exact match, not prefix)
    pub ignore_dirs: Vec<String>,
    /// Files at or above this size use a large-file hashing strategy
    pub hash_threshold: u64,
    /// Where the previous snapshot is persisted
    pub storage_location: PathBuf,
    /// Allow invoking the system digest utility for large files
    ///
    /// Off by default: the external tool produces whole-file digests while
    /// the chunked fallback does not, so large-file fingerprints would
    /// change between environments where tool availability differs.
    pub external_hasher: bool,
    /// Report message templates, overridable for localization
    pub messages: MessageCatalog,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            roots: Vec::new(),
            extensions: vec![
                "php".to_string(),
                "js".to_string(),
                "htm".to_string(),
                "html".to_string(),
            ],
            ignore_dirs: Vec::new(),
            hash_threshold: DEFAULT_HASH_THRESHOLD,
            storage_location: PathBuf::from("vigil.dat"),
            external_hasher: false,
            messages: MessageCatalog::default(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file, filling unset fields with
    /// defaults
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ScanConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable for a run
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfiguration`] when no roots are
    /// configured or the storage location is empty.
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(VigilError::InvalidConfiguration(
                "at least one root path must be configured".to_string(),
            ));
        }
        if self.storage_location.as_os_str().is_empty() {
            return Err(VigilError::InvalidConfiguration(
                "storage location must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Extension allow-list lowered once for case-insensitive matching
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions.iter().map(|e| e.to_lowercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = ScanConfig::default();
        assert_eq!(config.hash_threshold, 2_000_000);
        assert_eq!(config.extensions, vec!["php", "js", "htm", "html"]);
        assert!(!config.external_hasher);
    }

    #[test]
    fn test_validate_requires_roots() {
        let config = ScanConfig::default();
        assert!(matches!(
            config.validate(),
            Err(VigilError::InvalidConfiguration(_))
        ));

        let mut config = ScanConfig::default();
        config.roots.push("/srv/site".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"roots": ["/srv/site"], "extensions": []}"#).unwrap();
        assert_eq!(config.roots, vec!["/srv/site"]);
        assert!(config.extensions.is_empty());
        assert_eq!(config.hash_threshold, DEFAULT_HASH_THRESHOLD);
    }

    #[test]
    fn test_extension_normalization() {
        let mut config = ScanConfig::default();
        config.extensions = vec!["PHP".to_string(), "Js".to_string()];
        assert_eq!(config.normalized_extensions(), vec!["php", "js"]);
    }
}
