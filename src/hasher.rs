//! Content fingerprinting for tracked files
//!
//! A fingerprint is an MD5 hex digest chosen for speed: this is a
//! change-detection fingerprint, not a security primitive. Three
//! strategies exist, selected by file size against the configured
//! threshold and by environment capability:
//!
//! 1. **Whole-file** (`size < threshold`): stream the file through one
//!    digest.
//! 2. **External tool** (`size >= threshold`, capability enabled): invoke
//!    the system `md5sum` utility and parse its output. Produces the same
//!    digest as strategy 1 while offloading the CPU work. Any failure
//!    falls through to strategy 3, never to an error.
//! 3. **Chunked fallback** (`size >= threshold` otherwise): hash the file
//!    in 1 MiB chunks, concatenate the raw chunk digests in read order,
//!    and hash the concatenation. Bounded memory for arbitrarily large
//!    files, but the result is *not* equal to the whole-file digest of
//!    the same content. The external tool is therefore opt-in: with it
//!    disabled, large files always take this strategy and fingerprints
//!    stay stable across environments.
//!
//! Capability detection happens once per run via [`Capabilities::detect`]
//! and is threaded into the [`Hasher`], never re-checked per file.

use crate::error::Result;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Chunk size for the large-file fallback strategy
const CHUNK_SIZE: usize = 1024 * 1024;

/// Buffer size for streamed whole-file hashing
const READ_BUFFER_SIZE: usize = 8192;

/// Environment capabilities probed once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the external digest utility may be invoked
    pub external_tool: bool,
}

impl Capabilities {
    /// Probe the environment once
    ///
    /// The external tool is usable only when the configuration allows it
    /// *and* a probe invocation of `md5sum` succeeds. Absence of the tool
    /// is not an error; it selects the chunked fallback.
    pub fn detect(allow_external: bool) -> Self {
        if !allow_external {
            return Capabilities {
                external_tool: false,
            };
        }
        let available = Command::new("md5sum")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if !available {
            debug!("external digest utility unavailable, using chunked fallback for large files");
        }
        Capabilities {
            external_tool: available,
        }
    }

    /// Capabilities with everything disabled
    pub fn restricted() -> Self {
        Capabilities {
            external_tool: false,
        }
    }
}

/// Computes content fingerprints, switching strategy on file size
#[derive(Debug, Clone)]
pub struct Hasher {
    threshold: u64,
    capabilities: Capabilities,
}

impl Hasher {
    /// Create a hasher with the given size threshold and capabilities
    pub fn new(threshold: u64, capabilities: Capabilities) -> Self {
        Hasher {
            threshold,
            capabilities,
        }
    }

    /// Compute the fingerprint of one file
    ///
    /// Deterministic for unchanged content under a fixed strategy
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VigilError::Io`] when the file cannot be opened
    /// or read; the walker treats that as a recoverable skip.
    pub fn fingerprint(&self, path: &Path) -> Result<String> {
        let size = std::fs::metadata(path)?.len();

        if size < self.threshold {
            trace!(path = %path.display(), size, "hashing whole file");
            return hash_whole_file(path);
        }

        if self.capabilities.external_tool {
            if let Some(digest) = hash_with_external_tool(path) {
                trace!(path = %path.display(), size, "hashed via external tool");
                return Ok(digest);
            }
            debug!(path = %path.display(), "external tool failed, falling back to chunked hash");
        }

        trace!(path = %path.display(), size, "hashing in chunks");
        hash_chunked(path)
    }
}

/// Stream a file through a single digest
fn hash_whole_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Invoke the system digest utility and parse its output
///
/// Returns `None` on any spawn, exit-status, or parse failure so the
/// caller can fall through to the chunked strategy.
fn hash_with_external_tool(path: &Path) -> Option<String> {
    let output = Command::new("md5sum").arg(path).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let digest = stdout.lines().next()?.split_whitespace().next()?;
    if digest.len() == 32 && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(digest.to_ascii_lowercase())
    } else {
        None
    }
}

/// Two-level chunked digest for large files
///
/// Each 1 MiB chunk is read completely (short reads are refilled so chunk
/// boundaries do not depend on the underlying reader), digested raw, and
/// the concatenation of raw chunk digests is digested again for the final
/// hex fingerprint.
fn hash_chunked(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut combined = Vec::new();

    loop {
        let mut filled = 0;
        while filled < CHUNK_SIZE {
            let bytes_read = file.read(&mut chunk[filled..])?;
            if bytes_read == 0 {
                break;
            }
            filled += bytes_read;
        }
        if filled == 0 {
            break;
        }
        combined.extend_from_slice(Md5::digest(&chunk[..filled]).as_slice());
        if filled < CHUNK_SIZE {
            break;
        }
    }

    Ok(hex::encode(Md5::digest(&combined)))
}
