//! # Vigil CLI - scheduled file-integrity scans
//!
//! Thin launcher around the vigil library: assembles a [`ScanConfig`]
//! from a JSON config file and/or command-line flags, runs one scan, and
//! prints the report.
//!
//! ## Usage
//! ```bash
//! # Scan two trees for changed php/js files
//! vigil --root /var/www/site --root /var/www/blog --ext php --ext js \
//!       --storage /var/lib/vigil/vigil.dat
//!
//! # Everything from a config file, machine-readable output
//! vigil --config /etc/vigil.json --json
//! ```
//!
//! Exit codes: 0 no differences, 1 differences found, 2 error. That
//! makes a cron entry like `vigil --config ... || notify` do the right
//! thing.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vigil::{ScanConfig, Vigil};

/// Vigil - walk directory trees and report added, deleted, and modified files
#[derive(Parser)]
#[command(name = "vigil")]
#[command(version)]
#[command(about = "File-integrity monitor: snapshot directory trees and report differences")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root path to scan (repeatable)
    #[arg(short, long = "root")]
    roots: Vec<String>,

    /// Extension to include, case-insensitive (repeatable; none = all files)
    #[arg(short, long = "ext")]
    extensions: Vec<String>,

    /// Absolute directory path to skip entirely (repeatable)
    #[arg(short, long = "ignore")]
    ignore_dirs: Vec<String>,

    /// Snapshot storage location
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// Size threshold in bytes for the large-file hashing strategies
    #[arg(long)]
    threshold: Option<u64>,

    /// Allow invoking the system digest utility for large files
    #[arg(long)]
    external_hasher: bool,

    /// Emit findings as JSON instead of the plain-text report
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (or set RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("vigil=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vigil=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(found_differences) => {
            if found_differences {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if !cli.roots.is_empty() {
        config.roots = cli.roots;
    }
    if !cli.extensions.is_empty() {
        config.extensions = cli.extensions;
    }
    if !cli.ignore_dirs.is_empty() {
        config.ignore_dirs = cli.ignore_dirs;
    }
    if let Some(storage) = cli.storage {
        config.storage_location = storage;
    }
    if let Some(threshold) = cli.threshold {
        config.hash_threshold = threshold;
    }
    if cli.external_hasher {
        config.external_hasher = true;
    }

    let started = Instant::now();
    let vigil = Vigil::new(config)?;
    let outcome = vigil.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", vigil.render_report(&outcome));
        let elapsed = humantime::format_duration(std::time::Duration::from_secs(
            started.elapsed().as_secs(),
        ));
        let summary = format!(
            "{} findings across {} files in {}",
            outcome.findings.len(),
            outcome.file_count,
            elapsed
        );
        if outcome.has_findings() {
            eprintln!("{}", summary.as_str().yellow());
        } else {
            eprintln!("{}", summary.as_str().green());
        }
    }

    Ok(outcome.has_findings())
}
