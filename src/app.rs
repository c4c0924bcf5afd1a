// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod scanner;
pub mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

use self::cli::Cli;
use self::config::resolve_config;
use self::models::RuntimeConfig;
use self::scanner::Scanner;
use self::writer::ManifestWriter;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub output: PathBuf,
    pub file_count: usize,
}

/// Scans the input directory and writes the manifest.
pub fn generate(config: &RuntimeConfig) -> Result<GenerationSummary> {
    // The manifest may live under the root; it never lists itself
    let files = Scanner::new(&config.scan)
        .skipping(&config.manifest.output)
        .scan()
        .context("Failed to scan input directory")?;

    let output = &config.manifest.output;
    ManifestWriter::write(output, &files, &config.manifest)
        .context("Failed to write cache manifest")?;

    Ok(GenerationSummary {
        output: output.clone(),
        file_count: files.len(),
    })
}

/// Human-readable report of a fatal error, causes included.
pub fn error_report(err: &anyhow::Error) -> String {
    format!("error: {:#}", err)
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Identify working directory & project name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    // Simple heuristic: name of current folder
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(&args, &current_dir, project_name)
        .context("Invalid configuration")?;

    // 4. Scan and write
    let summary = generate(&config)?;

    log::info!(
        "Wrote {} ({} files)",
        summary.output.display(),
        summary.file_count
    );

    Ok(())
}
