use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Generate an HTML5 cache manifest from a directory tree"
)]
pub struct Cli {
    /// Manifest file to write
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory to scan
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Version label written into the manifest header
    #[arg(long, value_name = "LABEL")]
    pub manifest_version: Option<String>,

    /// Patterns for files to list (e.g., '**/*.html'). Defaults to all files
    #[arg(long, num_args = 1..)]
    pub include: Option<Vec<String>>,

    /// Patterns for files to leave out (e.g., '**/*.map')
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Extra entries listed verbatim after the files
    #[arg(long, num_args = 1..)]
    pub additional: Option<Vec<String>>,

    /// Resources always fetched from the network. Pass the flag alone for an empty NETWORK: section
    #[arg(long, num_args = 0..)]
    pub network: Option<Vec<String>>,

    /// Fallback expression (e.g., '/ /offline.html')
    #[arg(long)]
    pub fallback: Option<String>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Project config file (defaults to ./cache-manifest.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
