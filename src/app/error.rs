use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Raised while compiling a glob pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("glob pattern is empty")]
    Empty,
    #[error("invalid glob pattern '{pattern}': '**' must be a whole path segment")]
    MisplacedRecursive { pattern: String },
}

/// Problems with the resolved configuration. Raised before any scanning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no output manifest file given (use --output or set `output` in a config file)")]
    MissingOutput,
    #[error("no input directory given (use --input or set `input` in a config file)")]
    MissingInput,
    #[error("input directory does not exist: {}", .path.display())]
    RootMissing { path: PathBuf },
    #[error("input path is not a directory: {}", .path.display())]
    RootNotDirectory { path: PathBuf },
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
    #[error("failed to read config at {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// Failures while walking the input directory.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist: {}", .path.display())]
    RootMissing { path: PathBuf },
    #[error("scan root is not a directory: {}", .path.display())]
    RootNotDirectory { path: PathBuf },
    #[error("file name is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { path: PathBuf },
    #[error("error walking {}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

/// Failures while writing the manifest file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create manifest file {}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write manifest file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
