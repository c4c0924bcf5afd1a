use crate::app::error::PatternError;
use crate::app::matcher::{compile_all, GlobPattern, PathMatcher};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// What to scan and how to filter it.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Never empty: falls back to the match-all pattern.
    pub includes: Vec<GlobPattern>,
    pub excludes: Vec<GlobPattern>,
}

impl ScanConfig {
    /// Compiles the raw patterns. Fails on the first malformed one.
    pub fn new(root: PathBuf, includes: &[String], excludes: &[String]) -> Result<Self, PatternError> {
        let mut includes = compile_all(includes)?;
        if includes.is_empty() {
            includes.push(GlobPattern::match_all());
        }

        Ok(Self {
            root,
            includes,
            excludes: compile_all(excludes)?,
        })
    }

    pub fn matcher(&self) -> PathMatcher {
        PathMatcher::new(self.includes.clone(), self.excludes.clone())
    }
}

/// What goes into the manifest besides the scanned files.
#[derive(Debug, Clone, Default)]
pub struct ManifestConfig {
    pub output: PathBuf,
    pub version: Option<String>,
    pub additionals: Vec<String>,
    /// `None` omits the `NETWORK:` section, `Some(vec![])` renders it empty.
    pub network_resources: Option<Vec<String>>,
    pub fallback: Option<String>,
}

/// Represents the final configuration after merging presets, config file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scan: ScanConfig,
    pub manifest: ManifestConfig,
}

/// Relative, `/`-separated paths selected by a scan, in byte-wise order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedFiles(BTreeSet<String>);

impl MatchedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relative_path: String) -> bool {
        self.0.insert(relative_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MatchedFiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
