use crate::app::error::ScanError;
use crate::app::matcher::PathMatcher;
use crate::app::models::{MatchedFiles, ScanConfig};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Scanner {
    root: PathBuf,
    matcher: PathMatcher,
    skip: Option<PathBuf>,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            root: config.root.clone(),
            matcher: config.matcher(),
            skip: None,
        }
    }

    /// Leaves `path` out of the listing even if it lies under the root.
    ///
    /// Used for the manifest itself, which may or may not exist yet.
    pub fn skipping(mut self, path: &Path) -> Self {
        self.skip = Some(path.to_path_buf());
        self
    }

    /// Walks the root and returns every regular file selected by the matcher.
    ///
    /// Symlinks are followed. Any walk error aborts the scan, so a symlink
    /// loop or an unreadable directory never yields a truncated listing.
    pub fn scan(&self) -> Result<MatchedFiles, ScanError> {
        self.check_root()?;
        log::debug!("Scanning {}", self.root.display());

        let skip = self.skipped_relative_path();
        if let Some(skip) = &skip {
            log::debug!("Leaving {} out of the listing", skip);
        }

        // Every file counts: no ignore files, no hidden-file filtering
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(true)
            .build();

        let mut files = MatchedFiles::new();
        for result in walker {
            let entry = result.map_err(|source| ScanError::Walk {
                root: self.root.clone(),
                source,
            })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if let Some(relative) = self.process_entry(entry.path())? {
                if skip.as_deref() == Some(relative.as_str()) {
                    continue;
                }
                log::trace!("Selected {}", relative);
                files.insert(relative);
            }
        }

        Ok(files)
    }

    fn check_root(&self) -> Result<(), ScanError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::RootNotDirectory {
                path: self.root.clone(),
            }),
            Err(_) => Err(ScanError::RootMissing {
                path: self.root.clone(),
            }),
        }
    }

    /// Root-relative path of the skipped file, if it lies under the root.
    fn skipped_relative_path(&self) -> Option<String> {
        let skip = resolve_file_path(self.skip.as_deref()?)?;
        let root = self.root.canonicalize().ok()?;
        to_slash_path(skip.strip_prefix(&root).ok()?)
    }

    /// Relative `/`-separated path of `path` if the matcher selects it.
    fn process_entry(&self, path: &Path) -> Result<Option<String>, ScanError> {
        let Some(relative) = diff_paths(path, &self.root) else {
            return Ok(None);
        };
        let relative = to_slash_path(&relative).ok_or_else(|| ScanError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;

        if relative.is_empty() || !self.matcher.is_match(&relative) {
            return Ok(None);
        }
        Ok(Some(relative))
    }
}

/// Canonical form of a file path that may not exist yet: the deepest
/// existing ancestor is canonicalized and the remaining names appended.
fn resolve_file_path(path: &Path) -> Option<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };

    let mut missing = vec![absolute.file_name()?];
    let mut existing = absolute.parent()?;
    loop {
        if let Ok(resolved) = existing.canonicalize() {
            return Some(missing.iter().rev().fold(resolved, |acc, name| acc.join(name)));
        }
        missing.push(existing.file_name()?);
        existing = existing.parent()?;
    }
}

/// Joins path components with `/` whatever the host separator is.
/// `None` if a component is not valid UTF-8.
fn to_slash_path(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
