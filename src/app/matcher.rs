//! Glob matching for `/`-separated relative paths.
//!
//! Supported syntax:
//! - `*` matches any run of characters inside a single path segment
//! - `?` matches exactly one character inside a single path segment
//! - `**` as a whole segment matches zero or more segments
//!
//! So `**/*.png` matches `c.png` as well as `img/deep/c.png`, while `*.png`
//! only matches files at the root.

use crate::app::error::PatternError;

/// Pattern substituted when no include pattern is configured.
pub const MATCH_ALL: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    AnyDepth,
    /// A single path segment, possibly containing `*` and `?`.
    Name(Vec<char>),
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    source: String,
    segments: Vec<Segment>,
}

impl GlobPattern {
    /// Compiles `pattern`.
    ///
    /// Backslashes are read as separators, a leading `/` is ignored and a
    /// trailing `/` stands for everything below that directory (`img/` is
    /// `img/**`).
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let mut normalized = pattern.replace('\\', "/");
        if normalized.trim_matches('/').is_empty() {
            return Err(PatternError::Empty);
        }
        if normalized.ends_with('/') {
            normalized.push_str("**");
        }

        let mut segments = Vec::new();
        for part in normalized.split('/') {
            match part {
                "" => continue,
                "**" => {
                    // `**/**` is the same as `**`
                    if segments.last() != Some(&Segment::AnyDepth) {
                        segments.push(Segment::AnyDepth);
                    }
                }
                _ if part.contains("**") => {
                    return Err(PatternError::MisplacedRecursive {
                        pattern: pattern.to_string(),
                    });
                }
                _ => segments.push(Segment::Name(part.chars().collect())),
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern matching every relative path.
    pub fn match_all() -> Self {
        Self {
            source: MATCH_ALL.to_string(),
            segments: vec![Segment::AnyDepth],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests a `/`-separated relative path against this pattern.
    pub fn matches(&self, relative_path: &str) -> bool {
        let parts: Vec<&str> = relative_path.split('/').filter(|p| !p.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

/// Compiles every pattern, stopping at the first invalid one.
pub fn compile_all(patterns: &[String]) -> Result<Vec<GlobPattern>, PatternError> {
    patterns.iter().map(|p| GlobPattern::new(p)).collect()
}

/// True iff `relative_path` matches at least one include and no exclude.
///
/// An empty `includes` behaves like [`MATCH_ALL`].
pub fn matches(relative_path: &str, includes: &[GlobPattern], excludes: &[GlobPattern]) -> bool {
    let included = includes.is_empty() || includes.iter().any(|p| p.matches(relative_path));
    included && !excludes.iter().any(|p| p.matches(relative_path))
}

/// Include/exclude pattern sets applied together, with [`matches`] semantics.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    includes: Vec<GlobPattern>,
    excludes: Vec<GlobPattern>,
}

impl PathMatcher {
    pub fn new(includes: Vec<GlobPattern>, excludes: Vec<GlobPattern>) -> Self {
        Self { includes, excludes }
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        matches(relative_path, &self.includes, &self.excludes)
    }
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> bool {
    match segments.split_first() {
        None => parts.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=parts.len()).any(|skip| match_segments(rest, &parts[skip..]))
        }
        Some((Segment::Name(name), rest)) => match parts.split_first() {
            Some((head, tail)) => match_name(name, head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Wildcard match of a single segment, backtracking to the last `*` seen.
fn match_name(pattern: &[char], name: &str) -> bool {
    let text: Vec<char> = name.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut last_star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                last_star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match last_star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    last_star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
