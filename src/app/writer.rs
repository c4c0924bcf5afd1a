use crate::app::error::WriteError;
use crate::app::models::{ManifestConfig, MatchedFiles};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Identity written into the manifest header.
pub const GENERATOR: &str = env!("CARGO_PKG_NAME");

pub const NO_MATCH_WARNING: &str = "# WARNING: No files matched provided include/exclude patterns";

pub struct ManifestWriter;

impl ManifestWriter {
    /// Renders the manifest text. Sections appear in a fixed order: header,
    /// file listing, additional entries, `NETWORK:`, `FALLBACK:`.
    pub fn render(files: &MatchedFiles, config: &ManifestConfig) -> String {
        let mut out = String::from("CACHE MANIFEST\n\n");

        out.push_str("#\n");
        out.push_str(&format!("# Generated by {}\n", GENERATOR));
        if let Some(version) = non_empty(&config.version) {
            out.push_str(&format!("# version: {}\n", version));
        }
        out.push_str("#\n");

        // No explicit CACHE: header here, it is implied for the first section.
        if files.is_empty() {
            out.push_str(NO_MATCH_WARNING);
            out.push('\n');
        }
        for path in files.iter() {
            out.push_str(path);
            out.push('\n');
        }

        if !config.additionals.is_empty() {
            out.push_str("# Additional Entries\n");
            push_lines(&mut out, &config.additionals);
        }

        if let Some(resources) = &config.network_resources {
            out.push_str("\nNETWORK:\n");
            push_lines(&mut out, resources);
        }

        if let Some(fallback) = non_empty(&config.fallback) {
            out.push_str("\nFALLBACK:\n");
            out.push_str(fallback);
            out.push('\n');
        }

        out
    }

    /// Renders and writes the manifest to `destination`, creating parent
    /// directories and truncating any existing file.
    pub fn write(
        destination: &Path,
        files: &MatchedFiles,
        config: &ManifestConfig,
    ) -> Result<(), WriteError> {
        if files.is_empty() {
            log::warn!("No files matched provided include/exclude patterns");
        }
        let text = Self::render(files, config);

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(destination).map_err(|source| WriteError::CreateFile {
            path: destination.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| WriteError::Write {
                path: destination.to_path_buf(),
                source,
            })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_files() -> MatchedFiles {
        ["img/c.png", "a.html", "b.js"].into_iter().collect()
    }

    fn header() -> String {
        format!("CACHE MANIFEST\n\n#\n# Generated by {}\n#\n", GENERATOR)
    }

    #[test]
    fn test_render_minimal() {
        let text = ManifestWriter::render(&site_files(), &ManifestConfig::default());
        assert_eq!(text, format!("{}a.html\nb.js\nimg/c.png\n", header()));
    }

    #[test]
    fn test_render_version_and_fallback() {
        let config = ManifestConfig {
            version: Some("3".into()),
            fallback: Some("/ /offline.html".into()),
            ..Default::default()
        };
        let text = ManifestWriter::render(&site_files(), &config);
        assert_eq!(
            text,
            format!(
                "CACHE MANIFEST\n\n#\n# Generated by {}\n# version: 3\n#\n\
                 a.html\nb.js\nimg/c.png\n\nFALLBACK:\n/ /offline.html\n",
                GENERATOR
            )
        );
    }

    #[test]
    fn test_render_empty_strings_are_omitted() {
        let config = ManifestConfig {
            version: Some(String::new()),
            fallback: Some(String::new()),
            ..Default::default()
        };
        let text = ManifestWriter::render(&site_files(), &config);
        assert!(!text.contains("version:"));
        assert!(!text.contains("FALLBACK:"));
    }

    #[test]
    fn test_render_no_matches_warns_in_listing() {
        let text = ManifestWriter::render(&MatchedFiles::new(), &ManifestConfig::default());
        assert_eq!(text, format!("{}{}\n", header(), NO_MATCH_WARNING));
    }

    #[test]
    fn test_render_additionals_follow_listing() {
        let config = ManifestConfig {
            additionals: vec!["dynamic.json".into()],
            ..Default::default()
        };
        let text = ManifestWriter::render(&site_files(), &config);
        assert!(text.ends_with("img/c.png\n# Additional Entries\ndynamic.json\n"));
    }

    #[test]
    fn test_render_network_section() {
        let absent = ManifestWriter::render(&site_files(), &ManifestConfig::default());
        assert!(!absent.contains("NETWORK:"));

        let empty = ManifestConfig {
            network_resources: Some(Vec::new()),
            ..Default::default()
        };
        let text = ManifestWriter::render(&site_files(), &empty);
        assert!(text.ends_with("img/c.png\n\nNETWORK:\n"));

        let listed = ManifestConfig {
            network_resources: Some(vec!["/api".into(), "*".into()]),
            ..Default::default()
        };
        let text = ManifestWriter::render(&site_files(), &listed);
        assert!(text.ends_with("\nNETWORK:\n/api\n*\n"));
    }

    #[test]
    fn test_render_full_section_order() {
        let config = ManifestConfig {
            version: Some("1.2".into()),
            additionals: vec!["dynamic.json".into(), "feed.xml".into()],
            network_resources: Some(vec!["*".into()]),
            fallback: Some("/ /offline.html".into()),
            ..Default::default()
        };
        let text = ManifestWriter::render(&["index.html"].into_iter().collect(), &config);
        let expected = format!(
            "CACHE MANIFEST\n\n#\n# Generated by {}\n# version: 1.2\n#\n\
             index.html\n\
             # Additional Entries\ndynamic.json\nfeed.xml\n\
             \nNETWORK:\n*\n\
             \nFALLBACK:\n/ /offline.html\n",
            GENERATOR
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_creates_parents_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("target/site/app.manifest");
        let config = ManifestConfig {
            output: dest.clone(),
            ..Default::default()
        };

        ManifestWriter::write(&dest, &site_files(), &config).unwrap();
        let first = fs::read(&dest).unwrap();
        ManifestWriter::write(&dest, &site_files(), &config).unwrap();
        let second = fs::read(&dest).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            ManifestWriter::render(&site_files(), &config)
        );
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("app.manifest");
        fs::write(&dest, "x".repeat(4096)).unwrap();

        ManifestWriter::write(&dest, &site_files(), &ManifestConfig::default()).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert_eq!(text, ManifestWriter::render(&site_files(), &ManifestConfig::default()));
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = ManifestWriter::write(
            &blocker.join("app.manifest"),
            &site_files(),
            &ManifestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }

    #[test]
    fn test_write_fails_when_destination_is_a_directory() {
        let dir = TempDir::new().unwrap();
        let err = ManifestWriter::write(dir.path(), &site_files(), &ManifestConfig::default())
            .unwrap_err();
        assert!(matches!(err, WriteError::CreateFile { .. }));
    }
}
