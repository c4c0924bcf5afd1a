use crate::app::cli::Cli;
use crate::app::error::ConfigError;
use crate::app::models::{ManifestConfig, RuntimeConfig, ScanConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "cache-manifest.toml";

/// One layer of settings: a preset, the project file or the command line.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub version: Option<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub additional: Option<Vec<String>>,
    pub network: Option<Vec<String>>,
    pub fallback: Option<String>,
}

impl FileConfig {
    /// Lays `top` over `self`: scalars from `top` win, lists are appended.
    fn overlay(self, top: FileConfig) -> FileConfig {
        FileConfig {
            input: top.input.or(self.input),
            output: top.output.or(self.output),
            version: top.version.or(self.version),
            include: merge_optional(self.include, top.include),
            exclude: merge_optional(self.exclude, top.exclude),
            additional: merge_optional(self.additional, top.additional),
            network: merge_optional(self.network, top.network),
            fallback: top.fallback.or(self.fallback),
        }
    }
}

impl From<&Cli> for FileConfig {
    fn from(cli: &Cli) -> Self {
        FileConfig {
            input: cli.input.clone(),
            output: cli.output.clone(),
            version: cli.manifest_version.clone(),
            include: cli.include.clone(),
            exclude: cli.exclude.clone(),
            additional: cli.additional.clone(),
            network: cli.network.clone(),
            fallback: cli.fallback.clone(),
        }
    }
}

fn presets_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(
        home.join(".config")
            .join(env!("CARGO_PKG_NAME"))
            .join("presets.toml"),
    )
}

fn load_presets_file(path: &Path) -> Result<HashMap<String, FileConfig>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    log::debug!("Loading presets from {}", path.display());
    parse_toml(path)
}

fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    log::debug!("Loading config from {}", path.display());
    parse_toml(path)
}

fn parse_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Like [`merge_vecs`], but stays `None` when neither side is set.
fn merge_optional(base: Option<Vec<String>>, top: Option<Vec<String>>) -> Option<Vec<String>> {
    if base.is_none() && top.is_none() {
        return None;
    }
    Some(merge_vecs(base, top))
}

/// Merges layers from lowest to highest precedence.
pub fn merge_layers(layers: impl IntoIterator<Item = FileConfig>) -> FileConfig {
    layers
        .into_iter()
        .fold(FileConfig::default(), FileConfig::overlay)
}

fn validate_root(root: &Path) -> Result<(), ConfigError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotDirectory {
            path: root.to_path_buf(),
        }),
        Err(_) => Err(ConfigError::RootMissing {
            path: root.to_path_buf(),
        }),
    }
}

/// Checks the merged settings and compiles them into a [`RuntimeConfig`].
pub fn build_runtime_config(merged: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    let output = merged.output.ok_or(ConfigError::MissingOutput)?;
    let root = merged.input.ok_or(ConfigError::MissingInput)?;
    validate_root(&root)?;

    let scan = ScanConfig::new(
        root,
        &merged.include.unwrap_or_default(),
        &merged.exclude.unwrap_or_default(),
    )?;

    let manifest = ManifestConfig {
        output,
        version: merged.version.filter(|v| !v.is_empty()),
        additionals: merged.additional.unwrap_or_default(),
        network_resources: merged.network,
        fallback: merged.fallback.filter(|f| !f.is_empty()),
    };

    Ok(RuntimeConfig { scan, manifest })
}

/// Resolves the configuration for this run.
///
/// Layers, lowest precedence first: the preset (named by `--preset`, else the
/// one matching `project_name`), the project config file, then the CLI.
pub fn resolve_config(
    cli: &Cli,
    working_dir: &Path,
    project_name: Option<&str>,
) -> Result<RuntimeConfig, ConfigError> {
    let presets = match presets_path() {
        Some(path) => load_presets_file(&path)?,
        None => {
            log::debug!("No home directory, skipping presets");
            HashMap::new()
        }
    };
    resolve_with_presets(cli, working_dir, project_name, &presets)
}

fn resolve_with_presets(
    cli: &Cli,
    working_dir: &Path,
    project_name: Option<&str>,
    presets: &HashMap<String, FileConfig>,
) -> Result<RuntimeConfig, ConfigError> {
    // Determine preset to use: CLI flag > Auto-detect > None
    let preset = match cli.preset.as_deref() {
        Some(name) => Some(
            presets
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?,
        ),
        None => project_name.and_then(|k| presets.get(k)).cloned(),
    };

    let project_file = match &cli.config {
        Some(path) => Some(load_config_file(path)?),
        None => {
            let default = working_dir.join(PROJECT_CONFIG_FILE);
            if default.is_file() {
                Some(load_config_file(&default)?)
            } else {
                None
            }
        }
    };

    let merged = merge_layers(
        [preset, project_file, Some(FileConfig::from(cli))]
            .into_iter()
            .flatten(),
    );
    log::debug!("Merged configuration: {:?}", merged);

    build_runtime_config(merged)
}
