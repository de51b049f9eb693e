//! Configuration loading and parsing for `relcut.toml` files.
//!
//! Every section is optional; a missing file means all defaults.
use log::*;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::{
    error::Result,
    forge::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV},
    notes::{classify::ClassificationPolicy, render::DEFAULT_TEMPLATE},
    version::DEFAULT_DEV_SUFFIX,
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "relcut.toml";
/// Default prefix prepended to the version to form the tag name.
pub const DEFAULT_TAG_PREFIX: &str = "v";
/// Default external release tool.
pub const DEFAULT_PUBLISH_COMMAND: &str = "goreleaser";
/// Default file holding the current version.
pub const DEFAULT_VERSION_FILE: &str = "VERSION";

/// Remote repository used for commit lookups and issue links.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository URL (https or ssh). Empty disables remote lookups.
    pub url: String,
    /// REST API root override. Derived from the host when empty.
    pub api_base: String,
    /// Environment variable holding the API token.
    pub token_env: String,
    /// Issue link base override. Defaults to `{repository}/issues`.
    pub issue_base_url: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: "".into(),
            api_base: "".into(),
            token_env: DEFAULT_TOKEN_ENV.into(),
            issue_base_url: "".into(),
        }
    }
}

/// External tool that builds and publishes release artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Program run with no arguments from the repository root.
    pub command: String,
    /// Environment variable that must be set before releasing.
    pub credential_env: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PUBLISH_COMMAND.into(),
            credential_env: DEFAULT_TOKEN_ENV.into(),
        }
    }
}

/// Release notes generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Tera template for the notes body.
    pub template: String,
    /// Commit lookups in flight at once.
    pub concurrency: usize,
    /// Per-lookup timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.into(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Where the current version is read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// File path relative to the repository root.
    pub file: String,
    /// Regex whose first capture group is the version.
    pub pattern: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_VERSION_FILE.into(),
            pattern: r"(?s)^\s*(\S+)".into(),
        }
    }
}

/// One regex replacement applied when bumping a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplacementConfig {
    pub pattern: String,
    /// Replacement text; supports version placeholders and `${n}` captures.
    pub replacement: String,
}

/// A file rewritten on every version bump.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VersionFileConfig {
    pub path: String,
    pub replacements: Vec<ReplacementConfig>,
}

fn default_version_files() -> Vec<VersionFileConfig> {
    vec![VersionFileConfig {
        path: DEFAULT_VERSION_FILE.into(),
        replacements: vec![ReplacementConfig {
            pattern: r"(?s)\A.+".into(),
            replacement: "{version}\n".into(),
        }],
    }]
}

/// Root configuration structure for `relcut.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of release tags (e.g. "v").
    pub tag_prefix: String,
    /// Suffix of the development version set after a main release.
    pub dev_suffix: String,
    pub repository: RepositoryConfig,
    pub publish: PublishConfig,
    pub notes: NotesConfig,
    pub version: VersionConfig,
    pub version_files: Vec<VersionFileConfig>,
    pub classification: ClassificationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
            dev_suffix: DEFAULT_DEV_SUFFIX.into(),
            repository: RepositoryConfig::default(),
            publish: PublishConfig::default(),
            notes: NotesConfig::default(),
            version: VersionConfig::default(),
            version_files: default_version_files(),
            classification: ClassificationPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "configuration not found at {}: using default",
                path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        debug!("loaded configuration from {}", path.display());

        Ok(config)
    }
}
