//! Configuration for repository host connections.
use git_url_parse::{GitUrl, Scheme};
use secrecy::SecretString;
use std::{env, time::Duration};

use crate::{
    config::RepositoryConfig,
    error::{ReleaseError, Result},
};

/// Environment variable holding the host API token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Default per-request timeout for commit lookups.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of commit lookups in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

const GITHUB_HOST: &str = "github.com";
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Remote repository connection settings resolved from `[repository]`.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote host, with port for self-hosted instances (e.g. "github.com").
    pub host: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// REST API root, without trailing slash.
    pub api_base: String,
    /// Browser URL of the repository.
    pub web_base: String,
    /// Issue links are rendered as `{issue_base_url}/{number}`.
    pub issue_base_url: String,
    /// API token, when one is available.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Resolve connection settings from the repository URL, applying any
    /// explicit API or issue base overrides.
    pub fn from_repository(
        repository: &RepositoryConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let parsed = GitUrl::parse(&repository.url)?;

        let host = parsed.host.clone().ok_or_else(|| {
            ReleaseError::invalid_config(format!(
                "unable to parse host from repository url: {}",
                repository.url
            ))
        })?;

        let owner = parsed.owner.clone().ok_or_else(|| {
            ReleaseError::invalid_config(format!(
                "unable to parse owner from repository url: {}",
                repository.url
            ))
        })?;

        let host = match parsed.port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        };

        // ssh remotes still browse over https
        let scheme = match parsed.scheme {
            Scheme::Http => "http",
            _ => "https",
        };

        let web_base = format!("{scheme}://{host}/{owner}/{}", parsed.name);

        let api_base = if !repository.api_base.is_empty() {
            repository.api_base.trim_end_matches('/').to_string()
        } else if host == GITHUB_HOST {
            GITHUB_API_BASE.to_string()
        } else {
            format!("{scheme}://{host}/api/v3")
        };

        let issue_base_url = if !repository.issue_base_url.is_empty() {
            repository.issue_base_url.trim_end_matches('/').to_string()
        } else {
            format!("{web_base}/issues")
        };

        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| token_from_env(&repository.token_env))
            .map(SecretString::from);

        Ok(Self {
            host,
            owner,
            repo: parsed.name,
            api_base,
            web_base,
            issue_base_url,
            token,
            timeout,
        })
    }
}

/// Read a non-empty token from the environment.
pub fn token_from_env(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    env::var(name).ok().filter(|value| !value.is_empty())
}
