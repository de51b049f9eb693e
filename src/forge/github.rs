//! Implements the CommitLookup trait for the GitHub REST API
use async_trait::async_trait;
use log::*;
use reqwest::{
    Client, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::{
    error::{ReleaseError, Result},
    forge::{config::RemoteConfig, traits::CommitLookup},
    notes::commit::RemoteMetadata,
};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = "relcut";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubUser {
    login: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubFile {
    filename: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubCommit {
    html_url: Option<String>,
    author: Option<GithubUser>,
    files: Vec<GithubFile>,
}

/// Decode a single-commit API response. Absent or null fields decode to
/// empty strings.
pub fn parse_commit(body: &str) -> Result<RemoteMetadata> {
    let commit: GithubCommit = serde_json::from_str(body)?;
    let author = commit.author.unwrap_or_default();

    Ok(RemoteMetadata {
        commit_url: commit.html_url.unwrap_or_default(),
        author_login: author.login.unwrap_or_default(),
        author_profile_url: author.html_url.unwrap_or_default(),
        files: commit.files.into_iter().map(|f| f.filename).collect(),
    })
}

/// GitHub commit lookups using reqwest.
pub struct GithubCommits {
    client: Client,
    base_url: Url,
}

impl GithubCommits {
    /// Create a client for `{api_base}/repos/{owner}/{repo}/commits/`,
    /// sending the token as a bearer credential when one is configured.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!(
                "Bearer {}",
                token.expose_secret()
            ))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let base_url = Url::parse(&format!(
            "{}/repos/{}/{}/commits/",
            config.api_base, config.owner, config.repo
        ))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CommitLookup for GithubCommits {
    async fn fetch_commit(&self, hash: &str) -> Result<RemoteMetadata> {
        let url = self.base_url.join(hash)?;
        debug!("fetching commit metadata: {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReleaseError::LookupFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_commit(&body)
    }
}

#[cfg(test)]
#[path = "./github_tests.rs"]
mod tests;
