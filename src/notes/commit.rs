//! Commit records flowing through the release notes pipeline.
use serde::Serialize;

/// Metadata the hosting platform knows about a commit.
///
/// Each field degrades to empty independently when the remote omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteMetadata {
    /// Canonical web URL of the commit.
    pub commit_url: String,
    /// Hosting account that authored the commit.
    pub author_login: String,
    /// Web URL of the author's profile.
    pub author_profile_url: String,
    /// Paths touched by the commit, when the remote reports them.
    pub files: Vec<String>,
}

/// One parsed unit of history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Abbreviated commit hash.
    pub hash: String,
    pub author_email: String,
    pub subject: String,
    pub body: String,
    /// Issue numbers referenced from the body, in order of appearance.
    pub issues: Vec<u64>,
    /// Remote metadata, `None` when the lookup failed or was skipped.
    pub remote: Option<RemoteMetadata>,
}

impl CommitRecord {
    /// Paths touched by this commit as reported by the remote.
    pub fn files(&self) -> &[String] {
        self.remote
            .as_ref()
            .map(|r| r.files.as_slice())
            .unwrap_or_default()
    }
}
