//! Traits related to the repository host
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{error::Result, notes::commit::RemoteMetadata};

/// Looks up what the repository host knows about a single commit.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommitLookup {
    async fn fetch_commit(&self, hash: &str) -> Result<RemoteMetadata>;
}
