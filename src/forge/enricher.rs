//! Attaches remote metadata to parsed commit records.
use futures_util::{StreamExt, stream};
use log::*;

use crate::{forge::traits::CommitLookup, notes::commit::CommitRecord};

/// Runs one lookup per commit with a bounded number in flight.
pub struct Enricher {
    lookup: Box<dyn CommitLookup>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(lookup: Box<dyn CommitLookup>, concurrency: usize) -> Self {
        Self {
            lookup,
            concurrency: concurrency.max(1),
        }
    }

    /// Attach metadata to every commit the remote can describe. A failed
    /// lookup leaves that commit's `remote` empty and is only logged.
    /// Records come back in the order they were given.
    pub async fn enrich(&self, records: Vec<CommitRecord>) -> Vec<CommitRecord> {
        info!(
            "looking up {} commits ({} at a time)",
            records.len(),
            self.concurrency
        );

        let lookup = self.lookup.as_ref();

        stream::iter(records)
            .map(|mut record| async move {
                match lookup.fetch_commit(&record.hash).await {
                    Ok(metadata) => record.remote = Some(metadata),
                    Err(err) => {
                        warn!("unable to look up commit {}: {err}", record.hash)
                    }
                }
                record
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        error::ReleaseError, forge::traits::MockCommitLookup,
        notes::commit::RemoteMetadata,
    };

    fn record(hash: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.into(),
            subject: format!("change {hash}"),
            ..CommitRecord::default()
        }
    }

    fn metadata(hash: &str) -> RemoteMetadata {
        RemoteMetadata {
            commit_url: format!("https://github.com/acme/site/commit/{hash}"),
            author_login: "jane".into(),
            author_profile_url: "https://github.com/jane".into(),
            files: vec![],
        }
    }

    #[test_log::test(tokio::test)]
    async fn failed_lookup_does_not_affect_others() {
        let mut lookup = MockCommitLookup::new();
        lookup.expect_fetch_commit().times(3).returning(|hash| {
            if hash == "bbb" {
                Err(ReleaseError::LookupFailed {
                    status: 502,
                    body: "bad gateway".into(),
                })
            } else {
                Ok(metadata(hash))
            }
        });

        let enricher = Enricher::new(Box::new(lookup), 8);
        let records = enricher
            .enrich(vec![record("aaa"), record("bbb"), record("ccc")])
            .await;

        let hashes = records
            .iter()
            .map(|r| r.hash.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(hashes, vec!["aaa", "bbb", "ccc"]);

        assert_eq!(records[0].remote, Some(metadata("aaa")));
        assert_eq!(records[1].remote, None);
        assert_eq!(records[2].remote, Some(metadata("ccc")));
    }

    struct SlowFirst;

    #[async_trait::async_trait]
    impl CommitLookup for SlowFirst {
        async fn fetch_commit(
            &self,
            hash: &str,
        ) -> crate::error::Result<RemoteMetadata> {
            // the first commit finishes last
            let delay = if hash == "first" { 50 } else { 1 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(metadata(hash))
        }
    }

    #[tokio::test]
    async fn keeps_input_order_when_completion_order_differs() {
        let enricher = Enricher::new(Box::new(SlowFirst), 4);
        let records = enricher
            .enrich(vec![record("first"), record("second"), record("third")])
            .await;

        let urls = records
            .iter()
            .map(|r| r.remote.as_ref().unwrap().commit_url.clone())
            .collect::<Vec<String>>();

        assert_eq!(
            urls,
            vec![
                "https://github.com/acme/site/commit/first",
                "https://github.com/acme/site/commit/second",
                "https://github.com/acme/site/commit/third",
            ]
        );
    }

    #[tokio::test]
    async fn zero_concurrency_still_processes() {
        let mut lookup = MockCommitLookup::new();
        lookup
            .expect_fetch_commit()
            .times(1)
            .returning(|hash| Ok(metadata(hash)));

        let records = Enricher::new(Box::new(lookup), 0)
            .enrich(vec![record("aaa")])
            .await;
        assert!(records[0].remote.is_some());
    }
}
