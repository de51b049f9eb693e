use async_trait::async_trait;
use std::rc::Rc;

use relcut::{
    ReleaseError, Result,
    forge::{enricher::Enricher, traits::CommitLookup},
    git::{Git, Vcs},
    notes::{
        NotesPipeline,
        classify::{Category, ClassificationPolicy, Classifier, SectionKind},
        commit::RemoteMetadata,
        render::{DEFAULT_TEMPLATE, Renderer},
    },
    process::SystemRunner,
};

mod common;

const ISSUES: &str = "https://github.com/acme/site/issues";

/// Knows every commit except the one it is told to fail on.
struct FakeGithub {
    unknown: Option<String>,
}

#[async_trait]
impl CommitLookup for FakeGithub {
    async fn fetch_commit(&self, hash: &str) -> Result<RemoteMetadata> {
        if self.unknown.as_deref() == Some(hash) {
            return Err(ReleaseError::LookupFailed {
                status: 422,
                body: "No commit found".into(),
            });
        }

        Ok(RemoteMetadata {
            commit_url: format!("https://github.com/acme/site/commit/{hash}"),
            author_login: "jane".into(),
            author_profile_url: "https://github.com/jane".into(),
            files: vec![],
        })
    }
}

fn pipeline(dir: &std::path::Path, lookup: FakeGithub) -> NotesPipeline {
    let vcs: Rc<dyn Vcs> = Rc::new(Git::new(Rc::new(SystemRunner::new(dir))));

    NotesPipeline::new(
        vcs,
        Some(Enricher::new(Box::new(lookup), 4)),
        Classifier::new(&ClassificationPolicy::default()).unwrap(),
        Renderer::new(DEFAULT_TEMPLATE, ISSUES).unwrap(),
    )
}

#[test_log::test(tokio::test)]
async fn classifies_commits_since_previous_tag() {
    let tmp = tempfile::tempdir().unwrap();
    common::site_repo(tmp.path());

    let changelog = pipeline(tmp.path(), FakeGithub { unknown: None })
        .changelog()
        .await
        .unwrap();

    let placed = changelog
        .iter()
        .map(|(kind, category, commit)| (kind, category, commit.subject.as_str()))
        .collect::<Vec<(SectionKind, Category, &str)>>();

    assert_eq!(
        placed,
        vec![
            (
                SectionKind::Enhancement,
                Category::Templates,
                "feat: add template helper"
            ),
            (
                SectionKind::Enhancement,
                Category::Docs,
                "docs: update install guide"
            ),
            (SectionKind::Fix, Category::Other, "fix: crash on empty input"),
        ]
    );
}

#[test_log::test(tokio::test)]
async fn renders_release_notes_for_the_range() {
    let tmp = tempfile::tempdir().unwrap();
    common::site_repo(tmp.path());

    let notes = pipeline(tmp.path(), FakeGithub { unknown: None })
        .generate()
        .await
        .unwrap();

    let bullets = notes
        .lines()
        .filter(|line| line.starts_with("* "))
        .collect::<Vec<&str>>();
    assert_eq!(bullets.len(), 3);

    let order = ["# Enhancements", "## Templates", "## Docs", "# Fixes", "## Other"]
        .iter()
        .map(|heading| {
            notes
                .lines()
                .position(|line| line == *heading)
                .unwrap_or_else(|| panic!("missing {heading} in:\n{notes}"))
        })
        .collect::<Vec<usize>>();
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    let fix = bullets
        .iter()
        .find(|line| line.starts_with("* fix: crash on empty input"))
        .unwrap();
    assert!(fix.contains("[@jane](https://github.com/jane)"));
    assert!(fix.ends_with(&format!("[#3]({ISSUES}/3)")));
}

#[tokio::test]
async fn failed_lookup_only_drops_that_commits_links() {
    let tmp = tempfile::tempdir().unwrap();
    common::site_repo(tmp.path());

    let docs_hash = common::git(tmp.path(), &["rev-parse", "--short", "HEAD"])
        .trim()
        .to_string();

    let changelog = pipeline(
        tmp.path(),
        FakeGithub {
            unknown: Some(docs_hash.clone()),
        },
    )
    .changelog()
    .await
    .unwrap();

    assert_eq!(changelog.len(), 3);
    for (_, _, commit) in changelog.iter() {
        if commit.hash == docs_hash {
            assert!(commit.remote.is_none());
        } else {
            assert!(commit.remote.is_some());
        }
    }
}
