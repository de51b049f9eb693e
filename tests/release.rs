use secrecy::SecretString;
use std::{cell::Cell, fs, path::Path, rc::Rc};

use relcut::{
    ReleaseError, Result,
    config::Config,
    git::{Git, Vcs},
    orchestrator::{Orchestrator, Phase, ReleaseSettings},
    process::SystemRunner,
    prompt::Prompt,
    publisher::Publisher,
    updater::{FileBumper, VersionBumper},
};

mod common;

struct Answer(bool);

impl Prompt for Answer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[derive(Default)]
struct CountingPublisher {
    calls: Cell<usize>,
}

impl Publisher for CountingPublisher {
    fn publish(&self) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

fn release(
    dir: &Path,
    patch_level: u64,
    publish: bool,
    publisher: Rc<CountingPublisher>,
) -> Result<relcut::orchestrator::ReleaseRun> {
    let config = Config::default();
    let bumper = FileBumper::new(dir, config.version.clone(), config.version_files);

    let settings = ReleaseSettings {
        current_version: bumper.current_version()?,
        patch_level,
        tag_prefix: config.tag_prefix,
        dev_suffix: config.dev_suffix,
        credential_env: "GITHUB_TOKEN".into(),
        credential: Some(SecretString::from("token".to_string())),
        dry_run: false,
    };

    let vcs: Rc<dyn Vcs> = Rc::new(Git::new(Rc::new(SystemRunner::new(dir))));
    let bumper: Rc<dyn VersionBumper> = Rc::new(bumper);
    let publisher: Rc<dyn Publisher> = publisher;
    let prompt: Rc<dyn Prompt> = Rc::new(Answer(publish));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(
        Orchestrator::builder()
            .settings(settings)
            .vcs(vcs)
            .bumper(bumper)
            .publisher(publisher)
            .prompt(prompt)
            .build()?
            .run(),
    )
}

fn subjects(dir: &Path, count: usize) -> Vec<String> {
    common::git(dir, &["log", "--format=%s", &format!("-{count}")])
        .lines()
        .map(String::from)
        .collect()
}

#[test_log::test]
fn cuts_main_release() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    common::site_repo(dir);

    let publisher = Rc::new(CountingPublisher::default());
    let run = release(dir, 0, true, Rc::clone(&publisher)).unwrap();

    assert_eq!(run.tag_name, "v0.21");
    assert_eq!(run.phase, Phase::Done);
    assert_eq!(publisher.calls.get(), 1);

    assert_eq!(
        subjects(dir, 2),
        vec![
            "release: Prepare repository for 0.21-DEV",
            "release: Bump versions for release of 0.21",
        ]
    );

    // the tag points at the release commit, not the preparation commit
    let tagged = common::git(dir, &["show", "v0.21:VERSION"]);
    assert_eq!(tagged, "0.21\n");
    assert_eq!(fs::read_to_string(dir.join("VERSION")).unwrap(), "0.21-DEV\n");
}

#[test]
fn declined_publish_still_prepares_next_version() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    common::site_repo(dir);

    let publisher = Rc::new(CountingPublisher::default());
    let run = release(dir, 0, false, Rc::clone(&publisher)).unwrap();

    assert!(!run.published);
    assert_eq!(publisher.calls.get(), 0);
    assert_eq!(common::git(dir, &["tag", "-l", "v0.21"]).trim(), "v0.21");
    assert_eq!(fs::read_to_string(dir.join("VERSION")).unwrap(), "0.21-DEV\n");
}

#[test]
fn patch_release_restores_current_version() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    common::site_repo(dir);

    let run = release(dir, 1, true, Rc::new(CountingPublisher::default())).unwrap();

    assert_eq!(run.tag_name, "v0.20.1");
    assert_eq!(common::git(dir, &["show", "v0.20.1:VERSION"]), "0.20.1\n");
    assert_eq!(fs::read_to_string(dir.join("VERSION")).unwrap(), "0.20\n");
    assert_eq!(
        subjects(dir, 1),
        vec!["release: Prepare repository for 0.20"]
    );
}

#[test]
fn second_release_of_same_version_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    common::site_repo(dir);
    common::git(dir, &["tag", "-a", "v0.21", "-m", "release: 0.21"]);

    let head = common::git(dir, &["rev-parse", "HEAD"]);
    let err = release(dir, 0, true, Rc::new(CountingPublisher::default()))
        .unwrap_err();

    assert_eq!(err.phase(), Some(Phase::TagCheck));
    assert!(matches!(
        err,
        ReleaseError::Aborted { source, .. } if matches!(*source, ReleaseError::TagExists(_))
    ));
    assert_eq!(common::git(dir, &["rev-parse", "HEAD"]), head);
    assert_eq!(fs::read_to_string(dir.join("VERSION")).unwrap(), "0.20\n");
}
