//! Version-control operations needed to cut a release.
use log::*;
use std::rc::Rc;

#[cfg(test)]
use mockall::automock;

use crate::{
    error::{ReleaseError, Result},
    notes::parser::LOG_FORMAT,
    process::{CommandRunner, args},
};

/// The version-control collaborator of a release run.
#[cfg_attr(test, automock)]
pub trait Vcs {
    /// Delimited log of every commit after the previous tag up to `HEAD`.
    fn commit_log(&self) -> Result<String>;
    /// Whether `tag` already exists.
    fn tag_exists(&self, tag: &str) -> Result<bool>;
    /// Commit every modified tracked file.
    fn commit_all(&self, message: &str) -> Result<()>;
    /// Create an annotated tag at `HEAD`.
    fn create_annotated_tag(&self, tag: &str, message: &str) -> Result<()>;
}

/// [`Vcs`] backed by the `git` executable.
pub struct Git {
    runner: Rc<dyn CommandRunner>,
}

impl Git {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn git(&self, args: Vec<String>) -> Result<String> {
        self.runner.run("git", &args)
    }

    /// Nearest tag reachable from the parent of `HEAD`. When no tag exists
    /// git falls back to an abbreviated commit id, which is just as usable as
    /// a range start.
    pub fn previous_tag(&self) -> Result<String> {
        let output = self.git(args([
            "describe",
            "--tags",
            "--abbrev=0",
            "--always",
            "HEAD^",
        ]))?;

        Ok(output.lines().next().unwrap_or_default().replace('\'', ""))
    }

    fn log_range(&self) -> Result<String> {
        match self.previous_tag() {
            Ok(tag) if !tag.is_empty() => Ok(format!("{tag}..HEAD")),
            Ok(_) => Ok("HEAD".into()),
            Err(ReleaseError::CommandFailed { output, .. })
                if is_missing_parent(&output) =>
            {
                warn!("HEAD has no parent, using all history: {output}");
                Ok("HEAD".into())
            }
            Err(err) => Err(err),
        }
    }
}

/// Whether git failed only because `HEAD^` does not exist.
fn is_missing_parent(output: &str) -> bool {
    output.contains("Not a valid object name HEAD^")
        || output.contains("unknown revision")
}

impl Vcs for Git {
    fn commit_log(&self) -> Result<String> {
        let range = self.log_range()?;
        info!("collecting commits for range: {range}");
        self.git(args(["log", LOG_FORMAT, "--abbrev-commit", &range]))
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        let output = self.git(args(["tag", "-l", tag]))?;
        Ok(output.lines().any(|line| line.trim() == tag))
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        info!("committing: {message}");
        self.git(args(["commit", "-a", "-m", message]))?;
        Ok(())
    }

    fn create_annotated_tag(&self, tag: &str, message: &str) -> Result<()> {
        info!("tagging: {tag}");
        self.git(args(["tag", "-a", tag, "-m", message]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, process::Command};

    use super::*;
    use crate::{
        notes::parser::parse_log,
        process::{MockCommandRunner, SystemRunner},
    };

    fn sh(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo(dir: &Path) {
        sh(dir, &["init", "-q"]);
        sh(dir, &["config", "user.name", "Test"]);
        sh(dir, &["config", "user.email", "test@example.com"]);
        sh(dir, &["config", "commit.gpgsign", "false"]);
        sh(dir, &["config", "tag.gpgsign", "false"]);
    }

    fn add_commit(dir: &Path, file: &str, message: &str) {
        fs::write(dir.join(file), message).unwrap();
        sh(dir, &["add", file]);
        sh(dir, &["commit", "-q", "-m", message]);
    }

    fn git_for(dir: &Path) -> Git {
        Git::new(Rc::new(SystemRunner::new(dir)))
    }

    #[test_log::test]
    fn logs_commits_since_previous_tag() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        init_repo(dir);
        add_commit(dir, "a.txt", "Initial import");
        sh(dir, &["tag", "-a", "v0.1", "-m", "release: 0.1"]);
        add_commit(dir, "b.txt", "Add template helper\n\nFixes #3");
        add_commit(dir, "c.txt", "docs: update install guide");

        let git = git_for(dir);
        assert_eq!(git.previous_tag().unwrap(), "v0.1");

        let records = parse_log(&git.commit_log().unwrap()).unwrap();
        let subjects = records
            .iter()
            .map(|r| r.subject.as_str())
            .collect::<Vec<&str>>();

        assert_eq!(
            subjects,
            vec!["docs: update install guide", "Add template helper"]
        );
        assert_eq!(records[1].issues, vec![3]);
        assert_eq!(records[0].author_email, "test@example.com");
    }

    #[test_log::test]
    fn logs_without_any_tags() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        init_repo(dir);
        add_commit(dir, "a.txt", "First");
        add_commit(dir, "b.txt", "Second");
        add_commit(dir, "c.txt", "Third");

        let records = parse_log(&git_for(dir).commit_log().unwrap()).unwrap();
        // the range starts at HEAD^'s abbreviated id
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject, "Third");
    }

    #[test_log::test]
    fn logs_single_commit_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        init_repo(dir);
        add_commit(dir, "a.txt", "Only commit");

        let records = parse_log(&git_for(dir).commit_log().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject, "Only commit");
    }

    #[test]
    fn commits_and_tags() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        init_repo(dir);
        add_commit(dir, "VERSION", "0.20-DEV");

        let git = git_for(dir);
        assert!(!git.tag_exists("v0.21").unwrap());

        fs::write(dir.join("VERSION"), "0.21").unwrap();
        git.commit_all("release: Bump versions for release of 0.21")
            .unwrap();
        git.create_annotated_tag("v0.21", "release: 0.21").unwrap();

        assert!(git.tag_exists("v0.21").unwrap());
        assert!(!git.tag_exists("v0.2").unwrap());
    }

    #[test]
    fn commit_failure_surfaces_git_output() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        init_repo(dir);
        add_commit(dir, "a.txt", "First");

        // nothing modified
        let err = git_for(dir).commit_all("empty").unwrap_err();
        match err {
            ReleaseError::CommandFailed { command, args, .. } => {
                assert_eq!(command, "git");
                assert_eq!(args[0], "commit");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn describe_failure(output: &'static str) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, args| args[0] == "describe")
            .times(1)
            .returning(move |program, args| {
                Err(ReleaseError::CommandFailed {
                    command: program.to_string(),
                    args: args.to_vec(),
                    status: "exit status: 128".into(),
                    output: output.into(),
                })
            });
        runner
    }

    #[test_log::test]
    fn missing_parent_logs_from_head() {
        let mut runner = describe_failure("fatal: Not a valid object name HEAD^");
        runner
            .expect_run()
            .withf(|_, args| args[0] == "log" && args.last().unwrap() == "HEAD")
            .times(1)
            .returning(|_, _| Ok(String::new()));

        assert_eq!(Git::new(Rc::new(runner)).commit_log().unwrap(), "");
    }

    #[test]
    fn other_describe_failures_are_not_widened() {
        // a shallow clone or unreadable repository must not log everything
        let runner = describe_failure("fatal: unable to read tree 1a2b3c4");

        let err = Git::new(Rc::new(runner)).commit_log().unwrap_err();
        match err {
            ReleaseError::CommandFailed { args, output, .. } => {
                assert_eq!(args[0], "describe");
                assert!(output.contains("unable to read tree"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tag_check_requires_exact_match() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| {
                program == "git" && args == ["tag", "-l", "v1.2"]
            })
            .returning(|_, _| Ok("v1.2-rc\n".into()));

        let git = Git::new(Rc::new(runner));
        assert!(!git.tag_exists("v1.2").unwrap());
    }
}
