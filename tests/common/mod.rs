//! Shared fixtures for integration tests.
use std::{fs, path::Path, process::Command};

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
}

pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    git(dir, &["add", file]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// A repository tagged `v0.20` followed by a fix, a template feature and a
/// docs change.
pub fn site_repo(dir: &Path) {
    init_repo(dir);
    commit_file(dir, "VERSION", "0.20\n", "release: 0.20");
    git(dir, &["tag", "-a", "v0.20", "-m", "release: 0.20"]);
    commit_file(
        dir,
        "src/parse.rs",
        "fn parse() {}\n",
        "fix: crash on empty input\n\nFixes #3",
    );
    commit_file(
        dir,
        "tpl/helpers.rs",
        "fn helper() {}\n",
        "feat: add template helper",
    );
    commit_file(
        dir,
        "docs/install.md",
        "# Install\n",
        "docs: update install guide",
    );
}
