//! Common functionality shared between commands
use log::*;
use secrecy::SecretString;
use std::{rc::Rc, time::Duration};

use crate::{
    cli::Args,
    config::Config,
    error::Result,
    forge::{
        config::{RemoteConfig, token_from_env},
        enricher::Enricher,
        github::GithubCommits,
    },
    git::{Git, Vcs},
    notes::{NotesPipeline, classify::Classifier, render::Renderer},
    orchestrator::ReleaseSettings,
    process::{CommandRunner, SystemRunner},
    updater::FileBumper,
};

/// Load `relcut.toml` (or the file passed with `--config`).
pub async fn load_configuration(args: &Args) -> Result<Config> {
    Config::load(&args.config_path()).await
}

/// Process runner and git access rooted at the repository.
pub fn system_collaborators(args: &Args) -> (Rc<dyn CommandRunner>, Rc<dyn Vcs>) {
    let runner: Rc<dyn CommandRunner> = Rc::new(SystemRunner::new(&args.repo_path));
    let vcs: Rc<dyn Vcs> = Rc::new(Git::new(Rc::clone(&runner)));
    (runner, vcs)
}

/// Version file bumper for the configured files.
pub fn file_bumper(args: &Args, config: &Config) -> FileBumper {
    FileBumper::new(
        &args.repo_path,
        config.version.clone(),
        config.version_files.clone(),
    )
}

/// Resolve the remote repository, if one is configured.
pub fn remote_config(config: &Config) -> Result<Option<RemoteConfig>> {
    if config.repository.url.is_empty() {
        return Ok(None);
    }

    let remote = RemoteConfig::from_repository(
        &config.repository,
        Duration::from_secs(config.notes.timeout_secs),
    )?;

    debug!(
        "remote repository: {}/{} via {}",
        remote.owner, remote.repo, remote.api_base
    );

    Ok(Some(remote))
}

/// Build the release notes pipeline. Remote lookups run only when a
/// repository is configured and `offline` is not set.
pub fn notes_pipeline(
    config: &Config,
    vcs: Rc<dyn Vcs>,
    offline: bool,
) -> Result<NotesPipeline> {
    let remote = remote_config(config)?;

    let issue_base_url = match &remote {
        Some(remote) => remote.issue_base_url.clone(),
        None => config.repository.issue_base_url.clone(),
    };

    let enricher = match remote {
        Some(remote) if !offline => Some(Enricher::new(
            Box::new(GithubCommits::new(&remote)?),
            config.notes.concurrency,
        )),
        Some(_) => {
            info!("offline: skipping remote commit lookups");
            None
        }
        None => {
            info!("no repository url configured: skipping remote commit lookups");
            None
        }
    };

    Ok(NotesPipeline::new(
        vcs,
        enricher,
        Classifier::new(&config.classification)?,
        Renderer::new(&config.notes.template, issue_base_url)?,
    ))
}

/// Release settings from configuration and the environment.
pub fn release_settings(
    config: &Config,
    bumper: &FileBumper,
    patch_level: u64,
    dry_run: bool,
) -> Result<ReleaseSettings> {
    Ok(ReleaseSettings {
        current_version: bumper.current_version()?,
        patch_level,
        tag_prefix: config.tag_prefix.clone(),
        dev_suffix: config.dev_suffix.clone(),
        credential_env: config.publish.credential_env.clone(),
        credential: token_from_env(&config.publish.credential_env)
            .map(SecretString::from),
        dry_run,
    })
}
