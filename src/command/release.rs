//! Release command implementation.
use log::*;
use std::rc::Rc;

use crate::{
    cli::{Args, ReleaseArgs},
    command::common,
    error::Result,
    orchestrator::Orchestrator,
    prompt::{Prompt, StdinPrompt},
    publisher::{CommandPublisher, Publisher},
    updater::VersionBumper,
};

/// Execute the release workflow: tag the next version, optionally publish
/// it, then move the repository to the following development version.
pub async fn execute(args: &Args, release: &ReleaseArgs) -> Result<()> {
    let config = common::load_configuration(args).await?;
    let (runner, vcs) = common::system_collaborators(args);

    let bumper = common::file_bumper(args, &config);
    let settings = common::release_settings(
        &config,
        &bumper,
        release.patch,
        release.dry_run,
    )?;

    let notes = common::notes_pipeline(&config, Rc::clone(&vcs), release.offline)?;

    let bumper: Rc<dyn VersionBumper> = Rc::new(bumper);
    let publisher: Rc<dyn Publisher> =
        Rc::new(CommandPublisher::new(runner, config.publish.command.clone()));
    let prompt: Rc<dyn Prompt> = Rc::new(StdinPrompt);

    let run = Orchestrator::builder()
        .settings(settings)
        .vcs(vcs)
        .bumper(bumper)
        .publisher(publisher)
        .prompt(prompt)
        .notes(notes)
        .build()?
        .run()
        .await?;

    if let Some(path) = &run.notes_path {
        info!("release notes for {}: {}", run.tag_name, path.display());
    }

    if release.dry_run {
        info!(
            "dry run: would release {} and move to {}",
            run.target_version, run.post_release_version
        );
    } else if !run.published {
        warn!("{} was tagged but not published", run.tag_name);
    }

    Ok(())
}
