//! Release notes command implementation.
use log::*;

use crate::{
    cli::{Args, NotesArgs},
    command::common,
    error::Result,
    notes::writer::{write_to_docs, write_to_docs_temp},
    orchestrator::ReleaseRun,
};

/// Print release notes for the changes since the previous tag and, with
/// `--docs`, write them into the documentation tree.
pub async fn execute(args: &Args, notes_args: &NotesArgs) -> Result<()> {
    let config = common::load_configuration(args).await?;
    let (_, vcs) = common::system_collaborators(args);

    let pipeline = common::notes_pipeline(&config, vcs, notes_args.offline)?;
    let notes = pipeline.generate().await?;

    println!("{notes}");

    if !notes_args.docs {
        return Ok(());
    }

    let bumper = common::file_bumper(args, &config);
    let settings =
        common::release_settings(&config, &bumper, notes_args.patch, true)?;
    let planned = ReleaseRun::plan(&settings);

    let title = if notes_args.title.is_empty() {
        format!("Release {}", planned.target_version)
    } else {
        notes_args.title.clone()
    };

    let draft = write_to_docs_temp(&args.repo_path, &planned.tag_name, &notes)?;
    let published = write_to_docs(&args.repo_path, &title, &draft)?;

    info!("documentation release notes: {}", published.display());

    Ok(())
}
