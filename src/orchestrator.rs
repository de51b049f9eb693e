//! Release state machine: sequences the checks, repository mutations and
//! the external build that make up one release.
use derive_builder::Builder;
use log::*;
use secrecy::SecretString;
use std::{fmt::Display, path::PathBuf, rc::Rc};

use crate::{
    error::{ReleaseError, Result},
    git::Vcs,
    notes::{NotesPipeline, writer::write_to_temp_file},
    prompt::Prompt,
    publisher::Publisher,
    updater::VersionBumper,
    version::ReleaseVersion,
};

/// Question asked before the build collaborator runs.
pub const PUBLISH_QUESTION: &str = "Release to GitHub?";

/// One state of a release run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    TagCheck,
    ReleaseNotes,
    BumpToRelease,
    CommitRelease,
    Tag,
    ConfirmBuild,
    Build,
    BumpToNext,
    CommitNext,
    Done,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::TagCheck => "tag check",
            Phase::ReleaseNotes => "release notes",
            Phase::BumpToRelease => "bump to release version",
            Phase::CommitRelease => "commit release version",
            Phase::Tag => "tag",
            Phase::ConfirmBuild => "confirm build",
            Phase::Build => "build",
            Phase::BumpToNext => "bump to next version",
            Phase::CommitNext => "commit next version",
            Phase::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Inputs of a release run that do not change while it executes.
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
    /// Version the repository is at before the run.
    pub current_version: ReleaseVersion,
    /// Patch level to release; zero cuts the next main release.
    pub patch_level: u64,
    pub tag_prefix: String,
    pub dev_suffix: String,
    /// Name of the environment variable the credential comes from.
    pub credential_env: String,
    /// Credential the build collaborator publishes with.
    pub credential: Option<SecretString>,
    /// Stop after drafting release notes.
    pub dry_run: bool,
}

/// State of one release invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRun {
    pub current_version: ReleaseVersion,
    pub target_version: ReleaseVersion,
    pub post_release_version: ReleaseVersion,
    pub tag_name: String,
    pub phase: Phase,
    /// Where the draft release notes were written.
    pub notes_path: Option<PathBuf>,
    /// Every phase entered, in order.
    pub history: Vec<Phase>,
    /// Whether the build collaborator ran.
    pub published: bool,
}

impl ReleaseRun {
    /// Plan the versions and tag for a run starting from `settings`.
    pub fn plan(settings: &ReleaseSettings) -> Self {
        let current = settings.current_version.clone();

        let (target, post) = if settings.patch_level > 0 {
            (current.next_patch_level(settings.patch_level), current.clone())
        } else {
            let target = current.next();
            let post = target.with_suffix(settings.dev_suffix.clone());
            (target, post)
        };

        Self {
            tag_name: format!("{}{}", settings.tag_prefix, target),
            current_version: current,
            target_version: target,
            post_release_version: post,
            phase: Phase::Start,
            notes_path: None,
            history: vec![],
            published: false,
        }
    }
}

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub settings: ReleaseSettings,
    pub vcs: Rc<dyn Vcs>,
    pub bumper: Rc<dyn VersionBumper>,
    pub publisher: Rc<dyn Publisher>,
    pub prompt: Rc<dyn Prompt>,
    #[builder(default, setter(into, strip_option))]
    pub notes: Option<Rc<NotesPipeline>>,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            ReleaseError::invalid_config(format!(
                "Failed to build release orchestrator: {}",
                e
            ))
        })?;
        Ok(Orchestrator::new(params))
    }
}

/// Drives a [`ReleaseRun`] from [`Phase::Start`] to [`Phase::Done`].
pub struct Orchestrator {
    settings: ReleaseSettings,
    vcs: Rc<dyn Vcs>,
    bumper: Rc<dyn VersionBumper>,
    publisher: Rc<dyn Publisher>,
    prompt: Rc<dyn Prompt>,
    notes: Option<Rc<NotesPipeline>>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            settings: params.settings,
            vcs: params.vcs,
            bumper: params.bumper,
            publisher: params.publisher,
            prompt: params.prompt,
            notes: params.notes,
        }
    }

    /// Run every phase in order. A failure stops the run where it happened
    /// and is returned as [`ReleaseError::Aborted`] naming that phase;
    /// nothing already done is rolled back.
    pub async fn run(&self) -> Result<ReleaseRun> {
        let mut run = ReleaseRun::plan(&self.settings);

        info!(
            "releasing {} as {} (next: {})",
            run.current_version, run.target_version, run.post_release_version
        );

        loop {
            let phase = run.phase;
            run.history.push(phase);

            if phase == Phase::Done {
                break;
            }

            info!("phase: {phase}");
            run.phase = self.step(&mut run).await.map_err(|e| e.during(phase))?;
        }

        info!("release of {} complete", run.tag_name);

        Ok(run)
    }

    /// Execute the current phase and return the one to enter next.
    pub async fn step(&self, run: &mut ReleaseRun) -> Result<Phase> {
        match run.phase {
            Phase::Start => {
                if self.settings.dry_run {
                    debug!("dry run: skipping credential check");
                } else if self.settings.credential.is_none() {
                    return Err(ReleaseError::MissingCredential(
                        self.settings.credential_env.clone(),
                    ));
                }
                Ok(Phase::TagCheck)
            }
            Phase::TagCheck => {
                if self.vcs.tag_exists(&run.tag_name)? {
                    return Err(ReleaseError::TagExists(run.tag_name.clone()));
                }
                Ok(Phase::ReleaseNotes)
            }
            Phase::ReleaseNotes => {
                if let Some(pipeline) = &self.notes {
                    let notes = pipeline.generate().await?;
                    let path = write_to_temp_file(&notes)?;
                    info!("release notes drafted: {}", path.display());
                    run.notes_path = Some(path);
                }

                if self.settings.dry_run {
                    info!("dry run: stopping before any repository change");
                    return Ok(Phase::Done);
                }

                Ok(Phase::BumpToRelease)
            }
            Phase::BumpToRelease => {
                self.bumper.bump(&run.target_version)?;
                Ok(Phase::CommitRelease)
            }
            Phase::CommitRelease => {
                self.vcs.commit_all(&format!(
                    "release: Bump versions for release of {}",
                    run.target_version
                ))?;
                Ok(Phase::Tag)
            }
            Phase::Tag => {
                self.vcs.create_annotated_tag(
                    &run.tag_name,
                    &format!("release: {}", run.target_version),
                )?;
                Ok(Phase::ConfirmBuild)
            }
            Phase::ConfirmBuild => {
                if self.prompt.confirm(PUBLISH_QUESTION)? {
                    return Ok(Phase::Build);
                }
                info!("publish declined: {} stays local", run.tag_name);
                Ok(Phase::BumpToNext)
            }
            Phase::Build => {
                self.publisher.publish()?;
                run.published = true;
                Ok(Phase::BumpToNext)
            }
            Phase::BumpToNext => {
                self.bumper.bump(&run.post_release_version)?;
                Ok(Phase::CommitNext)
            }
            Phase::CommitNext => {
                self.vcs.commit_all(&format!(
                    "release: Prepare repository for {}",
                    run.post_release_version
                ))?;
                Ok(Phase::Done)
            }
            Phase::Done => Ok(Phase::Done),
        }
    }
}
