//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Global CLI arguments shared by every subcommand.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Configuration file. Relative paths resolve against --repo-path.
    pub config: PathBuf,

    #[arg(long, default_value = ".", global = true)]
    /// Repository to release.
    pub repo_path: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tag a new release, publish it and prepare the next development
    /// version.
    Release(ReleaseArgs),

    /// Generate release notes for the changes since the previous tag.
    Notes(NotesArgs),
}

/// Options of the `release` subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ReleaseArgs {
    #[arg(short, long, default_value_t = 0)]
    /// Release this patch level of the current version instead of the next
    /// main version.
    pub patch: u64,

    #[arg(long, default_value_t = false)]
    /// Draft release notes and stop before changing anything.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Skip remote commit lookups.
    pub offline: bool,
}

/// Options of the `notes` subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct NotesArgs {
    #[arg(short, long, default_value_t = 0)]
    /// Patch level used to name the upcoming release.
    pub patch: u64,

    #[arg(long, default_value_t = false)]
    /// Also write the notes into the documentation tree.
    pub docs: bool,

    #[arg(long, default_value = "")]
    /// Title for the documentation page. Defaults to "Release <version>".
    pub title: String,

    #[arg(long, default_value_t = false)]
    /// Skip remote commit lookups.
    pub offline: bool,
}

impl Args {
    /// Configuration file location with relative paths anchored at the
    /// repository.
    pub fn config_path(&self) -> PathBuf {
        if self.config.is_absolute() {
            return self.config.clone();
        }
        self.repo_path.join(&self.config)
    }
}
