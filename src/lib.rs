//! Cut project releases from git history.
//!
//! Drafts categorized release notes from the commits since the previous
//! tag, bumps the version embedded in the repository, tags the release,
//! hands off to an external build tool and prepares the next development
//! version.
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod notes;
pub mod orchestrator;
pub mod process;
pub mod prompt;
pub mod publisher;
pub mod updater;
pub mod version;

pub use error::{ReleaseError, Result};
