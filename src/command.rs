//! Command execution for relcut.
//!
//! Each subcommand wires the configured collaborators together and hands
//! them to the notes pipeline or the release orchestrator:
//!
//! - **common**: configuration loading and collaborator construction
//! - **release**: cut, tag and publish a release
//! - **notes**: generate release notes without releasing

/// Shared setup used by every command.
pub mod common;

/// Release notes generation without any repository mutation.
pub mod notes;

/// The full release workflow.
pub mod release;
