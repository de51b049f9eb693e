//! Repository host lookups used to enrich release notes.
//!
//! Provides the commit lookup trait, a GitHub REST implementation and the
//! enricher that fans lookups out over a commit range.

/// Connection settings for the repository host.
pub mod config;

/// Attaches remote metadata to parsed commits.
pub mod enricher;

/// GitHub REST client for GitHub.com and Enterprise.
pub mod github;

/// Common traits for host lookups.
pub mod traits;
