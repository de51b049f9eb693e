//! Release notes generation.
//!
//! Turns the commit range since the previous tag into categorized markdown:
//! parse the log, look up remote metadata, classify, then render.
use log::*;
use std::rc::Rc;

use crate::{
    error::Result,
    forge::enricher::Enricher,
    git::Vcs,
    notes::{
        classify::{ChangeLog, Classifier},
        parser::parse_log,
        render::Renderer,
    },
};

/// Section and category classification.
pub mod classify;

/// Commit record types.
pub mod commit;

/// Issue reference extraction from commit bodies.
pub mod issues;

/// Delimited `git log` parsing.
pub mod parser;

/// Tera rendering of classified changes.
pub mod render;

/// Persisting rendered notes.
pub mod writer;

/// Everything needed to produce release notes for the current range.
pub struct NotesPipeline {
    vcs: Rc<dyn Vcs>,
    enricher: Option<Enricher>,
    classifier: Classifier,
    renderer: Renderer,
}

impl NotesPipeline {
    /// Build a pipeline. Without an enricher every record keeps
    /// `remote = None`.
    pub fn new(
        vcs: Rc<dyn Vcs>,
        enricher: Option<Enricher>,
        classifier: Classifier,
        renderer: Renderer,
    ) -> Self {
        Self {
            vcs,
            enricher,
            classifier,
            renderer,
        }
    }

    /// Classified changes since the previous tag.
    pub async fn changelog(&self) -> Result<ChangeLog> {
        let raw = self.vcs.commit_log()?;
        let records = parse_log(&raw)?;
        info!("found {} commits since previous tag", records.len());

        let records = match &self.enricher {
            Some(enricher) => enricher.enrich(records).await,
            None => {
                debug!("remote lookups disabled");
                records
            }
        };

        Ok(self.classifier.classify(records))
    }

    /// Rendered release notes for the changes since the previous tag.
    pub async fn generate(&self) -> Result<String> {
        let changelog = self.changelog().await?;
        self.renderer.render(&changelog)
    }
}
