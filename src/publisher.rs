//! Invokes the external tool that builds and publishes release artifacts.
use log::*;
use std::rc::Rc;

#[cfg(test)]
use mockall::automock;

use crate::{
    error::{ReleaseError, Result},
    process::CommandRunner,
};

/// Builds and publishes the artifacts for the tagged commit.
#[cfg_attr(test, automock)]
pub trait Publisher {
    fn publish(&self) -> Result<()>;
}

/// [`Publisher`] running a configured command line such as `goreleaser`.
pub struct CommandPublisher {
    runner: Rc<dyn CommandRunner>,
    command: String,
}

impl CommandPublisher {
    pub fn new(runner: Rc<dyn CommandRunner>, command: impl Into<String>) -> Self {
        Self {
            runner,
            command: command.into(),
        }
    }
}

impl Publisher for CommandPublisher {
    fn publish(&self) -> Result<()> {
        let mut parts = self.command.split_whitespace().map(String::from);

        let program = parts.next().ok_or_else(|| {
            ReleaseError::invalid_config("publish command is empty")
        })?;
        let args = parts.collect::<Vec<String>>();

        info!("publishing with {}", self.command);
        let output = self.runner.run(&program, &args)?;
        debug!("{program} output:\n{output}");

        Ok(())
    }
}
