//! Runs external programs (git, the publish tool) to completion.
use log::*;
use std::{
    path::{Path, PathBuf},
    process::Command,
};

#[cfg(test)]
use mockall::automock;

use crate::error::{ReleaseError, Result};

/// Executes one external program and waits for it to finish.
#[cfg_attr(test, automock)]
pub trait CommandRunner {
    /// Run `program` with `args`, returning its stdout on success. A
    /// non-zero exit yields [`ReleaseError::CommandFailed`] carrying the
    /// combined stdout and stderr.
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs programs in a fixed working directory with the ambient environment.
pub struct SystemRunner {
    working_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        debug!("running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| ReleaseError::CommandFailed {
                command: program.to_string(),
                args: args.to_vec(),
                status: "failed to start".into(),
                output: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::CommandFailed {
                command: program.to_string(),
                args: args.to_vec(),
                status: output.status.to_string(),
                output: format!("{stdout}{stderr}").trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

/// Convert string literals to owned command arguments.
pub fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
