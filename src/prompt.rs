//! Interactive yes/no confirmation on the terminal.
use log::*;
use std::io::{self, BufRead, Write};

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// Attempts before an unanswered question counts as "no".
pub const MAX_ATTEMPTS: usize = 10;

/// Asks the operator to confirm a step.
#[cfg_attr(test, automock)]
pub trait Prompt {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Reads answers from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        confirm_from(question, &mut stdin.lock(), &mut stdout.lock(), MAX_ATTEMPTS)
    }
}

/// Ask `question` up to `attempts` times. Blank answers are asked again;
/// an answer starting with `y` or `Y` is yes, anything else is no. Running
/// out of attempts or input is no.
pub fn confirm_from<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
    attempts: usize,
) -> Result<bool> {
    for _ in 0..attempts {
        write!(output, "{question} [y/n]: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            warn!("no answer to {question:?}: assuming no");
            return Ok(false);
        }

        if let Some(c) = answer.trim().chars().next() {
            return Ok(c.eq_ignore_ascii_case(&'y'));
        }
    }

    warn!("no answer to {question:?} after {attempts} attempts: assuming no");
    Ok(false)
}
