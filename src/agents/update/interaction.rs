use crate::error::{Result, UpdaterError};
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub const CONTINUE_PROMPT: &str = "Continue anyway? (y/N): ";

/// Ask whether to go on despite uncommitted changes. Only an explicit `y`
/// continues; anything else, including end of input, cancels the run.
pub fn confirm_continue() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_continue_with(&mut stdin.lock(), &mut stdout)
}

pub fn confirm_continue_with<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<()> {
    write!(out, "{}", CONTINUE_PROMPT.bold())?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if answer.trim().to_lowercase() == "y" {
        Ok(())
    } else {
        Err(UpdaterError::UserCancelled)
    }
}
