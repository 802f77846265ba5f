use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Where prompts come from for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// A single prompt passed on the command line; no loop.
    OneShot(String),
    /// Prompts read from stdin until end-of-input or `exit`.
    Interactive,
}

impl PromptSource {
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let joined = args.into_iter().collect::<Vec<_>>().join(" ");
        if joined.trim().is_empty() {
            Self::Interactive
        } else {
            Self::OneShot(joined)
        }
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(self, Self::OneShot(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveInput {
    Prompt(String),
    Blank,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Input is {actual} characters, longer than the {limit}-character limit; shorten it and try again.")]
pub struct InputTooLong {
    pub limit: usize,
    pub actual: usize,
}

pub fn check_length(prompt: &str, limit: usize) -> Result<(), InputTooLong> {
    let actual = prompt.chars().count();
    if actual > limit {
        return Err(InputTooLong { limit, actual });
    }
    Ok(())
}

pub fn read_interactive<R, W>(input: &mut R, out: &mut W, limit: usize) -> io::Result<InteractiveInput>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Enter the text to send (up to {limit} characters):")?;
    out.flush()?;

    // Bytes that are not UTF-8 are replaced rather than failing the session.
    let mut raw = Vec::new();
    if input.read_until(b'\n', &mut raw)? == 0 {
        return Ok(InteractiveInput::Quit);
    }

    let line = String::from_utf8_lossy(&raw);
    let prompt = line.trim_end_matches(['\r', '\n']);
    if prompt.trim().is_empty() {
        return Ok(InteractiveInput::Blank);
    }
    let command = prompt.trim();
    if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
        return Ok(InteractiveInput::Quit);
    }

    Ok(InteractiveInput::Prompt(prompt.to_string()))
}
