//! Line-oriented terminal port used by interactive construction.
//!
//! The constructor only ever blocks on [`Terminal`] reads, so one
//! implementation drives a real line editor and another replays a script for
//! tests. Every call occupies exactly one screen line: implementations that
//! re-ask an unanswerable yes/no question reuse the same line.

use std::collections::VecDeque;

use crate::autocomplete::Autocomplete;
use crate::error::PromptError;

/// Blocking, single-threaded terminal abstraction.
pub trait Terminal {
    /// Writes one line of output.
    fn write_line(&mut self, text: &str) -> Result<(), PromptError>;

    /// Reads one line, offering completions from `autocomplete` when given.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Cancelled`] when the operator cancels the read.
    fn read_line(
        &mut self,
        prompt: &str,
        autocomplete: Option<&Autocomplete>,
    ) -> Result<String, PromptError>;

    /// Asks a yes/no question. An empty answer selects `default` when set;
    /// otherwise the question is asked again.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Cancelled`] when the operator cancels the read.
    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> Result<bool, PromptError>;

    /// Erases the last `count` lines written or read.
    fn clear_lines(&mut self, count: usize) -> Result<(), PromptError>;
}

/// Interprets a yes/no answer.
///
/// # Examples
///
/// ```
/// use field_prompt_core::parse_yes_no;
///
/// assert_eq!(parse_yes_no("Y", None), Some(true));
/// assert_eq!(parse_yes_no("no", None), Some(false));
/// assert_eq!(parse_yes_no("", Some(false)), Some(false));
/// assert_eq!(parse_yes_no("", None), None);
/// assert_eq!(parse_yes_no("maybe", Some(true)), None);
/// ```
pub fn parse_yes_no(answer: &str, default: Option<bool>) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Renders the answer hint of a yes/no question; the default's letter is
/// capitalised.
pub fn yes_no_hint(default: Option<bool>) -> &'static str {
    match default {
        Some(true) => "(Y/n)",
        Some(false) => "(y/N)",
        None => "(y/n)",
    }
}

/// Terminal replaying scripted input lines.
///
/// Output is kept on a simulated screen (which [`clear_lines`] erases from)
/// and in a full transcript. A line equal to [`CANCEL`](Self::CANCEL), or
/// running out of script, cancels the read.
///
/// # Examples
///
/// ```
/// use field_prompt_core::{ScriptedTerminal, Terminal};
///
/// let mut terminal = ScriptedTerminal::new(["", "y"]);
/// assert!(terminal.confirm("Continue?", None).unwrap());
/// assert_eq!(terminal.screen(), ["Continue? (y/n) y"]);
/// assert!(terminal.read_line("> ", None).is_err());
/// ```
///
/// [`clear_lines`]: Terminal::clear_lines
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    inputs: VecDeque<String>,
    screen: Vec<String>,
    transcript: Vec<String>,
}

impl ScriptedTerminal {
    /// Input line that simulates operator cancellation.
    pub const CANCEL: &'static str = "^C";

    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            screen: Vec::new(),
            transcript: Vec::new(),
        }
    }

    /// Lines currently visible.
    pub fn screen(&self) -> &[String] {
        &self.screen
    }

    /// Every line ever written or read, including cleared ones.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of scripted lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    fn next_input(&mut self) -> Result<String, PromptError> {
        match self.inputs.pop_front() {
            Some(line) if line == Self::CANCEL => Err(PromptError::Cancelled),
            Some(line) => Ok(line),
            None => Err(PromptError::Cancelled),
        }
    }

    fn show(&mut self, line: String) {
        self.transcript.push(line.clone());
        self.screen.push(line);
    }
}

impl Terminal for ScriptedTerminal {
    fn write_line(&mut self, text: &str) -> Result<(), PromptError> {
        self.show(text.to_string());
        Ok(())
    }

    fn read_line(
        &mut self,
        prompt: &str,
        _autocomplete: Option<&Autocomplete>,
    ) -> Result<String, PromptError> {
        let line = self.next_input()?;
        self.show(format!("{prompt}{line}"));
        Ok(line)
    }

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> Result<bool, PromptError> {
        loop {
            let answer = self.next_input()?;
            if let Some(yes) = parse_yes_no(&answer, default) {
                self.show(format!("{prompt} {} {answer}", yes_no_hint(default)));
                return Ok(yes);
            }
            self.transcript
                .push(format!("{prompt} {} {answer}", yes_no_hint(default)));
        }
    }

    fn clear_lines(&mut self, count: usize) -> Result<(), PromptError> {
        let keep = self.screen.len().saturating_sub(count);
        self.screen.truncate(keep);
        Ok(())
    }
}
