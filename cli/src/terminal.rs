//! Line-editor backed [`Terminal`] with per-field tab completion.

use std::io::Write;

use field_prompt_core::{
    Autocomplete, Completion, PromptError, Terminal, parse_yes_no, yes_no_hint,
};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, EditMode, Editor, Helper};
use tracing::debug;

/// Moves the cursor up one line and erases it.
const ERASE_PREVIOUS_LINE: &str = "\x1b[1A\x1b[2K\r";

/// Terminal reading through rustyline.
///
/// Ctrl-C and Ctrl-D cancel the current read.
pub struct RustylineTerminal {
    editor: Editor<FieldHelper, DefaultHistory>,
}

impl RustylineTerminal {
    pub fn new() -> Result<Self, PromptError> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();
        let mut editor = Editor::with_config(config).map_err(readline_error)?;
        editor.set_helper(Some(FieldHelper::default()));
        Ok(Self { editor })
    }

    fn readline(
        &mut self,
        prompt: &str,
        autocomplete: Option<&Autocomplete>,
    ) -> Result<String, PromptError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.autocomplete = autocomplete.cloned();
        }
        let line = self.editor.readline(prompt).map_err(readline_error)?;
        self.remember(&line);
        Ok(line)
    }

    /// Adds a non-blank line to the history. A history failure never fails
    /// the read.
    fn remember(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Err(err) = self.editor.add_history_entry(line) {
            debug!(error = %err, "Failed to record history entry");
        }
    }
}

impl Terminal for RustylineTerminal {
    fn write_line(&mut self, text: &str) -> Result<(), PromptError> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(
        &mut self,
        prompt: &str,
        autocomplete: Option<&Autocomplete>,
    ) -> Result<String, PromptError> {
        self.readline(prompt, autocomplete)
    }

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> Result<bool, PromptError> {
        let question = format!("{prompt} {} ", yes_no_hint(default));
        loop {
            let answer = self.readline(&question, None)?;
            if let Some(yes) = parse_yes_no(&answer, default) {
                return Ok(yes);
            }
            self.clear_lines(1)?;
        }
    }

    fn clear_lines(&mut self, count: usize) -> Result<(), PromptError> {
        let mut stdout = std::io::stdout();
        for _ in 0..count {
            stdout.write_all(ERASE_PREVIOUS_LINE.as_bytes())?;
        }
        stdout.flush()?;
        Ok(())
    }
}

fn readline_error(err: ReadlineError) -> PromptError {
    match err {
        ReadlineError::Interrupted | ReadlineError::Eof => PromptError::Cancelled,
        ReadlineError::Io(err) => PromptError::IoError(err),
        other => PromptError::Terminal(other.to_string()),
    }
}

/// Completes the whole line against the active field's options.
#[derive(Default)]
struct FieldHelper {
    autocomplete: Option<Autocomplete>,
}

impl FieldHelper {
    fn candidates(&self, input: &str) -> Vec<String> {
        let Some(autocomplete) = &self.autocomplete else {
            return Vec::new();
        };
        if input.is_empty() {
            return autocomplete.options().to_vec();
        }
        match autocomplete.complete(input) {
            Completion::Complete(completed) if completed != input => vec![completed],
            Completion::Complete(_) => Vec::new(),
            Completion::Ambiguous(candidates) => candidates,
        }
    }
}

impl Helper for FieldHelper {}

impl Completer for FieldHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let matches = self
            .candidates(&line[..pos])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for FieldHelper {
    type Hint = String;
}

impl Highlighter for FieldHelper {}

impl Validator for FieldHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper(options: &[&str], delimiter: Option<&str>) -> FieldHelper {
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        FieldHelper {
            autocomplete: Some(Autocomplete::for_options(&options, delimiter).unwrap()),
        }
    }

    #[test]
    fn test_candidates_without_autocomplete() {
        assert!(FieldHelper::default().candidates("any").is_empty());
    }

    #[test]
    fn test_candidates_for_empty_input_lists_options() {
        let helper = helper(&["bread", "corn"], None);
        assert_eq!(helper.candidates(""), ["bread", "corn"]);
    }

    #[test]
    fn test_candidates_segment_completion() {
        let helper = helper(&["s.forge", "s.heart", "skill.forge"], Some(r"\."));
        assert_eq!(helper.candidates("s"), ["s.", "skill."]);
        assert_eq!(helper.candidates("sk"), ["skill.forge"]);
        assert!(helper.candidates("skill.forge").is_empty());
    }

    #[test]
    fn test_remember_skips_blank_lines() {
        use rustyline::history::History;

        let mut terminal = RustylineTerminal::new().unwrap();
        terminal.remember("study");
        terminal.remember("   ");
        terminal.remember("");
        assert_eq!(terminal.editor.history().len(), 1);
    }

    #[test]
    fn test_readline_errors_map_to_cancel() {
        assert!(matches!(
            readline_error(ReadlineError::Interrupted),
            PromptError::Cancelled
        ));
        assert!(matches!(readline_error(ReadlineError::Eof), PromptError::Cancelled));
    }
}
