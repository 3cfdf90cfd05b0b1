//! Read-resolve-print loop over the commands of a catalog.
//!
//! Each line is `command [arguments]`. The arguments are resolved against the
//! command's schema (parsed when valid, prompted for otherwise) and the
//! resulting value is printed as JSON.

use field_prompt_catalog::Catalog;
use field_prompt_core::{Autocomplete, PromptError, Terminal, resolve};
use tracing::{debug, info};

const BUILTINS: [&str; 4] = ["commands", "help", "quit", "exit"];

/// What the loop does after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'a, T: Terminal> {
    catalog: &'a Catalog,
    terminal: T,
    prompt: String,
}

impl<'a, T: Terminal> Repl<'a, T> {
    pub fn new(catalog: &'a Catalog, terminal: T, prompt: impl Into<String>) -> Self {
        Self {
            catalog,
            terminal,
            prompt: prompt.into(),
        }
    }

    /// Runs until `quit` or a cancelled top-level read.
    ///
    /// A cancelled prompt inside a command only abandons that command.
    pub fn run(&mut self) -> Result<(), PromptError> {
        let mut names: Vec<String> = self.catalog.commands().map(String::from).collect();
        names.extend(BUILTINS.map(String::from));
        let menu = Autocomplete::plain(names);

        loop {
            let line = match self.terminal.read_line(&self.prompt, Some(&menu)) {
                Ok(line) => line,
                Err(PromptError::Cancelled) => return Ok(()),
                Err(err) => return Err(err),
            };
            match self.handle(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(PromptError::Cancelled) => self.terminal.write_line("cancelled")?,
                Err(err) => return Err(err),
            }
        }
    }

    fn handle(&mut self, line: &str) -> Result<Flow, PromptError> {
        let line = line.trim();
        let (name, raw) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match name {
            "" => Ok(Flow::Continue),
            "quit" | "exit" => Ok(Flow::Quit),
            "help" => {
                self.help()?;
                Ok(Flow::Continue)
            }
            "commands" => {
                let names: Vec<&str> = self.catalog.commands().collect();
                self.terminal.write_line(&names.join("  "))?;
                Ok(Flow::Continue)
            }
            _ => {
                let Some(spec) = self.catalog.get(name) else {
                    debug!(command = name, "Unknown command");
                    self.terminal
                        .write_line(&format!("unknown command: {name} (try `help`)"))?;
                    return Ok(Flow::Continue);
                };
                let value = resolve(raw, &spec.schema, self.catalog.aspects(), &mut self.terminal)?;
                info!(command = name, "Resolved command arguments");
                self.terminal.write_line(&value.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    fn help(&mut self) -> Result<(), PromptError> {
        self.terminal.write_line(
            "usage: <command> [json arguments]; empty arguments prompt for every field",
        )?;
        for spec in self.catalog.specs() {
            let line = match &spec.description {
                Some(description) => format!("  {:<16} {description}", spec.name),
                None => format!("  {}", spec.name),
            };
            self.terminal.write_line(&line)?;
        }
        self.terminal
            .write_line("  commands / help / quit")
    }
}

#[cfg(test)]
mod tests {
    use field_prompt_catalog::{CatalogFormat, CommandSpec};
    use field_prompt_core::{FieldSchema, ScriptedTerminal};

    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::parse(r#"{"aspects": ["forge", "heart"]}"#, CatalogFormat::Json)
            .unwrap();
        catalog.insert(
            CommandSpec::new(
                "train",
                FieldSchema::object("train")
                    .with_field("stats", FieldSchema::aspect_map("stats"))
                    .with_field("days", FieldSchema::integer("days").with_min(1)),
            )
            .with_description("Spend days training"),
        );
        catalog.insert(CommandSpec::new("rest", FieldSchema::boolean("rest")));
        catalog
    }

    fn run(inputs: &[&str]) -> ScriptedTerminal {
        let catalog = catalog();
        let mut repl = Repl::new(&catalog, ScriptedTerminal::new(inputs.iter().copied()), "> ");
        repl.run().unwrap();
        repl.terminal
    }

    #[test]
    fn test_valid_arguments_print_json() {
        let terminal = run(&[r#"train {"stats": {"forge": 1}, "days": 2}"#, "quit"]);
        assert!(
            terminal
                .transcript()
                .contains(&r#"{"days":2,"stats":{"forge":1}}"#.to_string())
        );
        assert_eq!(terminal.remaining(), 0);
    }

    #[test]
    fn test_missing_arguments_prompt() {
        let terminal = run(&["rest", "y", "exit"]);
        assert!(terminal.transcript().contains(&"true".to_string()));
    }

    #[test]
    fn test_cancel_inside_command_keeps_loop_running() {
        let terminal = run(&["train", ScriptedTerminal::CANCEL, "commands", "quit"]);
        let transcript = terminal.transcript();
        assert!(transcript.contains(&"cancelled".to_string()));
        assert!(transcript.contains(&"rest  train".to_string()));
    }

    #[test]
    fn test_unknown_command_reported() {
        let terminal = run(&["fly", "quit"]);
        assert!(
            terminal
                .transcript()
                .contains(&"unknown command: fly (try `help`)".to_string())
        );
    }

    #[test]
    fn test_help_lists_descriptions() {
        let terminal = run(&["help"]);
        assert!(
            terminal
                .transcript()
                .iter()
                .any(|line| line.contains("train") && line.contains("Spend days training"))
        );
    }

    #[test]
    fn test_end_of_input_ends_loop() {
        let terminal = run(&["", ""]);
        assert_eq!(terminal.remaining(), 0);
    }
}
