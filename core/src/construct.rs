//! Interactive, field-by-field construction of a value for a schema.
//!
//! [`construct`] is a recursive state machine with one case per
//! [`FieldKind`]. Every field follows the same protocol:
//!
//! 1. An optional field first asks whether to skip it; skipping yields
//!    `Value::Null`.
//! 2. The variant's prompt loop runs, rendering the partial value of
//!    collections before every prompt.
//! 3. The transient lines of the field are cleared and one
//!    `name: value` line is left in their place.
//!
//! Bounds are preconditions for committing a value, so the result always
//! satisfies its schema. A cancelled read aborts the whole construction with
//! [`PromptError::Cancelled`].

use serde_json::{Map, Value};
use tracing::debug;

use crate::aspects::{AspectRegistry, aspect_autocomplete};
use crate::autocomplete::{Autocomplete, Completion};
use crate::error::PromptError;
use crate::terminal::Terminal;
use crate::types::{
    ArrayOptions, AspectMapOptions, BooleanOptions, FieldKind, FieldSchema, IntegerOptions,
    ObjectOptions, StringOptions, StringSetOptions,
};
use crate::value::{MAX_SAFE_INTEGER, as_safe_integer, render_value};

/// Builds a value for `schema` by prompting on `terminal`.
///
/// # Errors
///
/// Returns [`PromptError::Cancelled`] if the operator cancels any read, or
/// [`PromptError::Terminal`] / [`PromptError::IoError`] if the terminal fails.
///
/// # Panics
///
/// Panics if a string field declares an invalid delimiter pattern; catalogs
/// rule this out with [`FieldSchema::check_delimiters`].
///
/// # Examples
///
/// ```
/// use field_prompt_core::*;
/// use serde_json::json;
///
/// let aspects = AspectSet::new();
/// let schema = FieldSchema::object("hero")
///     .with_field("name", FieldSchema::string("name"))
///     .with_field("level", FieldSchema::integer("level").with_min(1).with_max(99));
///
/// let mut terminal = ScriptedTerminal::new(["Ana", "0", "12"]);
/// let value = construct(&schema, &aspects, &mut terminal).unwrap();
/// assert_eq!(value, json!({ "name": "Ana", "level": 12 }));
/// assert_eq!(terminal.screen(), ["hero: {level: 12, name: Ana}"]);
/// ```
pub fn construct(
    schema: &FieldSchema,
    aspects: &dyn AspectRegistry,
    terminal: &mut dyn Terminal,
) -> Result<Value, PromptError> {
    Constructor::new(aspects, terminal).field(schema)
}

/// Prompt loop state shared across the recursion: the capability objects
/// and the number of lines on screen since construction started.
struct Constructor<'a> {
    aspects: &'a dyn AspectRegistry,
    terminal: &'a mut dyn Terminal,
    lines: usize,
}

impl<'a> Constructor<'a> {
    fn new(aspects: &'a dyn AspectRegistry, terminal: &'a mut dyn Terminal) -> Self {
        Self {
            aspects,
            terminal,
            lines: 0,
        }
    }

    fn write(&mut self, text: &str) -> Result<(), PromptError> {
        self.terminal.write_line(text)?;
        self.lines += 1;
        Ok(())
    }

    fn read(
        &mut self,
        prompt: &str,
        autocomplete: Option<&Autocomplete>,
    ) -> Result<String, PromptError> {
        let line = self.terminal.read_line(prompt, autocomplete)?;
        self.lines += 1;
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> Result<bool, PromptError> {
        let answer = self.terminal.confirm(prompt, default)?;
        self.lines += 1;
        Ok(answer)
    }

    fn field(&mut self, schema: &FieldSchema) -> Result<Value, PromptError> {
        let mark = self.lines;
        debug!(field = %schema.name, kind = schema.kind.type_name(), "Constructing field");

        if !schema.required && self.confirm(&format!("Skip {}?", schema.name), Some(false))? {
            self.commit(mark, &schema.name, &Value::Null)?;
            return Ok(Value::Null);
        }

        let value = match &schema.kind {
            FieldKind::String(options) => self.string(&schema.name, options)?,
            FieldKind::StringSet(options) => self.string_set(&schema.name, options)?,
            FieldKind::Integer(options) => Value::from(self.integer(&schema.name, options)?),
            FieldKind::Boolean(options) => self.boolean(&schema.name, options)?,
            FieldKind::AspectMap(options) => self.aspect_map(&schema.name, options)?,
            FieldKind::Object(options) => self.object(options)?,
            FieldKind::Array(options) => self.array(&schema.name, options)?,
        };

        self.commit(mark, &schema.name, &value)?;
        debug!(field = %schema.name, "Committed field");
        Ok(value)
    }

    /// Replaces everything shown since `mark` with the committed value.
    fn commit(&mut self, mark: usize, name: &str, value: &Value) -> Result<(), PromptError> {
        self.terminal.clear_lines(self.lines.saturating_sub(mark))?;
        self.lines = mark;
        self.write(&format!("{name}: {}", render_value(value)))
    }

    fn string(&mut self, name: &str, options: &StringOptions) -> Result<Value, PromptError> {
        let autocomplete = field_autocomplete(&options.autocomplete, options.delimiter.as_deref());
        let prompt = match &options.default {
            Some(default) => format!("{name} [{default}]> "),
            None => format!("{name}> "),
        };

        loop {
            let line = self.read(&prompt, Some(&autocomplete))?;
            if line.is_empty() {
                match &options.default {
                    Some(default) => return Ok(Value::String(default.clone())),
                    None => continue,
                }
            }
            if let Some(choice) = self.choose(&line, &autocomplete, options.strict)? {
                return Ok(Value::String(choice));
            }
        }
    }

    /// Maps an entered line onto the field's options.
    ///
    /// A loose field takes the line as typed, only adopting the declared
    /// spelling of an option it matches exactly. A strict field completes the
    /// line and returns `None` (after telling the operator why) when it has
    /// to be entered again.
    fn choose(
        &mut self,
        line: &str,
        autocomplete: &Autocomplete,
        strict: bool,
    ) -> Result<Option<String>, PromptError> {
        if let Some(option) = autocomplete.member(line) {
            return Ok(Some(option.to_string()));
        }
        if !strict {
            return Ok(Some(line.to_string()));
        }
        if autocomplete.is_empty() {
            return Ok(None);
        }

        match autocomplete.complete(line) {
            Completion::Ambiguous(candidates) => {
                self.write(&candidates.join("  "))?;
                Ok(None)
            }
            Completion::Complete(completed) => match autocomplete.member(&completed) {
                Some(option) => Ok(Some(option.to_string())),
                None => {
                    self.write(&format!("{line} is not one of the available options"))?;
                    Ok(None)
                }
            },
        }
    }

    fn boolean(&mut self, name: &str, options: &BooleanOptions) -> Result<Value, PromptError> {
        let answer = self.confirm(&format!("{name}?"), options.default)?;
        Ok(Value::Bool(answer))
    }

    /// Reads an integer within bounds. Malformed or out-of-range input is
    /// rejected by asking again, without a message.
    fn integer(&mut self, name: &str, options: &IntegerOptions) -> Result<i64, PromptError> {
        let prompt = integer_prompt(name, options);
        loop {
            let line = self.read(&prompt, None)?;
            if line.is_empty() {
                match options.default {
                    Some(default) => return Ok(default),
                    None => continue,
                }
            }
            let Ok(n) = line.parse::<i64>() else {
                continue;
            };
            if n.unsigned_abs() <= MAX_SAFE_INTEGER as u64 && options.contains(n) {
                return Ok(n);
            }
        }
    }

    /// Each accepted entry toggles membership; an empty line commits once
    /// the set is large enough.
    fn string_set(&mut self, name: &str, options: &StringSetOptions) -> Result<Value, PromptError> {
        let autocomplete = field_autocomplete(&options.autocomplete, options.delimiter.as_deref());
        let min = options.min_count.unwrap_or(0);
        let max = options.max_count.unwrap_or(usize::MAX);
        let mut members: Vec<String> = options.default.clone().unwrap_or_default();

        loop {
            self.write(&format!("{name}: {}", render_value(&Value::from(members.clone()))))?;
            let prompt = collection_prompt(name, members.len() >= min);
            let line = self.read(&prompt, Some(&autocomplete))?;
            if line.is_empty() {
                if members.len() >= min {
                    return Ok(Value::from(members));
                }
                continue;
            }

            let Some(entry) = self.choose(&line, &autocomplete, options.strict)? else {
                continue;
            };
            if let Some(position) = members.iter().position(|member| *member == entry) {
                members.remove(position);
            } else if members.len() < max {
                members.push(entry);
            } else {
                self.write(&format!("{name} holds at most {max} entries"))?;
            }
        }
    }

    /// Picks an aspect, then its count; a non-positive count removes the
    /// aspect. An empty aspect name commits once enough aspects are set.
    fn aspect_map(&mut self, name: &str, options: &AspectMapOptions) -> Result<Value, PromptError> {
        let autocomplete = aspect_autocomplete(self.aspects);
        let min = options.min_distinct_keys.unwrap_or(0);
        let max = options.max_distinct_keys.unwrap_or(usize::MAX);
        let mut counts = Map::new();

        loop {
            self.write(&format!("{name}: {}", render_value(&Value::Object(counts.clone()))))?;
            let line = self.read(
                &collection_prompt(&format!("{name} aspect"), counts.len() >= min),
                Some(&autocomplete),
            )?;
            if line.is_empty() {
                if counts.len() >= min {
                    return Ok(Value::Object(counts));
                }
                continue;
            }

            let aspect = match autocomplete.member(&line) {
                Some(exact) => exact.to_string(),
                None => match autocomplete.complete(&line) {
                    Completion::Complete(completed) if self.aspects.exists(&completed) => completed,
                    Completion::Complete(_) => {
                        self.write(&format!("{line} is not a valid aspect"))?;
                        continue;
                    }
                    Completion::Ambiguous(candidates) => {
                        self.write(&candidates.join("  "))?;
                        continue;
                    }
                },
            };
            if !counts.contains_key(&aspect) && counts.len() >= max {
                self.write(&format!("{name} holds at most {max} aspects"))?;
                continue;
            }

            let count_options = IntegerOptions {
                min: None,
                max: None,
                default: counts.get(&aspect).and_then(as_safe_integer),
            };
            let count = self.integer(&aspect, &count_options)?;
            if count <= 0 {
                counts.remove(&aspect);
            } else {
                counts.insert(aspect, Value::from(count));
            }
        }
    }

    fn object(&mut self, options: &ObjectOptions) -> Result<Value, PromptError> {
        let mut record = Map::new();
        for field in &options.fields {
            let value = self.field(&field.schema)?;
            if !value.is_null() {
                record.insert(field.key.clone(), value);
            }
        }
        Ok(Value::Object(record))
    }

    /// Loops over an `add` / `remove` / `done` menu until `done`.
    fn array(&mut self, name: &str, options: &ArrayOptions) -> Result<Value, PromptError> {
        let min = options.min_length.unwrap_or(0);
        let max = options.max_length.unwrap_or(usize::MAX);
        let mut items: Vec<Value> = Vec::new();

        loop {
            self.write(&format!("{name}: {}", render_value(&Value::Array(items.clone()))))?;

            let mut actions = Vec::new();
            if items.len() < max {
                actions.push(ArrayAction::Add);
            }
            if !items.is_empty() {
                actions.push(ArrayAction::Remove);
            }
            if items.len() >= min {
                actions.push(ArrayAction::Done);
            }
            let menu = Autocomplete::plain(actions.iter().map(ArrayAction::label));
            let labels: Vec<&str> = actions.iter().map(ArrayAction::label).collect();
            let line = self.read(&format!("{name} ({})> ", labels.join("/")), Some(&menu))?;

            let chosen = if line.is_empty() {
                Some(ArrayAction::Done)
            } else {
                match menu.complete(&line) {
                    Completion::Complete(label) => ArrayAction::from_label(&label),
                    Completion::Ambiguous(_) => None,
                }
            };
            let Some(action) = chosen.filter(|action| actions.contains(action)) else {
                continue;
            };

            match action {
                ArrayAction::Add => {
                    let item = self.field(&options.element)?;
                    if !item.is_null() {
                        items.push(item);
                    }
                }
                ArrayAction::Remove => {
                    let last = (items.len() - 1) as i64;
                    let index_options = IntegerOptions {
                        min: Some(0),
                        max: Some(last),
                        default: Some(last),
                    };
                    let index = self.integer("index", &index_options)?;
                    if let Ok(index) = usize::try_from(index) {
                        items.remove(index);
                    }
                }
                ArrayAction::Done => return Ok(Value::Array(items)),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayAction {
    Add,
    Remove,
    Done,
}

impl ArrayAction {
    fn label(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Done => "done",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

fn field_autocomplete(options: &[String], delimiter: Option<&str>) -> Autocomplete {
    Autocomplete::for_options(options, delimiter).unwrap_or_else(|err| panic!("{err}"))
}

fn integer_prompt(name: &str, options: &IntegerOptions) -> String {
    let range = match (options.min, options.max) {
        (Some(min), Some(max)) => format!(" ({min}..{max})"),
        (Some(min), None) => format!(" (>= {min})"),
        (None, Some(max)) => format!(" (<= {max})"),
        (None, None) => String::new(),
    };
    let default = options
        .default
        .map(|default| format!(" [{default}]"))
        .unwrap_or_default();
    format!("{name}{range}{default}> ")
}

fn collection_prompt(name: &str, can_commit: bool) -> String {
    if can_commit {
        format!("{name} (empty line to finish)> ")
    } else {
        format!("{name}> ")
    }
}
