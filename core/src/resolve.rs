//! Validate-or-prompt resolution of raw command arguments.

use serde_json::Value;
use tracing::{debug, info};

use crate::aspects::AspectRegistry;
use crate::construct::construct;
use crate::error::PromptError;
use crate::terminal::Terminal;
use crate::types::FieldSchema;
use crate::validate::validate;

/// Resolves raw argument text to a value for `schema`.
///
/// Empty input goes straight to interactive construction. Otherwise the
/// text is parsed as a JSON literal and validated; the parsed value is
/// returned unchanged when it is valid. A parse or validation failure is
/// explained on one line and construction takes over.
///
/// # Errors
///
/// Returns [`PromptError`] only from the interactive path (cancellation or
/// terminal failure).
///
/// # Examples
///
/// ```
/// use field_prompt_core::*;
/// use serde_json::json;
///
/// let aspects = AspectSet::new();
/// let level = FieldSchema::integer("level").with_min(1).with_max(99);
///
/// let mut terminal = ScriptedTerminal::new(Vec::<String>::new());
/// assert_eq!(resolve("10", &level, &aspects, &mut terminal).unwrap(), json!(10));
///
/// let mut terminal = ScriptedTerminal::new(["42"]);
/// assert_eq!(resolve("150", &level, &aspects, &mut terminal).unwrap(), json!(42));
/// assert_eq!(terminal.transcript()[0], "invalid level: is above the max value allowed");
/// ```
pub fn resolve(
    raw: &str,
    schema: &FieldSchema,
    aspects: &dyn AspectRegistry,
    terminal: &mut dyn Terminal,
) -> Result<Value, PromptError> {
    let raw = raw.trim();
    if raw.is_empty() {
        debug!(field = %schema.name, "No input supplied, prompting");
        return construct(schema, aspects, terminal);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => match validate(&value, schema, aspects) {
            Ok(()) => {
                debug!(field = %schema.name, "Supplied input accepted");
                return Ok(value);
            }
            Err(err) => {
                info!(field = %schema.name, error = %err, "Supplied input rejected");
                terminal.write_line(&format!("invalid {}: {err}", schema.name))?;
            }
        },
        Err(err) => {
            info!(field = %schema.name, error = %err, "Supplied input is not a literal");
            terminal.write_line(&format!("could not parse input: {err}"))?;
        }
    }

    construct(schema, aspects, terminal)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::aspects::AspectSet;
    use crate::terminal::ScriptedTerminal;

    use super::*;

    fn hero() -> FieldSchema {
        FieldSchema::object("hero")
            .with_field("name", FieldSchema::string("name"))
            .with_field("stats", FieldSchema::aspect_map("stats").optional())
    }

    fn aspects() -> AspectSet {
        ["forge", "heart"].into_iter().collect()
    }

    #[test]
    fn test_empty_input_always_prompts() {
        let mut terminal = ScriptedTerminal::new(["Ana", "y"]);
        let value = resolve("   ", &hero(), &aspects(), &mut terminal).unwrap();
        assert_eq!(value, json!({ "name": "Ana" }));
        assert_eq!(terminal.remaining(), 0);
    }

    #[test]
    fn test_valid_literal_returned_unchanged() {
        let mut terminal = ScriptedTerminal::new(Vec::<String>::new());
        let raw = r#"{"name": "Bo", "stats": {"forge": 2}, "extra": [1, 2]}"#;
        let value = resolve(raw, &hero(), &aspects(), &mut terminal).unwrap();
        assert_eq!(value, json!({ "name": "Bo", "stats": { "forge": 2 }, "extra": [1, 2] }));
        assert!(terminal.transcript().is_empty());
    }

    #[test]
    fn test_invalid_literal_falls_back_with_reason() {
        let mut terminal = ScriptedTerminal::new(["Cy", "y"]);
        let raw = r#"{"name": "Bo", "stats": {"unknownaspect": 3}}"#;
        let value = resolve(raw, &hero(), &aspects(), &mut terminal).unwrap();
        assert_eq!(value, json!({ "name": "Cy" }));
        assert_eq!(
            terminal.transcript()[0],
            "invalid hero: [stats] unknownaspect is not a valid aspect"
        );
    }

    #[test]
    fn test_unparsable_literal_falls_back() {
        let mut terminal = ScriptedTerminal::new(["Dee", "y"]);
        let value = resolve("{name: Dee", &hero(), &aspects(), &mut terminal).unwrap();
        assert_eq!(value, json!({ "name": "Dee" }));
        assert!(terminal.transcript()[0].starts_with("could not parse input: "));
    }

    #[test]
    fn test_cancelled_fallback_propagates() {
        let mut terminal = ScriptedTerminal::new([ScriptedTerminal::CANCEL]);
        let err = resolve("[]", &hero(), &aspects(), &mut terminal).unwrap_err();
        assert!(matches!(err, PromptError::Cancelled));
    }
}
