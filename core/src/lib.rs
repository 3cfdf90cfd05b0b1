//! Schema-driven validation and interactive construction of command
//! arguments.
//!
//! This crate defines a small type system for the arguments of a command and
//! two dual operations over it:
//!
//! - [`FieldSchema`] / [`FieldKind`]: the shape of a field (string, string
//!   set, integer, boolean, aspect map, nested object or array).
//! - [`validate`]: checks an already-supplied value and reports the first
//!   failure with its path (`[party][1] is not a string`).
//! - [`construct`]: builds a value field by field on a [`Terminal`],
//!   with skip/add/remove/edit sub-protocols for optional fields and
//!   collections.
//! - [`resolve`]: parses and validates raw argument text, falling back to
//!   [`construct`] when the text is empty or rejected.
//!
//! Completion of namespaced options (`skill.forge`) one segment at a time is
//! provided by [`SegmentTrie`] and wrapped per field in [`Autocomplete`].
//! Known aspect names come from an [`AspectRegistry`] passed into every call.
//!
//! # Example
//!
//! ```
//! use field_prompt_core::*;
//! use serde_json::json;
//!
//! let aspects: AspectSet = ["forge", "heart"].into_iter().collect();
//! let schema = FieldSchema::object("query")
//!     .with_field(
//!         "food",
//!         FieldSchema::string_set("food")
//!             .with_autocomplete(["bread", "apple", "corn", "candy"])
//!             .strict(),
//!     )
//!     .with_field("stats", FieldSchema::aspect_map("stats"));
//!
//! let err = validate(&json!({ "food": ["bread", "milk"], "stats": {} }), &schema, &aspects)
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "[food] is not included in autocomplete list at index 1");
//!
//! // Rejected input falls back to prompting.
//! let mut terminal = ScriptedTerminal::new(["corn", "", "forge", "2", ""]);
//! let value = resolve(r#"{"food": 3}"#, &schema, &aspects, &mut terminal).unwrap();
//! assert_eq!(value, json!({ "food": ["corn"], "stats": { "forge": 2 } }));
//! ```

mod aspects;
mod autocomplete;
mod construct;
mod error;
mod resolve;
mod terminal;
mod types;
mod validate;
mod value;

pub use aspects::{ASPECT_DELIMITER, AspectRegistry, AspectSet, aspect_autocomplete};
pub use autocomplete::{Autocomplete, Completion, SegmentTrie, complete_plain};
pub use construct::construct;
pub use error::{PromptError, SchemaError};
pub use resolve::resolve;
pub use terminal::{ScriptedTerminal, Terminal, parse_yes_no, yes_no_hint};
pub use types::*;
pub use validate::{
    PathSegment, ValidationError, ValidationErrorKind, validate, validation_message,
};
pub use value::{MAX_SAFE_INTEGER, as_safe_integer, render_value};
