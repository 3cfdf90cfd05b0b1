//! Schema type definitions for command argument modeling.
//!
//! A [`FieldSchema`] describes the shape and constraints of one field of a
//! command's arguments. Schemas are authored once per command definition,
//! never mutated at runtime, and round-trip through JSON and YAML with
//! [`serde`] (the variant is selected by a `"type"` tag).
//!
//! Constraint consistency (for example `min <= max`) is not checked here: a
//! malformed schema is a programming error of the command that declared it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Schema for a single field.
///
/// Construct schemas with the per-variant constructors
/// ([`string`](FieldSchema::string), [`integer`](FieldSchema::integer), ...)
/// and chain modifiers such as [`optional`](FieldSchema::optional) or
/// [`with_autocomplete`](FieldSchema::with_autocomplete).
///
/// # Panics
///
/// Modifiers panic when applied to a variant they do not describe (for
/// example [`with_min`](FieldSchema::with_min) on a string field), since that
/// can only happen while a command is declaring its schema.
///
/// # Examples
///
/// ```
/// use field_prompt_core::{FieldKind, FieldSchema};
///
/// let level = FieldSchema::integer("level").with_min(1).with_max(99);
/// assert!(level.required);
/// assert!(matches!(level.kind, FieldKind::Integer(_)));
///
/// let party = FieldSchema::object("party")
///     .with_field("leader", FieldSchema::string("leader"))
///     .with_field("size", FieldSchema::integer("size").optional());
/// assert_eq!(party.kind.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Display label used in prompts and rendered values.
    pub name: String,
    /// Whether the field must be supplied (defaults to `true`).
    #[serde(default = "default_required")]
    pub required: bool,
    /// Variant-specific shape and constraints.
    #[serde(flatten)]
    pub kind: FieldKind,
}

fn default_required() -> bool {
    true
}

/// Shape of a field, one variant per supported value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    /// A single string, optionally drawn from an autocomplete list.
    String(StringOptions),
    /// An order-irrelevant set of strings, rendered as a sequence.
    StringSet(StringSetOptions),
    /// A safe integer with optional bounds.
    Integer(IntegerOptions),
    /// A yes/no answer.
    Boolean(BooleanOptions),
    /// Known aspect names mapped to non-negative counts.
    AspectMap(AspectMapOptions),
    /// A fixed record of ordered sub-fields.
    Object(ObjectOptions),
    /// A homogeneous list of elements.
    Array(ArrayOptions),
}

impl FieldKind {
    /// Returns the serialized tag of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::StringSet(_) => "stringSet",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::AspectMap(_) => "aspectMap",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

/// Options for [`FieldKind::String`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringOptions {
    /// Suggested (or, when `strict`, permitted) values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autocomplete: Vec<String>,
    /// Regex marking namespace boundaries for segment completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// Only values from `autocomplete` are accepted.
    #[serde(default)]
    pub strict: bool,
    /// Value used when the operator submits an empty line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Options for [`FieldKind::StringSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSetOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autocomplete: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub strict: bool,
    /// Initial members of the set under construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

/// Options for [`FieldKind::Integer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,
}

impl IntegerOptions {
    /// Returns `true` if `n` lies within the configured bounds.
    pub fn contains(&self, n: i64) -> bool {
        self.min.is_none_or(|min| n >= min) && self.max.is_none_or(|max| n <= max)
    }
}

/// Options for [`FieldKind::Boolean`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// Options for [`FieldKind::AspectMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectMapOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distinct_keys: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distinct_keys: Option<usize>,
}

/// Options for [`FieldKind::Object`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectOptions {
    /// Sub-fields in declaration order.
    #[serde(default)]
    pub fields: Vec<ObjectField>,
}

/// One `(key, required, schema)` entry of an object schema.
///
/// Whether the key is required is the sub-schema's own
/// [`required`](FieldSchema::required) flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectField {
    pub key: String,
    pub schema: FieldSchema,
}

impl ObjectField {
    pub fn new(key: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            key: key.into(),
            schema,
        }
    }

    pub fn required(&self) -> bool {
        self.schema.required
    }
}

/// Options for [`FieldKind::Array`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOptions {
    /// Schema applied to every element.
    pub element: Box<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldSchema {
    /// Creates a required field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind,
        }
    }

    /// Creates a free-text string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String(StringOptions::default()))
    }

    /// Creates an empty string-set field.
    pub fn string_set(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::StringSet(StringSetOptions::default()))
    }

    /// Creates an unbounded integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer(IntegerOptions::default()))
    }

    /// Creates a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean(BooleanOptions::default()))
    }

    /// Creates an aspect-map field.
    pub fn aspect_map(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::AspectMap(AspectMapOptions::default()))
    }

    /// Creates an object field with no sub-fields yet.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Object(ObjectOptions::default()))
    }

    /// Creates an array field whose elements follow `element`.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_prompt_core::{FieldKind, FieldSchema};
    ///
    /// let ids = FieldSchema::array("ids", FieldSchema::integer("id"))
    ///     .with_count_bounds(Some(1), None);
    /// let FieldKind::Array(options) = &ids.kind else { unreachable!() };
    /// assert_eq!(options.min_length, Some(1));
    /// assert_eq!(options.element.name, "id");
    /// ```
    pub fn array(name: impl Into<String>, element: FieldSchema) -> Self {
        Self::new(
            name,
            FieldKind::Array(ArrayOptions {
                element: Box::new(element),
                min_length: None,
                max_length: None,
            }),
        )
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the autocomplete list of a string or string-set field.
    pub fn with_autocomplete<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        match &mut self.kind {
            FieldKind::String(o) => o.autocomplete = options,
            FieldKind::StringSet(o) => o.autocomplete = options,
            other => misuse("with_autocomplete", other),
        }
        self
    }

    /// Sets the namespace delimiter pattern of a string or string-set field.
    pub fn with_delimiter(mut self, pattern: &str) -> Self {
        match &mut self.kind {
            FieldKind::String(o) => o.delimiter = Some(pattern.to_string()),
            FieldKind::StringSet(o) => o.delimiter = Some(pattern.to_string()),
            other => misuse("with_delimiter", other),
        }
        self
    }

    /// Restricts a string or string-set field to its autocomplete list.
    pub fn strict(mut self) -> Self {
        match &mut self.kind {
            FieldKind::String(o) => o.strict = true,
            FieldKind::StringSet(o) => o.strict = true,
            other => misuse("strict", other),
        }
        self
    }

    /// Sets the lower bound of an integer field.
    pub fn with_min(mut self, min: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer(o) => o.min = Some(min),
            other => misuse("with_min", other),
        }
        self
    }

    /// Sets the upper bound of an integer field.
    pub fn with_max(mut self, max: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer(o) => o.max = Some(max),
            other => misuse("with_max", other),
        }
        self
    }

    /// Sets size bounds: member count for string sets, distinct keys for
    /// aspect maps, length for arrays.
    pub fn with_count_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        match &mut self.kind {
            FieldKind::StringSet(o) => {
                o.min_count = min;
                o.max_count = max;
            }
            FieldKind::AspectMap(o) => {
                o.min_distinct_keys = min;
                o.max_distinct_keys = max;
            }
            FieldKind::Array(o) => {
                o.min_length = min;
                o.max_length = max;
            }
            other => misuse("with_count_bounds", other),
        }
        self
    }

    /// Sets the default of a string, string-set, integer or boolean field.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_prompt_core::{FieldKind, FieldSchema};
    /// use serde_json::json;
    ///
    /// let gold = FieldSchema::integer("gold").with_default(json!(100));
    /// let FieldKind::Integer(options) = &gold.kind else { unreachable!() };
    /// assert_eq!(options.default, Some(100));
    /// ```
    pub fn with_default(mut self, value: Value) -> Self {
        match (&mut self.kind, &value) {
            (FieldKind::String(o), Value::String(s)) => o.default = Some(s.clone()),
            (FieldKind::StringSet(o), Value::Array(items)) => {
                o.default = Some(
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(String::from))
                        .collect(),
                )
            }
            (FieldKind::Integer(o), Value::Number(n)) if n.as_i64().is_some() => {
                o.default = n.as_i64()
            }
            (FieldKind::Boolean(o), Value::Bool(b)) => o.default = Some(*b),
            (other, _) => misuse("with_default", other),
        }
        self
    }

    /// Appends a sub-field to an object field.
    pub fn with_field(mut self, key: impl Into<String>, schema: FieldSchema) -> Self {
        match &mut self.kind {
            FieldKind::Object(o) => o.fields.push(ObjectField::new(key, schema)),
            other => misuse("with_field", other),
        }
        self
    }

    /// Compiles every delimiter pattern in this schema and its descendants.
    ///
    /// Catalogs call this at load time so that a bad pattern is reported
    /// instead of panicking mid-prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_prompt_core::FieldSchema;
    ///
    /// let nested = FieldSchema::array(
    ///     "tags",
    ///     FieldSchema::string("tag").with_autocomplete(["a.b"]).with_delimiter("("),
    /// );
    /// assert!(nested.check_delimiters().is_err());
    /// assert!(FieldSchema::string("tag").with_delimiter(r"\.").check_delimiters().is_ok());
    /// ```
    pub fn check_delimiters(&self) -> Result<(), SchemaError> {
        let delimiter = match &self.kind {
            FieldKind::String(o) => o.delimiter.as_deref(),
            FieldKind::StringSet(o) => o.delimiter.as_deref(),
            FieldKind::Object(o) => {
                return o
                    .fields
                    .iter()
                    .try_for_each(|field| field.schema.check_delimiters());
            }
            FieldKind::Array(o) => return o.element.check_delimiters(),
            FieldKind::Integer(_) | FieldKind::Boolean(_) | FieldKind::AspectMap(_) => None,
        };
        if let Some(pattern) = delimiter {
            Regex::new(pattern).map_err(|source| SchemaError::InvalidDelimiter {
                pattern: pattern.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

fn misuse(modifier: &str, kind: &FieldKind) -> ! {
    panic!(
        "{modifier} does not apply to a {} field schema",
        kind.type_name()
    )
}
