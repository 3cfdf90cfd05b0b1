//! Value validation against a field schema.
//!
//! [`validate`] walks a value in lock-step with its [`FieldSchema`] and
//! reports the first failure it meets. The error carries the path to the
//! failing position (`[field]`, `[index]`) accumulated while the recursion
//! unwinds, so nested failures read as a breadcrumb:
//!
//! ```
//! use field_prompt_core::*;
//! use serde_json::json;
//!
//! let aspects = AspectSet::new();
//! let schema = FieldSchema::object("party").with_field(
//!     "levels",
//!     FieldSchema::array("levels", FieldSchema::integer("level").with_min(1).with_max(99)),
//! );
//!
//! assert!(validate(&json!({ "levels": [10, 20] }), &schema, &aspects).is_ok());
//!
//! let err = validate(&json!({ "levels": [10, 150] }), &schema, &aspects).unwrap_err();
//! assert_eq!(err.to_string(), "[levels][1] is above the max value allowed");
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::aspects::AspectRegistry;
use crate::types::{
    ArrayOptions, AspectMapOptions, FieldKind, FieldSchema, IntegerOptions, ObjectOptions,
    StringOptions, StringSetOptions,
};
use crate::value::as_safe_integer;

/// One step of the path to a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "[{key}]"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// What was wrong with a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    /// A required value is absent.
    #[error("is undefined")]
    Undefined,
    #[error("is not a string")]
    NotAString,
    /// A strict string is not in its autocomplete list.
    #[error("is not included in autocomplete list")]
    NotInAutocomplete,
    /// A member of a strict string set is not in its autocomplete list.
    #[error("is not included in autocomplete list at index {0}")]
    NotInAutocompleteAt(usize),
    #[error("is not an array")]
    NotAnArray,
    #[error("is not a safe integer")]
    NotASafeInteger,
    #[error("is below the min value allowed")]
    BelowMin,
    #[error("is above the max value allowed")]
    AboveMax,
    #[error("is not a boolean")]
    NotABoolean,
    #[error("is not an aspect map")]
    NotAnAspectMap,
    #[error("{0} is not a valid aspect")]
    UnknownAspect(String),
    #[error("{0} is not a safe integer")]
    AspectNotInteger(String),
    #[error("{0} is below zero")]
    AspectBelowZero(String),
    #[error("is not an object")]
    NotAnObject,
    /// A required object key is missing.
    #[error("is undefined for required key {0}")]
    MissingKey(String),
    /// A set, map, or array is smaller than its lower bound.
    #[error("has fewer than {0} entries")]
    TooFew(usize),
    /// A set, map, or array is larger than its upper bound.
    #[error("has more than {0} entries")]
    TooMany(usize),
}

/// First validation failure found in a value, with its path.
///
/// Displays as the bracketed path followed by the message, e.g.
/// `[stats][0] is above the max value allowed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", path_prefix(.path), .kind)]
pub struct ValidationError {
    /// Path from the validated root to the failing value.
    pub path: Vec<PathSegment>,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        Self {
            path: Vec::new(),
            kind,
        }
    }

    /// Prefixes the path with the segment of the enclosing value.
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }
}

impl From<ValidationErrorKind> for ValidationError {
    fn from(kind: ValidationErrorKind) -> Self {
        Self::new(kind)
    }
}

fn path_prefix(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut prefix: String = path.iter().map(ToString::to_string).collect();
    prefix.push(' ');
    prefix
}

type Outcome = Result<(), ValidationError>;

/// Validates `value` against `schema`.
///
/// `Value::Null` counts as an absent value, which an optional schema accepts.
/// Aspect-map keys are checked against `aspects`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, in declaration order for
/// object fields and index order for arrays and sets.
///
/// # Examples
///
/// ```
/// use field_prompt_core::*;
/// use serde_json::json;
///
/// let aspects = AspectSet::new();
/// let level = FieldSchema::integer("level").with_min(1).with_max(99);
/// assert!(validate(&json!(10), &level, &aspects).is_ok());
///
/// let err = validate(&json!(150), &level, &aspects).unwrap_err();
/// assert_eq!(err.kind, ValidationErrorKind::AboveMax);
/// assert_eq!(err.to_string(), "is above the max value allowed");
/// ```
pub fn validate(value: &Value, schema: &FieldSchema, aspects: &dyn AspectRegistry) -> Outcome {
    validate_field(Some(value), schema, aspects)
}

/// Validates `value` and renders the outcome as a message: empty when the
/// value is valid, otherwise the path-qualified description of the first
/// failure.
///
/// # Examples
///
/// ```
/// use field_prompt_core::*;
/// use serde_json::json;
///
/// let aspects = AspectSet::new();
/// let schema = FieldSchema::object("hero").with_field("age", FieldSchema::integer("age"));
/// assert_eq!(validation_message(&json!({ "age": 3 }), &schema, &aspects), "");
/// assert_eq!(
///     validation_message(&json!({}), &schema, &aspects),
///     "is undefined for required key age"
/// );
/// ```
pub fn validation_message(
    value: &Value,
    schema: &FieldSchema,
    aspects: &dyn AspectRegistry,
) -> String {
    match validate(value, schema, aspects) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

fn validate_field(
    value: Option<&Value>,
    schema: &FieldSchema,
    aspects: &dyn AspectRegistry,
) -> Outcome {
    let value = match value {
        None | Some(Value::Null) if schema.required => {
            return Err(ValidationErrorKind::Undefined.into());
        }
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };

    match &schema.kind {
        FieldKind::String(options) => validate_string(value, options),
        FieldKind::StringSet(options) => validate_string_set(value, options),
        FieldKind::Integer(options) => validate_integer(value, options),
        FieldKind::Boolean(_) => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(ValidationErrorKind::NotABoolean.into())
            }
        }
        FieldKind::AspectMap(options) => validate_aspect_map(value, options, aspects),
        FieldKind::Object(options) => validate_object(value, options, aspects),
        FieldKind::Array(options) => validate_array(value, options, aspects),
    }
}

fn validate_string(value: &Value, options: &StringOptions) -> Outcome {
    let Value::String(s) = value else {
        return Err(ValidationErrorKind::NotAString.into());
    };
    if options.strict && !options.autocomplete.contains(s) {
        return Err(ValidationErrorKind::NotInAutocomplete.into());
    }
    Ok(())
}

fn validate_string_set(value: &Value, options: &StringSetOptions) -> Outcome {
    let Value::Array(items) = value else {
        return Err(ValidationErrorKind::NotAnArray.into());
    };
    check_count(items.len(), options.min_count, options.max_count)?;

    for (index, item) in items.iter().enumerate() {
        let Value::String(s) = item else {
            return Err(ValidationError::new(ValidationErrorKind::NotAString)
                .within(PathSegment::Index(index)));
        };
        if options.strict && !options.autocomplete.contains(s) {
            return Err(ValidationErrorKind::NotInAutocompleteAt(index).into());
        }
    }
    Ok(())
}

fn validate_integer(value: &Value, options: &IntegerOptions) -> Outcome {
    let Some(n) = as_safe_integer(value) else {
        return Err(ValidationErrorKind::NotASafeInteger.into());
    };
    if options.min.is_some_and(|min| n < min) {
        return Err(ValidationErrorKind::BelowMin.into());
    }
    if options.max.is_some_and(|max| n > max) {
        return Err(ValidationErrorKind::AboveMax.into());
    }
    Ok(())
}

fn validate_aspect_map(
    value: &Value,
    options: &AspectMapOptions,
    aspects: &dyn AspectRegistry,
) -> Outcome {
    let Value::Object(map) = value else {
        return Err(ValidationErrorKind::NotAnAspectMap.into());
    };

    for (name, count) in map {
        if !aspects.exists(name) {
            return Err(ValidationErrorKind::UnknownAspect(name.clone()).into());
        }
        match as_safe_integer(count) {
            None => return Err(ValidationErrorKind::AspectNotInteger(name.clone()).into()),
            Some(n) if n < 0 => {
                return Err(ValidationErrorKind::AspectBelowZero(name.clone()).into());
            }
            Some(_) => {}
        }
    }

    check_count(map.len(), options.min_distinct_keys, options.max_distinct_keys)
}

fn validate_object(
    value: &Value,
    options: &ObjectOptions,
    aspects: &dyn AspectRegistry,
) -> Outcome {
    let Value::Object(map) = value else {
        return Err(ValidationErrorKind::NotAnObject.into());
    };

    for field in &options.fields {
        match map.get(&field.key) {
            None if field.required() => {
                return Err(ValidationErrorKind::MissingKey(field.key.clone()).into());
            }
            None => {}
            Some(present) => validate_field(Some(present), &field.schema, aspects)
                .map_err(|err| err.within(PathSegment::Key(field.key.clone())))?,
        }
    }
    Ok(())
}

fn validate_array(value: &Value, options: &ArrayOptions, aspects: &dyn AspectRegistry) -> Outcome {
    let Value::Array(items) = value else {
        return Err(ValidationErrorKind::NotAnArray.into());
    };
    check_count(items.len(), options.min_length, options.max_length)?;

    for (index, item) in items.iter().enumerate() {
        validate_field(Some(item), &options.element, aspects)
            .map_err(|err| err.within(PathSegment::Index(index)))?;
    }
    Ok(())
}

fn check_count(len: usize, min: Option<usize>, max: Option<usize>) -> Outcome {
    if let Some(min) = min.filter(|min| len < *min) {
        return Err(ValidationErrorKind::TooFew(min).into());
    }
    if let Some(max) = max.filter(|max| len > *max) {
        return Err(ValidationErrorKind::TooMany(max).into());
    }
    Ok(())
}
