//! Helpers over the dynamically typed values produced for a schema.
//!
//! Values are plain [`serde_json::Value`]s; `Value::Null` stands for an
//! absent (skipped) optional field.

use serde_json::Value;

/// Largest integer magnitude that survives a round trip through an IEEE-754
/// double (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Returns the value as an `i64` if it is an integer within the safe range.
///
/// Integral floating-point numbers such as `10.0` are accepted.
///
/// # Examples
///
/// ```
/// use field_prompt_core::as_safe_integer;
/// use serde_json::json;
///
/// assert_eq!(as_safe_integer(&json!(42)), Some(42));
/// assert_eq!(as_safe_integer(&json!(10.0)), Some(10));
/// assert_eq!(as_safe_integer(&json!(1.5)), None);
/// assert_eq!(as_safe_integer(&json!(9007199254740992_i64)), None);
/// assert_eq!(as_safe_integer(&json!("7")), None);
/// ```
pub fn as_safe_integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return (n.unsigned_abs() <= MAX_SAFE_INTEGER as u64).then_some(n);
    }
    if number.as_u64().is_some() {
        return None;
    }
    let f = number.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Renders a value on one line for prompt feedback.
///
/// # Examples
///
/// ```
/// use field_prompt_core::render_value;
/// use serde_json::json;
///
/// assert_eq!(render_value(&json!({"forge": 3, "tags": ["a", "b"]})), "{forge: 3, tags: [a, b]}");
/// assert_eq!(render_value(&json!(null)), "-");
/// ```
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_safe_integer_bounds() {
        assert_eq!(as_safe_integer(&json!(MAX_SAFE_INTEGER)), Some(MAX_SAFE_INTEGER));
        assert_eq!(
            as_safe_integer(&json!(-MAX_SAFE_INTEGER)),
            Some(-MAX_SAFE_INTEGER)
        );
        assert_eq!(as_safe_integer(&json!(MAX_SAFE_INTEGER + 1)), None);
        assert_eq!(as_safe_integer(&json!(i64::MIN)), None);
        assert_eq!(as_safe_integer(&json!(u64::MAX)), None);
    }

    #[test]
    fn test_render_booleans_and_empty_collections() {
        assert_eq!(render_value(&json!(true)), "yes");
        assert_eq!(render_value(&json!([])), "[]");
        assert_eq!(render_value(&json!({})), "{}");
    }
}
