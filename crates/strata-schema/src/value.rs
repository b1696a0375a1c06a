//! String forms of JSON values.
//!
//! Two distinct conversions live here and must stay distinct:
//!
//! - [`normalized`]: the case-folded, trimmed form used by non-index filter
//!   comparison and by search term matching. Null has no normalized form.
//! - [`key_string`]: the plain string form used for index keys (document keys
//!   are compared and reconstructed through this form).
//!
//! SQL WHERE equality deliberately uses neither; it compares [`Value`]s
//! directly.

use serde_json::Value;

/// Trims surrounding whitespace and case-folds a string.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Returns the normalized string form of a value, or `None` for null.
///
/// Strings normalize to their trimmed, case-folded content; scalars go
/// through their display form first. Arrays and objects use their compact
/// JSON text, which keeps the comparison total without pretending such
/// values make useful filter targets.
pub fn normalized(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(normalize(s)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(normalize(&other.to_string())),
    }
}

/// Compares two values under the normalized string form.
///
/// Null on either side never matches.
pub fn normalized_eq(a: &Value, b: &Value) -> bool {
    match (normalized(a), normalized(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Returns the plain string form of a value, as used for index keys.
///
/// Strings yield their content without quotes; everything else yields its
/// JSON text.
pub fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
