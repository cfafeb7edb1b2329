//! Lenient conversions for loosely typed JSON columns.
//!
//! Source rows mix numbers, numeric strings, and blanks in the same
//! column. These helpers never fail: unusable numbers become `NaN` and
//! unusable labels become `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Converts a JSON value to `f64`. Numbers and numeric strings parse;
/// everything else (including empty strings) is `NaN`.
#[must_use]
pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Converts a JSON value to a group label. `null` has no label.
#[must_use]
pub fn value_to_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map_or_else(|| n.to_string(), |f| f.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

/// `deserialize_with` adapter for [`value_to_f64`].
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(f64::NAN, value_to_f64))
}

/// `deserialize_with` adapter for [`value_to_label`].
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_label))
}
