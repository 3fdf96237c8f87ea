//! Lenient deserialization helpers for persisted records
//!
//! Stored state may have been written by older builds or edited by hand.
//! Loading must never fail because of it: a field with the wrong shape falls
//! back to its default, and list elements that cannot be read at all are
//! dropped by the record-level loaders.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field, substituting `T::default()` when the value has the
/// wrong shape
///
/// Pair with `#[serde(default)]` so missing fields are covered too.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize an epoch-millisecond timestamp from an integer or a float
///
/// Timestamps written by other tools may carry a fractional part; it is
/// truncated. Anything else is an error for the enclosing element.
pub fn timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_millis(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {value}")))
}

/// Optional variant of [`timestamp`]; invalid values become `None`
pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_millis(&value))
}

/// Read every element of a JSON array as `T`, returning the parsed elements
/// and the number of elements that had to be dropped
///
/// A value that is not an array yields an empty list.
pub fn elements<T: DeserializeOwned>(value: Option<&Value>) -> (Vec<T>, usize) {
    let Some(Value::Array(items)) = value else {
        return (Vec::new(), 0);
    };

    let mut dropped = 0;
    let parsed = items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                dropped += 1;
                None
            }
        })
        .collect();
    (parsed, dropped)
}

#[allow(clippy::cast_possible_truncation)]
fn value_to_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
}
