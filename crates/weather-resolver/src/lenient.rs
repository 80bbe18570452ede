//! Field decoders for provider payloads that drift from their documented types.
//!
//! Each helper reads the raw JSON value and maps anything unusable to `None`
//! (or an empty list), so one odd field never rejects the surrounding record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn code<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(code_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn text_list<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(list(&Value::deserialize(deserializer)?, text_value))
}

pub(crate) fn number_list<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(list(&Value::deserialize(deserializer)?, number_value))
}

pub(crate) fn code_list<'de, D>(deserializer: D) -> Result<Vec<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(list(&Value::deserialize(deserializer)?, code_value))
}

fn list<T>(value: &Value, item: fn(&Value) -> Option<T>) -> Vec<Option<T>> {
    match value {
        Value::Array(items) => items.iter().map(item).collect(),
        _ => Vec::new(),
    }
}

/// Scalars are kept as their JSON text; containers and null are dropped.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Accepts plain numbers, numeric strings and NWS quantitative values
/// (`{"unitCode": ..., "value": 41}`).
fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Object(map) => map.get("value").and_then(number_value),
        _ => None,
    }
}

fn code_value(value: &Value) -> Option<i32> {
    number_value(value)
        .filter(|number| number.fract() == 0.0)
        .and_then(|number| {
            if number >= f64::from(i32::MIN) && number <= f64::from(i32::MAX) {
                Some(number as i32)
            } else {
                None
            }
        })
}
