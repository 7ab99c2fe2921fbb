//! Conversion between Firestore typed values and plain JSON.
//!
//! Firestore wraps every field in a single-key object naming its type
//! (`{"stringValue": "Aaswad"}`). Decoding strips those wrappers so the rest of
//! the workspace sees ordinary JSON; encoding adds them back for writes.

use chrono::SecondsFormat;
use dadar_core::TypedValue;
use serde_json::{json, Map, Number, Value};

/// Decode a Firestore `fields` map into plain JSON.
///
/// # Errors
///
/// Returns a description of the first field that is not a valid typed value.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .iter()
        .map(|(key, value)| {
            decode_value(value)
                .map(|decoded| (key.clone(), decoded))
                .map_err(|reason| format!("field '{key}': {reason}"))
        })
        .collect()
}

fn decode_value(value: &Value) -> Result<Value, String> {
    let Some(map) = value.as_object() else {
        return Err("expected a typed value object".to_string());
    };
    let Some((kind, inner)) = map.iter().next() else {
        return Err("empty typed value".to_string());
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| "booleanValue is not a boolean".to_string()),
        "integerValue" => decode_integer(inner),
        "doubleValue" => Ok(decode_double(inner)),
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| format!("{kind} is not a string")),
        "geoPointValue" => {
            let coordinate = |name: &str| {
                inner
                    .get(name)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| format!("geoPointValue.{name} is missing or not a number"))
            };
            Ok(json!({
                "latitude": coordinate("latitude")?,
                "longitude": coordinate("longitude")?,
            }))
        }
        "arrayValue" => {
            let items = match inner.get("values") {
                None => Vec::new(),
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => return Err("arrayValue.values is not an array".to_string()),
            };
            Ok(Value::Array(items))
        }
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(_) => Err("mapValue.fields is not an object".to_string()),
        },
        other => Err(format!("unsupported value type '{other}'")),
    }
}

/// int64 values arrive as JSON strings.
fn decode_integer(inner: &Value) -> Result<Value, String> {
    match inner {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) => s
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|e| format!("integerValue '{s}': {e}")),
        _ => Err("integerValue is neither a string nor a number".to_string()),
    }
}

/// `NaN` and the infinities arrive as strings and have no JSON number form.
fn decode_double(inner: &Value) -> Value {
    match inner {
        Value::Number(n) => Value::Number(n.clone()),
        _ => Value::Null,
    }
}

/// Encode plain JSON fields (as loaded from seed data) into Firestore typed values.
///
/// # Errors
///
/// Returns a description of the first malformed `$timestamp` or `$geopoint` marker.
pub fn encode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .iter()
        .map(|(key, value)| {
            encode_value(value)
                .map(|encoded| (key.clone(), encoded))
                .map_err(|reason| format!("field '{key}': {reason}"))
        })
        .collect()
}

fn encode_value(value: &Value) -> Result<Value, String> {
    if let Some(typed) = TypedValue::classify(value)? {
        return Ok(match typed {
            TypedValue::Timestamp(at) => {
                json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
            }
            TypedValue::GeoPoint {
                latitude,
                longitude,
            } => json!({ "geoPointValue": { "latitude": latitude, "longitude": longitude } }),
        });
    }

    Ok(match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => encode_number(n),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values = items
                .iter()
                .map(encode_value)
                .collect::<Result<Vec<_>, _>>()?;
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map)? } }),
    })
}

fn encode_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        json!({ "integerValue": i.to_string() })
    } else if let Some(u) = n.as_u64() {
        json!({ "integerValue": u.to_string() })
    } else {
        json!({ "doubleValue": n })
    }
}
