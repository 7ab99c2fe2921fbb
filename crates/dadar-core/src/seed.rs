//! Seed data for populating an empty document store.
//!
//! Plain YAML scalars, lists and maps map onto ordinary document fields. Values
//! the store types specially are written as single-key maps:
//!
//! ```yaml
//! date: { $timestamp: "2024-02-15T18:00:00+05:30" }
//! geoPoint: { $geopoint: [19.0269, 72.8383] }
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::content::SOURCES;
use crate::ConfigError;

const TIMESTAMP_KEY: &str = "$timestamp";
const GEOPOINT_KEY: &str = "$geopoint";

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub collections: Vec<SeedCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCollection {
    pub name: String,
    #[serde(default)]
    pub documents: Vec<SeedDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDocument {
    /// Explicit document id; the store assigns one when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SeedFile {
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|c| c.documents.len()).sum()
    }
}

/// A seed value the store encodes with a dedicated wire type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    Timestamp(DateTime<Utc>),
    GeoPoint { latitude: f64, longitude: f64 },
}

impl TypedValue {
    /// Recognize a `$timestamp` / `$geopoint` marker map.
    ///
    /// Returns `Ok(None)` for any value that is not a marker.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when a marker is malformed.
    pub fn classify(value: &Value) -> Result<Option<Self>, String> {
        let Some(map) = value.as_object() else {
            return Ok(None);
        };
        if map.len() != 1 {
            return Ok(None);
        }

        if let Some(raw) = map.get(TIMESTAMP_KEY) {
            let text = raw
                .as_str()
                .ok_or_else(|| format!("{TIMESTAMP_KEY} must be a string"))?;
            let parsed = DateTime::parse_from_rfc3339(text)
                .map_err(|e| format!("{TIMESTAMP_KEY} '{text}' is not RFC 3339: {e}"))?;
            return Ok(Some(TypedValue::Timestamp(parsed.with_timezone(&Utc))));
        }

        if let Some(raw) = map.get(GEOPOINT_KEY) {
            let pair = raw
                .as_array()
                .filter(|items| items.len() == 2)
                .ok_or_else(|| format!("{GEOPOINT_KEY} must be [latitude, longitude]"))?;
            let latitude = pair[0]
                .as_f64()
                .ok_or_else(|| format!("{GEOPOINT_KEY} latitude must be a number"))?;
            let longitude = pair[1]
                .as_f64()
                .ok_or_else(|| format!("{GEOPOINT_KEY} longitude must be a number"))?;
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(format!(
                    "{GEOPOINT_KEY} [{latitude}, {longitude}] is out of range"
                ));
            }
            return Ok(Some(TypedValue::GeoPoint {
                latitude,
                longitude,
            }));
        }

        Ok(None)
    }
}

/// Load and validate seed data from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_file(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seed: SeedFile = serde_yaml::from_str(&content).map_err(ConfigError::SeedFileParse)?;

    validate_seed(&seed)?;

    Ok(seed)
}

pub(crate) fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_collections = HashSet::new();

    for collection in &seed.collections {
        let name = collection.name.trim();
        if name.is_empty() || name.contains('/') {
            return Err(ConfigError::Validation(format!(
                "invalid collection name '{}'",
                collection.name
            )));
        }
        if !seen_collections.insert(name.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate collection: '{name}'"
            )));
        }

        let title_field = SOURCES
            .iter()
            .find(|d| d.collection == name)
            .map(|d| d.title_field);

        let mut seen_ids = HashSet::new();
        for (index, doc) in collection.documents.iter().enumerate() {
            if let Some(id) = &doc.id {
                if id.trim().is_empty() || id.contains('/') {
                    return Err(ConfigError::Validation(format!(
                        "invalid document id '{id}' in '{name}'"
                    )));
                }
                if !seen_ids.insert(id.clone()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate document id '{id}' in '{name}'"
                    )));
                }
            }

            if let Some(field) = title_field {
                let has_title = [field, "title"].iter().any(|f| {
                    doc.fields
                        .get(*f)
                        .and_then(Value::as_str)
                        .is_some_and(|s| !s.trim().is_empty())
                });
                if !has_title {
                    return Err(ConfigError::Validation(format!(
                        "document #{index} in '{name}' has no '{field}' or 'title'"
                    )));
                }
            }

            for (key, value) in &doc.fields {
                validate_value(value).map_err(|reason| {
                    ConfigError::Validation(format!(
                        "document #{index} in '{name}', field '{key}': {reason}"
                    ))
                })?;
            }
        }
    }

    Ok(())
}

fn validate_value(value: &Value) -> Result<(), String> {
    if TypedValue::classify(value)?.is_some() {
        return Ok(());
    }
    match value {
        Value::Array(items) => items.iter().try_for_each(validate_value),
        Value::Object(map) => map.values().try_for_each(validate_value),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
