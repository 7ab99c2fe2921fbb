//! Searchable content types and the normalized result shape.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CoreError;

/// Title used when a document carries neither its source's title field nor `title`.
pub const UNTITLED: &str = "Untitled";

/// Image marker for documents with no `image` and no `images`.
///
/// Empty rather than a blank marker string so serialized results carry no
/// fake URI. Renderers check [`SearchResult::has_image`], which also treats
/// whitespace-only URIs as missing.
pub const PLACEHOLDER_IMAGE_URI: &str = "";

/// The closed set of content collections that take part in search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Hotel,
    Shop,
    Place,
    Event,
    News,
    Blog,
}

impl SourceType {
    /// All variants in search order.
    pub const ALL: [SourceType; 6] = [
        SourceType::Hotel,
        SourceType::Shop,
        SourceType::Place,
        SourceType::Event,
        SourceType::News,
        SourceType::Blog,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Hotel => "hotel",
            SourceType::Shop => "shop",
            SourceType::Place => "place",
            SourceType::Event => "event",
            SourceType::News => "news",
            SourceType::Blog => "blog",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownSourceType(s.to_string()))
    }
}

/// Static per-source field mapping consumed by normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Backend collection name.
    pub collection: &'static str,
    pub source_type: SourceType,
    /// Field holding the display title; `title` is always tried next.
    pub title_field: &'static str,
}

/// The searchable sources, in the order their results are concatenated.
pub const SOURCES: [SourceDescriptor; 6] = [
    SourceDescriptor {
        collection: "hotels",
        source_type: SourceType::Hotel,
        title_field: "title",
    },
    SourceDescriptor {
        collection: "shops",
        source_type: SourceType::Shop,
        title_field: "name",
    },
    SourceDescriptor {
        collection: "places",
        source_type: SourceType::Place,
        title_field: "title",
    },
    SourceDescriptor {
        collection: "events",
        source_type: SourceType::Event,
        title_field: "title",
    },
    SourceDescriptor {
        collection: "news",
        source_type: SourceType::News,
        title_field: "headline",
    },
    SourceDescriptor {
        collection: "blogs",
        source_type: SourceType::Blog,
        title_field: "title",
    },
];

/// Look up the descriptor for a source type.
#[must_use]
pub fn descriptor_for(source_type: SourceType) -> &'static SourceDescriptor {
    match source_type {
        SourceType::Hotel => &SOURCES[0],
        SourceType::Shop => &SOURCES[1],
        SourceType::Place => &SOURCES[2],
        SourceType::Event => &SOURCES[3],
        SourceType::News => &SOURCES[4],
        SourceType::Blog => &SOURCES[5],
    }
}

/// An untyped document as returned by the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Unique within its collection only.
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the field as a string when it is a non-empty string.
    ///
    /// Empty strings and non-string values are treated as absent.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns the first element of an array field when it is a non-empty string.
    #[must_use]
    pub fn first_str_in(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A content record normalized into the shape shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    /// Never empty; falls back to [`UNTITLED`].
    pub title: String,
    pub description: String,
    pub image_uri: String,
    pub source_type: SourceType,
}

impl SearchResult {
    /// Identity of the result across sources. Raw ids collide between collections.
    #[must_use]
    pub fn key(&self) -> (SourceType, &str) {
        (self.source_type, self.id.as_str())
    }

    /// String form of [`Self::key`], suitable for list keys.
    #[must_use]
    pub fn list_key(&self) -> String {
        format!("{}-{}", self.source_type, self.id)
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_uri.trim().is_empty()
    }
}
