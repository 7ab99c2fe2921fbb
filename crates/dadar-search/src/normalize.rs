//! Mapping raw documents onto [`SearchResult`] through a [`SourceDescriptor`].

use dadar_core::{RawDocument, SearchResult, SourceDescriptor, PLACEHOLDER_IMAGE_URI, UNTITLED};

/// Display title: the source's title field, then `title`, then [`UNTITLED`].
#[must_use]
pub fn resolve_title<'a>(descriptor: &SourceDescriptor, doc: &'a RawDocument) -> &'a str {
    doc.str_field(descriptor.title_field)
        .or_else(|| doc.str_field("title"))
        .unwrap_or(UNTITLED)
}

fn resolve_description(doc: &RawDocument) -> &str {
    ["description", "summary", "location"]
        .into_iter()
        .find_map(|field| doc.str_field(field))
        .unwrap_or_default()
}

fn resolve_image(doc: &RawDocument) -> &str {
    doc.str_field("image")
        .or_else(|| doc.first_str_in("images"))
        .unwrap_or(PLACEHOLDER_IMAGE_URI)
}

/// Normalize a document unconditionally.
#[must_use]
pub fn normalize(descriptor: &SourceDescriptor, doc: &RawDocument) -> SearchResult {
    SearchResult {
        id: doc.id.clone(),
        title: resolve_title(descriptor, doc).to_string(),
        description: resolve_description(doc).to_string(),
        image_uri: resolve_image(doc).to_string(),
        source_type: descriptor.source_type,
    }
}

/// Normalize a document if its resolved title contains `needle`.
///
/// `needle` must already be lowercased; the title is lowercased here.
#[must_use]
pub fn match_document(
    descriptor: &SourceDescriptor,
    doc: &RawDocument,
    needle: &str,
) -> Option<SearchResult> {
    let title = resolve_title(descriptor, doc);
    if title.to_lowercase().contains(needle) {
        Some(normalize(descriptor, doc))
    } else {
        None
    }
}
