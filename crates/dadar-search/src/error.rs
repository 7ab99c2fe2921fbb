use dadar_core::SourceType;
use dadar_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Reading one source's collection failed; the whole search fails with it.
    #[error("failed to fetch {source_type} results: {error}")]
    SourceFetch {
        source_type: SourceType,
        #[source]
        error: StoreError,
    },
}

impl SearchError {
    #[must_use]
    pub fn source_type(&self) -> SourceType {
        match self {
            SearchError::SourceFetch { source_type, .. } => *source_type,
        }
    }
}
