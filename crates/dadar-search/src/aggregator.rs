//! Fan-out search across every configured source.

use std::sync::Arc;

use dadar_core::{FailurePolicy, SearchResult, SourceDescriptor, SourceType, SOURCES};
use dadar_store::{DocumentStore, StoreError};
use futures::future::{join_all, try_join_all};

use crate::error::SearchError;
use crate::normalize::match_document;

/// A source that failed during a tolerant search.
#[derive(Debug)]
pub struct SourceFailure {
    pub source_type: SourceType,
    pub error: StoreError,
}

/// Results from the sources that answered, plus the ones that did not.
#[derive(Debug, Default)]
pub struct PartialSearch {
    pub results: Vec<SearchResult>,
    pub failed: Vec<SourceFailure>,
}

/// Result of [`SearchAggregator::run`].
#[derive(Debug)]
pub enum SearchOutcome {
    Complete(Vec<SearchResult>),
    /// Only produced under [`FailurePolicy::Partial`] when a source failed.
    Partial(PartialSearch),
}

/// Searches every source through an injected [`DocumentStore`].
///
/// Holds no state between calls: every search reads each collection afresh.
pub struct SearchAggregator {
    store: Arc<dyn DocumentStore>,
    sources: Vec<SourceDescriptor>,
}

impl SearchAggregator {
    /// Aggregator over the standard [`SOURCES`] table.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_sources(store, SOURCES.to_vec())
    }

    #[must_use]
    pub fn with_sources(store: Arc<dyn DocumentStore>, sources: Vec<SourceDescriptor>) -> Self {
        Self { store, sources }
    }

    #[must_use]
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Search every source for documents whose title contains `query`.
    ///
    /// A blank query returns no results without touching the store. All
    /// sources are read concurrently; results are concatenated in source
    /// order, each source keeping the store's enumeration order. Documents
    /// that share an id across sources are kept as distinct results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SourceFetch`] for the first source whose read
    /// fails. Results from the other sources are discarded.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            tracing::debug!("blank query, skipping search");
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let per_source = try_join_all(
            self.sources
                .iter()
                .map(|descriptor| self.search_source(descriptor, &needle)),
        )
        .await?;

        let results: Vec<SearchResult> = per_source.into_iter().flatten().collect();
        tracing::debug!(
            query,
            backend = self.store.backend_tag(),
            count = results.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Like [`Self::search`], but a failing source is logged and reported
    /// instead of failing the search.
    pub async fn search_tolerant(&self, query: &str) -> PartialSearch {
        if query.trim().is_empty() {
            return PartialSearch::default();
        }

        let needle = query.to_lowercase();
        let per_source = join_all(
            self.sources
                .iter()
                .map(|descriptor| self.search_source(descriptor, &needle)),
        )
        .await;

        let mut outcome = PartialSearch::default();
        for result in per_source {
            match result {
                Ok(results) => outcome.results.extend(results),
                Err(SearchError::SourceFetch { source_type, error }) => {
                    tracing::warn!(
                        source = %source_type,
                        error = %error,
                        "source fetch failed; continuing with remaining sources"
                    );
                    outcome.failed.push(SourceFailure { source_type, error });
                }
            }
        }
        outcome
    }

    /// Search under the given failure policy.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::AllOrNothing`], as [`Self::search`]. Never fails
    /// under [`FailurePolicy::Partial`].
    pub async fn run(
        &self,
        query: &str,
        policy: FailurePolicy,
    ) -> Result<SearchOutcome, SearchError> {
        match policy {
            FailurePolicy::AllOrNothing => self.search(query).await.map(SearchOutcome::Complete),
            FailurePolicy::Partial => {
                let partial = self.search_tolerant(query).await;
                if partial.failed.is_empty() {
                    Ok(SearchOutcome::Complete(partial.results))
                } else {
                    Ok(SearchOutcome::Partial(partial))
                }
            }
        }
    }

    async fn search_source(
        &self,
        descriptor: &SourceDescriptor,
        needle: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let docs = self
            .store
            .list_all(descriptor.collection)
            .await
            .map_err(|error| SearchError::SourceFetch {
                source_type: descriptor.source_type,
                error,
            })?;

        Ok(docs
            .iter()
            .filter_map(|doc| match_document(descriptor, doc, needle))
            .collect())
    }
}
