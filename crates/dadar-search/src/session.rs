//! Input-driven search state: debounced keystrokes and a last-issued-wins view.
//!
//! Every issued search is tagged with a generation number. A response is
//! applied only if no later search has been issued since, so a slow early
//! query can never overwrite the results of a faster later one. In-flight
//! store reads are not cancelled; their results are simply dropped.

use std::sync::Arc;
use std::time::Duration;

use dadar_core::{AppConfig, FailurePolicy, SearchResult, SourceType};
use tokio::sync::watch;

use crate::aggregator::{SearchAggregator, SearchOutcome};
use crate::debounce::Debouncer;
use crate::route::share_link;

/// Shown for any failed search; there is no per-cause message.
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

const START_MESSAGE: &str = "Start searching...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing searched for the current query.
    Idle,
    Loading,
    Ready(Vec<SearchResult>),
    /// Some sources failed under [`FailurePolicy::Partial`].
    Partial {
        results: Vec<SearchResult>,
        failed_sources: Vec<SourceType>,
    },
    Failed(String),
}

/// What the search screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    /// Generation of the most recently issued search. Zero before the first.
    pub generation: u64,
    pub status: SearchStatus,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: String::new(),
            generation: 0,
            status: SearchStatus::Idle,
        }
    }
}

impl SearchView {
    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        match &self.status {
            SearchStatus::Ready(results) | SearchStatus::Partial { results, .. } => results,
            SearchStatus::Idle | SearchStatus::Loading | SearchStatus::Failed(_) => &[],
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// Placeholder text when there is nothing to list.
    ///
    /// Distinguishes "no query yet" from "the query matched nothing".
    #[must_use]
    pub fn empty_message(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return match self.status {
                SearchStatus::Loading | SearchStatus::Failed(_) => None,
                _ => Some(START_MESSAGE.to_string()),
            };
        }
        match &self.status {
            SearchStatus::Ready(results) | SearchStatus::Partial { results, .. }
                if results.is_empty() =>
            {
                Some(format!("No results found for \"{}\"", self.query))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub policy: FailurePolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            policy: FailurePolicy::AllOrNothing,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.search_debounce_ms),
            policy: config.search_failure_policy,
        }
    }
}

/// Drives a [`SearchAggregator`] from text input events.
///
/// Must be used inside a tokio runtime.
pub struct SearchSession {
    aggregator: Arc<SearchAggregator>,
    policy: FailurePolicy,
    view: Arc<watch::Sender<SearchView>>,
    debouncer: Debouncer,
}

impl SearchSession {
    #[must_use]
    pub fn new(aggregator: Arc<SearchAggregator>, options: SessionOptions) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            aggregator,
            policy: options.policy,
            view: Arc::new(view),
            debouncer: Debouncer::new(options.debounce),
        }
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// Text field changed: show the new text now, search once typing pauses.
    pub fn change_text(&mut self, text: &str) {
        let text = text.to_string();
        self.view.send_if_modified(|view| {
            if view.query == text {
                false
            } else {
                view.query.clone_from(&text);
                true
            }
        });

        let aggregator = Arc::clone(&self.aggregator);
        let view = Arc::clone(&self.view);
        let policy = self.policy;
        self.debouncer.schedule(move || {
            issue_search(&aggregator, &view, policy, text);
        });
    }

    /// Text submitted: returns the shareable link for `text`.
    ///
    /// Text that differs from the current query is searched as if typed.
    pub fn submit(&mut self, text: &str) -> String {
        if self.view.borrow().query != text {
            self.change_text(text);
        }
        share_link(text)
    }

    /// Whether a debounced search is waiting to be issued.
    #[must_use]
    pub fn is_search_scheduled(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Start a search immediately, bypassing the debounce.
    ///
    /// Returns the generation assigned to it.
    pub fn issue(&self, text: &str) -> u64 {
        issue_search(&self.aggregator, &self.view, self.policy, text.to_string())
    }
}

fn issue_search(
    aggregator: &Arc<SearchAggregator>,
    view: &Arc<watch::Sender<SearchView>>,
    policy: FailurePolicy,
    text: String,
) -> u64 {
    let blank = text.trim().is_empty();
    let mut generation = 0;
    view.send_modify(|v| {
        v.generation += 1;
        generation = v.generation;
        v.query.clone_from(&text);
        v.status = if blank {
            SearchStatus::Idle
        } else {
            SearchStatus::Loading
        };
    });

    if blank {
        return generation;
    }

    let aggregator = Arc::clone(aggregator);
    let view = Arc::clone(view);
    tokio::spawn(async move {
        let outcome = aggregator.run(&text, policy).await;
        let applied = view.send_if_modified(|v| {
            if v.generation != generation {
                return false;
            }
            v.status = status_from(outcome);
            true
        });
        if !applied {
            tracing::debug!(generation, query = %text, "discarding stale search response");
        }
    });

    generation
}

fn status_from(outcome: Result<SearchOutcome, crate::SearchError>) -> SearchStatus {
    match outcome {
        Ok(SearchOutcome::Complete(results)) => SearchStatus::Ready(results),
        Ok(SearchOutcome::Partial(partial)) => SearchStatus::Partial {
            results: partial.results,
            failed_sources: partial.failed.iter().map(|f| f.source_type).collect(),
        },
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            SearchStatus::Failed(SEARCH_FAILED_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use dadar_core::PLACEHOLDER_IMAGE_URI;

    use super::*;

    fn view(query: &str, status: SearchStatus) -> SearchView {
        SearchView {
            query: query.to_string(),
            generation: 1,
            status,
        }
    }

    fn one_result() -> Vec<SearchResult> {
        vec![SearchResult {
            id: "a".to_string(),
            title: "Aaswad".to_string(),
            description: String::new(),
            image_uri: PLACEHOLDER_IMAGE_URI.to_string(),
            source_type: SourceType::Hotel,
        }]
    }

    #[test]
    fn empty_message_before_any_query() {
        assert_eq!(
            SearchView::default().empty_message().as_deref(),
            Some("Start searching...")
        );
        assert_eq!(
            view("   ", SearchStatus::Idle).empty_message().as_deref(),
            Some("Start searching...")
        );
    }

    #[test]
    fn empty_message_for_zero_results() {
        assert_eq!(
            view("zzz", SearchStatus::Ready(vec![]))
                .empty_message()
                .as_deref(),
            Some("No results found for \"zzz\"")
        );
    }

    #[test]
    fn no_empty_message_while_loading_failed_or_populated() {
        assert!(view("aas", SearchStatus::Loading).empty_message().is_none());
        assert!(view("aas", SearchStatus::Failed(SEARCH_FAILED_MESSAGE.to_string()))
            .empty_message()
            .is_none());
        assert!(view("aas", SearchStatus::Ready(one_result()))
            .empty_message()
            .is_none());
    }

    #[test]
    fn results_and_loading_accessors() {
        let ready = view("aas", SearchStatus::Ready(one_result()));
        assert_eq!(ready.results().len(), 1);
        assert!(!ready.is_loading());
        let loading = view("aas", SearchStatus::Loading);
        assert!(loading.results().is_empty());
        assert!(loading.is_loading());
    }
}
