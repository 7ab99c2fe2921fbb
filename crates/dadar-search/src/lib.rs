//! Cross-collection search for the Dadar directory.
//!
//! Fans a free-text query out to every searchable collection, normalizes each
//! matching document into a [`SearchResult`](dadar_core::SearchResult), and
//! concatenates the results in a fixed source order. [`SearchSession`] wraps the
//! aggregator with the input-side behaviour: debounced keystrokes and a
//! last-issued-wins view.

pub mod aggregator;
pub mod badge;
pub mod debounce;
pub mod error;
pub mod normalize;
pub mod route;
pub mod session;

pub use aggregator::{PartialSearch, SearchAggregator, SearchOutcome, SourceFailure};
pub use badge::{badge_color, badge_label, BadgeColor};
pub use debounce::Debouncer;
pub use error::SearchError;
pub use normalize::{match_document, normalize, resolve_title};
pub use route::{
    dispatch, dispatch_tagged, route_for, route_template, share_link, Navigator, Route,
    RouteParams,
};
pub use session::{SearchSession, SearchStatus, SearchView, SessionOptions, SEARCH_FAILED_MESSAGE};
