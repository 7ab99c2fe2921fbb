//! Aggregated search against an in-memory store.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use dadar_core::{FailurePolicy, SourceType};
use dadar_search::{SearchAggregator, SearchError, SearchOutcome};
use serde_json::json;

use support::FakeStore;

const ALL_COLLECTIONS: [&str; 6] = ["hotels", "shops", "places", "events", "news", "blogs"];

fn dadar_store() -> FakeStore {
    FakeStore::new()
        .with_doc("hotels", "h1", json!({ "title": "Pritam Da Dhaba", "location": "Dadar East" }))
        .with_doc("hotels", "h2", json!({ "title": "Aaswad", "image": "aaswad.jpg" }))
        .with_doc("shops", "s1", json!({ "name": "Dadar Flower Market", "description": "Wholesale flowers" }))
        .with_doc("shops", "s2", json!({ "name": "Hindmata Cloth Market" }))
        .with_doc("places", "p1", json!({ "title": "Shivaji Park", "images": ["park.jpg"] }))
        .with_doc("places", "p2", json!({ "title": "Dadar Flower Market", "summary": "Early mornings" }))
        .with_doc("events", "e1", json!({ "title": "Dadar Cultural Festival" }))
        .with_doc("news", "n1", json!({ "headline": "Dadar station upgrade" }))
        .with_doc("blogs", "b1", json!({ "title": "A morning in Dadar" }))
}

fn aggregator(store: FakeStore) -> (Arc<FakeStore>, SearchAggregator) {
    let store = Arc::new(store);
    let agg = SearchAggregator::new(Arc::clone(&store) as Arc<dyn dadar_store::DocumentStore>);
    (store, agg)
}

#[tokio::test]
async fn blank_queries_return_empty_without_fetching() {
    let (store, agg) = aggregator(dadar_store());
    for query in ["", " ", "\t\n  "] {
        let results = agg.search(query).await.expect("blank search should succeed");
        assert!(results.is_empty());
    }
    assert_eq!(store.calls(), 0);

    let partial = agg.search_tolerant("   ").await;
    assert!(partial.results.is_empty() && partial.failed.is_empty());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn search_reads_each_collection_once() {
    let (store, agg) = aggregator(dadar_store());
    agg.search("dadar").await.unwrap();

    assert_eq!(store.calls(), 6);
    let read: HashSet<String> = store.log().into_iter().collect();
    let expected: HashSet<String> = ALL_COLLECTIONS.iter().map(|s| (*s).to_string()).collect();
    assert_eq!(read, expected);
}

#[tokio::test]
async fn results_follow_source_order_then_store_order() {
    let (_, agg) = aggregator(dadar_store());
    let results = agg.search("DADAR").await.unwrap();

    let keys: Vec<(SourceType, &str)> = results.iter().map(|r| r.key()).collect();
    assert_eq!(
        keys,
        [
            (SourceType::Hotel, "h1"),
            (SourceType::Shop, "s1"),
            (SourceType::Place, "p2"),
            (SourceType::Event, "e1"),
            (SourceType::News, "n1"),
            (SourceType::Blog, "b1"),
        ]
    );
}

#[tokio::test]
async fn matching_is_case_insensitive_substring() {
    let store = FakeStore::new().with_doc("hotels", "h", json!({ "title": "Nalli Silks" }));
    let (_, agg) = aggregator(store);

    for query in ["nalli", "SILKS", "Li Si"] {
        assert_eq!(agg.search(query).await.unwrap().len(), 1, "'{query}' should match");
    }
    assert!(agg.search("nallisilks").await.unwrap().is_empty());
}

#[tokio::test]
async fn normalizes_fields_per_source() {
    let (_, agg) = aggregator(dadar_store());
    let results = agg.search("flower market").await.unwrap();
    assert_eq!(results.len(), 2);

    let shop = &results[0];
    assert_eq!(shop.source_type, SourceType::Shop);
    assert_eq!(shop.title, "Dadar Flower Market");
    assert_eq!(shop.description, "Wholesale flowers");
    assert!(!shop.has_image());

    let place = &results[1];
    assert_eq!(place.source_type, SourceType::Place);
    assert_eq!(place.description, "Early mornings");
}

#[tokio::test]
async fn untitled_documents_are_searchable_by_fallback_title() {
    let store = FakeStore::new().with_doc("shops", "s", json!({ "description": "mystery stall" }));
    let (_, agg) = aggregator(store);
    let results = agg.search("untitled").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Untitled");
}

#[tokio::test]
async fn same_raw_id_in_two_sources_stays_distinct() {
    let store = FakeStore::new()
        .with_doc("hotels", "42", json!({ "title": "Kohinoor" }))
        .with_doc("shops", "42", json!({ "name": "Kohinoor" }));
    let (_, agg) = aggregator(store);

    let results = agg.search("kohinoor").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_ne!(results[0].key(), results[1].key());
    let list_keys: HashSet<String> = results.iter().map(|r| r.list_key()).collect();
    assert_eq!(list_keys.len(), 2);
}

#[tokio::test]
async fn one_failing_source_fails_the_whole_search() {
    let (_, agg) = aggregator(dadar_store().failing("events"));
    let err = agg.search("dadar").await.unwrap_err();
    assert_eq!(err.source_type(), SourceType::Event);
    assert!(matches!(err, SearchError::SourceFetch { .. }));

    let outcome = agg.run("dadar", FailurePolicy::AllOrNothing).await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn tolerant_search_keeps_other_sources() {
    let (_, agg) = aggregator(dadar_store().failing("events"));
    let partial = agg.search_tolerant("dadar").await;

    assert_eq!(partial.results.len(), 5);
    assert!(partial
        .results
        .iter()
        .all(|r| r.source_type != SourceType::Event));
    assert_eq!(partial.failed.len(), 1);
    assert_eq!(partial.failed[0].source_type, SourceType::Event);

    match agg.run("dadar", FailurePolicy::Partial).await {
        Ok(SearchOutcome::Partial(p)) => assert_eq!(p.failed.len(), 1),
        other => panic!("expected partial outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn partial_policy_without_failures_is_complete() {
    let (_, agg) = aggregator(dadar_store());
    match agg.run("aaswad", FailurePolicy::Partial).await {
        Ok(SearchOutcome::Complete(results)) => assert_eq!(results.len(), 1),
        other => panic!("expected complete outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn custom_source_table_limits_fan_out() {
    let store = Arc::new(dadar_store());
    let agg = SearchAggregator::with_sources(
        Arc::clone(&store) as Arc<dyn dadar_store::DocumentStore>,
        vec![*dadar_core::descriptor_for(SourceType::Blog)],
    );
    let results = agg.search("dadar").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(store.calls(), 1);
    assert_eq!(agg.sources().len(), 1);
}
