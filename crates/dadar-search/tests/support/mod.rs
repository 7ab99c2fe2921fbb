//! In-memory document store for aggregator and session tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dadar_core::RawDocument;
use dadar_store::{DocumentStore, StoreError};
use serde_json::Value;

#[derive(Default)]
pub struct FakeStore {
    collections: HashMap<String, Vec<RawDocument>>,
    failing: HashSet<String>,
    /// Delays consumed one per `list_all` call, in call order.
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document built from a JSON object literal.
    #[must_use]
    pub fn with_doc(mut self, collection: &str, id: &str, fields: Value) -> Self {
        let Value::Object(fields) = fields else {
            panic!("document fields must be an object");
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(RawDocument::new(id, fields));
        self
    }

    #[must_use]
    pub fn failing(mut self, collection: &str) -> Self {
        self.failing.insert(collection.to_string());
        self
    }

    /// Queue `count` calls that each wait `delay` before answering.
    #[must_use]
    pub fn with_delays(self, count: usize, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .extend(std::iter::repeat(delay).take(count));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(collection.to_string());

        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(collection) {
            return Err(StoreError::UnexpectedStatus {
                status: 503,
                url: format!("fake://{collection}"),
            });
        }
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}
