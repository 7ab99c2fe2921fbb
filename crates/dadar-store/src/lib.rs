//! Document store access for the Dadar directory.
//!
//! [`DocumentStore`] is the read seam the search aggregator depends on. The
//! production implementation, [`FirestoreClient`], talks to the Firestore REST
//! API; tests substitute in-memory fakes.

pub mod client;
pub mod error;
pub mod types;
pub mod value;

mod seed;

use async_trait::async_trait;
use dadar_core::RawDocument;

pub use client::FirestoreClient;
pub use error::StoreError;
pub use value::{decode_fields, encode_fields};

/// Read access to a document store that can only enumerate whole collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name for logs.
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    /// Every document in `collection`, in the backend's enumeration order.
    async fn list_all(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError>;
}
