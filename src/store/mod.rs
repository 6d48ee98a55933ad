//! Document storage backends.
//!
//! The store is a schemaless key-value service partitioned into
//! [`Collection`]s. It offers point lookups, full overwrites, deletes and
//! filtered scans by field equality. There is no join, no batched get and
//! no transaction spanning two calls.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::types::Collection;

/// A stored document: a flat JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// A stored document does not decode into its entity.
    #[error("Malformed document {collection}/{id}: {reason}")]
    Malformed {
        /// Collection of the document.
        collection: Collection,
        /// Document id.
        id: String,
        /// Decoder message.
        reason: String,
    },
    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
    /// Database error.
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trait for document storage backends.
///
/// Implementations must be safe for concurrent use: one instance is shared
/// by every in-flight request for the lifetime of the process.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Fetch a document by id.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or fully overwrite a document.
    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing id succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Every document in a collection, in backend order.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Release backend resources at shutdown.
    async fn close(&self) {}
}

/// The process-wide store handle.
///
/// Created once at startup and cloned into every request. Each call is
/// forwarded to the backend unchanged (no cache, batching, retry or
/// timeout) and recorded as a `store_op` metric.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<dyn DocumentStore>,
}

impl StoreHandle {
    /// Wrap a backend.
    pub fn new<S: DocumentStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wrap an already shared backend.
    pub fn from_arc(inner: Arc<dyn DocumentStore>) -> Self {
        Self { inner }
    }

    /// Backend name.
    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    /// Point lookup.
    pub async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        observe("get", collection, self.inner.get(collection, id)).await
    }

    /// Create or overwrite.
    pub async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<(), StoreError> {
        observe("set", collection, self.inner.set(collection, id, document)).await
    }

    /// Unconditional delete.
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        observe("delete", collection, self.inner.delete(collection, id)).await
    }

    /// Full collection scan.
    pub async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        observe("list", collection, self.inner.list(collection)).await
    }

    /// Filtered scan by field equality.
    pub async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        observe("find_by", collection, self.inner.find_by(collection, field, value)).await
    }

    /// Backend health check.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    /// Tear down the backend.
    pub async fn close(&self) {
        info!(backend = self.backend_name(), "Closing document store");
        self.inner.close().await;
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("backend", &self.backend_name())
            .finish()
    }
}

async fn observe<T, F>(op: &'static str, collection: Collection, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let start = Instant::now();
    let result = call.await;
    record_store_op(op, collection, start.elapsed().as_millis() as u64, result.is_ok());
    result
}

/// Record a store round trip.
///
/// One event is emitted per call, so the number of `store_op` events for a
/// request equals the number of edges resolved in its field tree.
pub fn record_store_op(op: &str, collection: Collection, latency_ms: u64, success: bool) {
    let status = if success { "success" } else { "error" };
    info!(
        target: "docgraph::metrics",
        metric_type = "store_op",
        op = op,
        collection = %collection,
        status = status,
        latency_ms = latency_ms,
        "store_op_metric"
    );
}

pub use memory::InMemoryDocumentStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;
