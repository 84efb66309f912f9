//! Record store trait and related types for request history persistence.
//!
//! A record store is an external table store reached through four generic
//! operations over named tables. The dispatcher only ever talks to it
//! through the [`RecordStore`] trait, which keeps the lifecycle logic
//! testable without network mocking.
//!
//! # Implementations
//!
//! - `PostgrestRecordStore` (in `algorithm-hub-postgrest`): Production implementation
//! - `InMemoryRecordStore` (in `algorithm-hub-testing`): Fast, deterministic testing
//!
//! # Example
//!
//! ```no_run
//! use algorithm_hub_core::record_store::{RecordFilter, RecordStore, StorageError};
//!
//! async fn history(store: &dyn RecordStore) -> Result<usize, StorageError> {
//!     let filter = RecordFilter::new().eq("user_id", "u1");
//!     let rows = store.list("algorithm_requests", &filter, Some(50)).await?;
//!     Ok(rows.len())
//! }
//! ```

use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// One row: column name → JSON value.
pub type Record = Map<String, Value>;

/// Boxed future returned by every [`RecordStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Errors that can occur during record store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store could not be reached.
    #[error("Record store connection error: {0}")]
    Connection(String),

    /// The store answered with a non-success status.
    #[error("Record store returned {status}: {message}")]
    Api {
        /// HTTP-like status code reported by the store.
        status: u16,
        /// Body or reason returned by the store.
        message: String,
    },

    /// A row could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No row with this id exists in the table.
    #[error("Record {id} not found in {table}")]
    NotFound {
        /// Table that was queried.
        table: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// The store refused the operation (maintenance, injected fault).
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

/// Conjunction of column equality predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    conditions: Vec<(String, Value)>,
}

impl RecordFilter {
    /// Empty filter matching every row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Add a `column == value` predicate.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// The predicates, in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Whether `record` satisfies every predicate. A missing column never matches.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| record.get(column) == Some(expected))
    }
}

/// Generic CRUD access to named tables.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the dispatcher shares one store
/// across all concurrent requests and relies on the store for its own
/// concurrency control.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the trait can
/// be used as `Arc<dyn RecordStore>`.
pub trait RecordStore: Send + Sync {
    /// Insert a row and return it as stored (including any generated columns).
    ///
    /// # Errors
    ///
    /// Any [`StorageError`] reported by the backend.
    fn create<'a>(&'a self, table: &'a str, fields: Record) -> StoreFuture<'a, Record>;

    /// Merge `fields` into the row whose `id` column equals `id`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if no such row exists, or any backend error.
    fn update<'a>(&'a self, table: &'a str, id: &'a str, fields: Record)
    -> StoreFuture<'a, Record>;

    /// Rows matching `filter`, at most `limit` of them when given.
    ///
    /// Ordering is whatever the backend returns by default.
    ///
    /// # Errors
    ///
    /// Any [`StorageError`] reported by the backend.
    fn list<'a>(
        &'a self,
        table: &'a str,
        filter: &'a RecordFilter,
        limit: Option<usize>,
    ) -> StoreFuture<'a, Vec<Record>>;

    /// The row whose `id` column equals `id`, if any.
    ///
    /// # Errors
    ///
    /// Any [`StorageError`] reported by the backend.
    fn get<'a>(&'a self, table: &'a str, id: &'a str) -> StoreFuture<'a, Option<Record>>;
}
