//! In-memory record store for fast, deterministic testing.
//!
//! [`InMemoryRecordStore`] keeps one `Vec` of rows per table, preserving
//! insertion order. Failures can be injected per operation to exercise the
//! dispatcher's storage error paths, and every call is logged so tests can
//! assert on what was (or was not) written.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use algorithm_hub_core::record_store::{Record, RecordFilter, RecordStore, StorageError, StoreFuture};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A [`RecordStore`] operation, used for failure injection and call logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `create`
    Create,
    /// `update`
    Update,
    /// `list`
    List,
    /// `get`
    Get,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Record>>,
    failures: HashMap<StoreOperation, StorageError>,
    calls: Vec<StoreOperation>,
}

/// HashMap-backed record store.
///
/// Rows without an `id` column get a fresh UUID on `create`. Clones share
/// the same underlying tables.
///
/// # Example
///
/// ```
/// use algorithm_hub_testing::{InMemoryRecordStore, StoreOperation};
/// use algorithm_hub_core::record_store::{Record, RecordStore, StorageError};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryRecordStore::new();
/// let row = store.create("algorithm_requests", Record::new()).await?;
/// assert!(row.contains_key("id"));
///
/// store.fail_on(StoreOperation::Create, StorageError::Unavailable("down".into()));
/// assert!(store.create("algorithm_requests", Record::new()).await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `operation` fail with `error` until cleared.
    pub fn fail_on(&self, operation: StoreOperation, error: StorageError) {
        self.inner.write().unwrap().failures.insert(operation, error);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.inner.write().unwrap().failures.clear();
    }

    /// Operations invoked so far, in order (including failed ones).
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.inner.read().unwrap().calls.clone()
    }

    /// Snapshot of every row in `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.inner
            .read()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert a row directly, bypassing failure injection and the call log.
    pub fn seed(&self, table: &str, row: Record) {
        self.inner
            .write()
            .unwrap()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Total number of rows across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().tables.values().map(Vec::len).sum()
    }

    /// Whether no table holds any row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn enter(&self, operation: StoreOperation) -> Result<(), StorageError> {
        let mut inner = self.inner.write().unwrap();
        inner.calls.push(operation);
        inner.failures.get(&operation).cloned().map_or(Ok(()), Err)
    }
}

fn id_of(row: &Record) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create<'a>(&'a self, table: &'a str, mut fields: Record) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            self.enter(StoreOperation::Create)?;
            fields
                .entry("id")
                .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
            self.seed(table, fields.clone());
            Ok(fields)
        })
    }

    fn update<'a>(
        &'a self,
        table: &'a str,
        id: &'a str,
        fields: Record,
    ) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            self.enter(StoreOperation::Update)?;
            let mut inner = self.inner.write().unwrap();
            let row = inner
                .tables
                .get_mut(table)
                .and_then(|rows| rows.iter_mut().find(|row| id_of(row).as_deref() == Some(id)))
                .ok_or_else(|| StorageError::NotFound {
                    table: table.to_string(),
                    id: id.to_string(),
                })?;
            row.extend(fields);
            Ok(row.clone())
        })
    }

    fn list<'a>(
        &'a self,
        table: &'a str,
        filter: &'a RecordFilter,
        limit: Option<usize>,
    ) -> StoreFuture<'a, Vec<Record>> {
        Box::pin(async move {
            self.enter(StoreOperation::List)?;
            Ok(self
                .rows(table)
                .into_iter()
                .filter(|row| filter.matches(row))
                .take(limit.unwrap_or(usize::MAX))
                .collect())
        })
    }

    fn get<'a>(&'a self, table: &'a str, id: &'a str) -> StoreFuture<'a, Option<Record>> {
        Box::pin(async move {
            self.enter(StoreOperation::Get)?;
            Ok(self
                .rows(table)
                .into_iter()
                .find(|row| id_of(row).as_deref() == Some(id)))
        })
    }
}
