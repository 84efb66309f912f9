//! `AlgorithmService`: dispatch plus lifecycle persistence.

use crate::error::ServiceError;
use crate::metrics::{AlgorithmMetrics, RecordStoreMetrics};
use algorithm_hub_core::environment::Clock;
use algorithm_hub_core::lifecycle::DEFAULT_TABLE;
use algorithm_hub_core::{
    AlgorithmKind, AlgorithmRequest, RecordFilter, RecordStore, RequestId, RequestStatus,
    StorageError, UsageStats,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// History rows returned when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Normalized outcome of a successful [`AlgorithmService::process`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Lifecycle record tracking this invocation
    pub request_id: RequestId,
    /// Algorithm that ran
    pub algorithm_type: AlgorithmKind,
    /// Routine output
    pub result: Value,
    /// Created → completed wall time, e.g. `"3ms"`
    pub processing_time: Option<String>,
    /// Always [`RequestStatus::Completed`]
    pub status: RequestStatus,
}

/// Routes requests to numeric routines and tracks each one in the record store.
///
/// Holds no per-request state; clones share the same store and clock, so one
/// instance can serve any number of concurrent callers.
#[derive(Clone)]
pub struct AlgorithmService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    table: String,
}

impl std::fmt::Debug for AlgorithmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmService")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

fn storage_failure(operation: &'static str) -> impl Fn(StorageError) -> ServiceError {
    move |err| {
        RecordStoreMetrics::record_error(operation);
        tracing::error!(operation, error = %err, "Record store operation failed");
        ServiceError::Storage(err)
    }
}

impl AlgorithmService {
    /// Create a dispatcher persisting to the default `algorithm_requests` table.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Persist lifecycle records to `table` instead.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Table lifecycle records are written to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run `kind` on `input` on behalf of `user_id`, tracking the invocation.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Storage`] if the initial write fails (no routine runs)
    ///   or if the completion write fails
    /// - [`ServiceError::Execution`] if the routine rejects `input`; the record
    ///   has been marked `failed` with the routine's message
    /// - [`ServiceError::Aborted`] if the routine's blocking task did not finish
    #[tracing::instrument(skip(self, input))]
    pub async fn process(
        &self,
        kind: AlgorithmKind,
        input: Value,
        user_id: &str,
    ) -> Result<AlgorithmResult, ServiceError> {
        let request = AlgorithmRequest::new(user_id, kind, input, self.clock.now()).mark_processing()?;
        let request_id = request.id();

        self.store
            .create(&self.table, request.to_record())
            .await
            .map_err(storage_failure("create"))?;
        tracing::debug!(%request_id, "Request recorded as processing");

        let input = request.input_data().clone();
        let started = Instant::now();
        let joined = tokio::task::spawn_blocking(move || kind.execute(&input)).await;
        AlgorithmMetrics::record_execution(kind, started.elapsed());

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let reason = join_error.to_string();
                let request = request.mark_failed(
                    format!("Algorithm execution aborted: {reason}"),
                    self.clock.now(),
                )?;
                self.persist_completion(&request).await?;
                AlgorithmMetrics::record_request(kind, RequestStatus::Failed);
                tracing::error!(%request_id, error = %reason, "Routine task aborted");

                return Err(ServiceError::Aborted {
                    request_id,
                    kind,
                    reason,
                });
            }
        };

        match outcome {
            Ok(result) => {
                let request = request.mark_completed(result, self.clock.now())?;
                self.persist_completion(&request).await?;
                AlgorithmMetrics::record_request(kind, RequestStatus::Completed);
                tracing::debug!(%request_id, "Request completed");

                Ok(AlgorithmResult {
                    request_id,
                    algorithm_type: kind,
                    processing_time: request.processing_time(),
                    status: request.status(),
                    result: request.result().cloned().unwrap_or(Value::Null),
                })
            }
            Err(source) => {
                let request = request.mark_failed(source.to_string(), self.clock.now())?;
                self.persist_completion(&request).await?;
                AlgorithmMetrics::record_request(kind, RequestStatus::Failed);
                tracing::warn!(%request_id, error = %source, "Request failed");

                Err(ServiceError::Execution {
                    request_id,
                    kind,
                    source,
                })
            }
        }
    }

    /// Like [`AlgorithmService::process`], but takes the algorithm by wire name.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidInput`] for an unknown name, before the store
    /// is touched; otherwise as [`AlgorithmService::process`].
    pub async fn process_named(
        &self,
        algorithm_type: &str,
        input: Value,
        user_id: &str,
    ) -> Result<AlgorithmResult, ServiceError> {
        let kind = algorithm_type
            .parse::<AlgorithmKind>()
            .map_err(ServiceError::InvalidInput)?;
        self.process(kind, input, user_id).await
    }

    async fn persist_completion(&self, request: &AlgorithmRequest) -> Result<(), ServiceError> {
        self.store
            .update(&self.table, &request.id().to_string(), request.completion_fields())
            .await
            .map_err(storage_failure("update"))?;
        Ok(())
    }

    /// Up to `limit` (default [`DEFAULT_HISTORY_LIMIT`]) records owned by `user_id`.
    ///
    /// Ordering is the store's default.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Storage`] if the store fails, [`ServiceError::Lifecycle`]
    /// if a row cannot be decoded.
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AlgorithmRequest>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.list_owned(user_id, Some(limit)).await
    }

    /// A single record, only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] (as [`ServiceError::Storage`]) if the record
    /// does not exist or is owned by someone else.
    pub async fn get_request(
        &self,
        user_id: &str,
        id: RequestId,
    ) -> Result<AlgorithmRequest, ServiceError> {
        let id = id.to_string();
        let not_found = || StorageError::NotFound {
            table: self.table.clone(),
            id: id.clone(),
        };

        let record = self
            .store
            .get(&self.table, &id)
            .await
            .map_err(storage_failure("get"))?
            .ok_or_else(not_found)?;

        let request = AlgorithmRequest::from_record(record)?;
        if request.user_id() != user_id {
            return Err(not_found().into());
        }
        Ok(request)
    }

    /// Usage statistics over every record owned by `user_id`.
    ///
    /// # Errors
    ///
    /// As [`AlgorithmService::get_history`].
    pub async fn get_stats(&self, user_id: &str) -> Result<UsageStats, ServiceError> {
        let history = self.list_owned(user_id, None).await?;
        Ok(UsageStats::from_requests(&history))
    }

    async fn list_owned(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AlgorithmRequest>, ServiceError> {
        let filter = RecordFilter::new().eq("user_id", user_id);
        let rows = self
            .store
            .list(&self.table, &filter, limit)
            .await
            .map_err(storage_failure("list"))?;

        rows.into_iter()
            .map(|row| AlgorithmRequest::from_record(row).map_err(ServiceError::from))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use algorithm_hub_testing::{InMemoryRecordStore, StoreOperation, test_clock};
    use serde_json::json;

    fn service() -> (AlgorithmService, InMemoryRecordStore) {
        let store = InMemoryRecordStore::new();
        let service = AlgorithmService::new(Arc::new(store.clone()), Arc::new(test_clock()));
        (service, store)
    }

    #[tokio::test]
    async fn test_success_writes_create_then_update() {
        let (service, store) = service();
        let result = service
            .process(AlgorithmKind::PrimeCheck, json!({ "number": 17 }), "u1")
            .await
            .unwrap();

        assert_eq!(result.status, RequestStatus::Completed);
        assert_eq!(result.algorithm_type, AlgorithmKind::PrimeCheck);
        assert_eq!(result.result, json!({ "is_prime": true, "number": 17 }));
        assert_eq!(result.processing_time.as_deref(), Some("0ms"));
        assert_eq!(store.calls(), vec![StoreOperation::Create, StoreOperation::Update]);
    }

    #[tokio::test]
    async fn test_custom_table() {
        let (service, store) = service();
        let service = service.with_table("audit_requests");
        assert_eq!(service.table(), "audit_requests");

        service
            .process(AlgorithmKind::Sorting, json!({ "array": [2, 1] }), "u1")
            .await
            .unwrap();
        assert_eq!(store.rows("audit_requests").len(), 1);
        assert!(store.rows(DEFAULT_TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_propagates_and_leaves_processing_row() {
        let (service, store) = service();
        store.fail_on(StoreOperation::Update, StorageError::Unavailable("down".into()));

        let err = service
            .process(AlgorithmKind::Fibonacci, json!({ "n": 5 }), "u1")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Storage(StorageError::Unavailable(_))));
        assert_eq!(store.rows(DEFAULT_TABLE)[0]["status"], "processing");
    }

    #[tokio::test]
    async fn test_get_request_hides_other_users_records() {
        let (service, _store) = service();
        let result = service
            .process(AlgorithmKind::Fibonacci, json!({ "n": 3 }), "owner")
            .await
            .unwrap();

        let own = service.get_request("owner", result.request_id).await.unwrap();
        assert_eq!(own.status(), RequestStatus::Completed);

        let err = service
            .get_request("intruder", result.request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::NotFound { .. })));

        let err = service.get_request("owner", RequestId::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_history_rejects_malformed_rows() {
        let (service, store) = service();
        store.seed(
            DEFAULT_TABLE,
            serde_json::from_value(json!({ "user_id": "u1", "status": "completed" })).unwrap(),
        );

        let err = service.get_history("u1", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Lifecycle(_)));
    }

    #[test]
    fn test_execution_error_message() {
        let err = ServiceError::Execution {
            request_id: RequestId::new(),
            kind: AlgorithmKind::PrimeCheck,
            source: algorithm_hub_core::AlgorithmError::invalid_input("number is required"),
        };
        assert_eq!(err.to_string(), "Algorithm processing failed: number is required");
    }
}
