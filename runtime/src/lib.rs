//! # Algorithm Hub Runtime
//!
//! The algorithm dispatcher.
//!
//! [`AlgorithmService`] routes a request to the matching numeric routine and
//! wraps execution in lifecycle tracking persisted through an injected
//! [`RecordStore`](algorithm_hub_core::RecordStore).
//!
//! ## Control Flow
//!
//! 1. Persist a new record in `processing` (store failure aborts; no routine runs)
//! 2. Run the routine for the requested kind on the blocking thread pool
//! 3. On success, mark the record `completed` and persist the result
//! 4. On failure, mark the record `failed`, persist the message, and surface
//!    [`ServiceError::Execution`]
//!
//! Persistence is best-effort, not transactional: if step 3 or 4 fails to
//! write, the storage error propagates and the row stays `processing`.
//!
//! ## Example
//!
//! ```
//! use algorithm_hub_core::AlgorithmKind;
//! use algorithm_hub_runtime::AlgorithmService;
//! use algorithm_hub_testing::{InMemoryRecordStore, test_clock};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = AlgorithmService::new(
//!     Arc::new(InMemoryRecordStore::new()),
//!     Arc::new(test_clock()),
//! );
//!
//! let result = service
//!     .process(AlgorithmKind::Fibonacci, json!({ "n": 10 }), "u1")
//!     .await?;
//! assert_eq!(result.result["result"], 55);
//! # Ok(())
//! # }
//! ```

mod service;

/// Prometheus metrics for observability
pub mod metrics;

pub use error::ServiceError;
pub use service::{AlgorithmResult, AlgorithmService, DEFAULT_HISTORY_LIMIT};

/// Error types for the dispatcher
pub mod error {
    use algorithm_hub_core::{AlgorithmError, AlgorithmKind, LifecycleError, RequestId, StorageError};
    use thiserror::Error;

    /// Errors surfaced by [`AlgorithmService`](crate::AlgorithmService).
    ///
    /// The dispatcher never retries; every failure reaches the caller.
    #[derive(Error, Debug)]
    pub enum ServiceError {
        /// The request was rejected before any record was written
        /// (for example an unknown algorithm name).
        #[error(transparent)]
        InvalidInput(AlgorithmError),

        /// The record store failed.
        ///
        /// Also used for lookups of records that do not exist or belong to
        /// another caller ([`StorageError::NotFound`]).
        #[error(transparent)]
        Storage(#[from] StorageError),

        /// The routine failed after the record was persisted.
        ///
        /// The record has already been marked `failed` with the same message.
        #[error("Algorithm processing failed: {source}")]
        Execution {
            /// Record that tracks the failed invocation.
            request_id: RequestId,
            /// Algorithm that failed.
            kind: AlgorithmKind,
            /// The routine's error.
            source: AlgorithmError,
        },

        /// The routine's blocking task was cancelled or panicked.
        ///
        /// The record has already been marked `failed` with `reason`.
        #[error("Algorithm execution aborted: {reason}")]
        Aborted {
            /// Record that tracks the aborted invocation.
            request_id: RequestId,
            /// Algorithm that was running.
            kind: AlgorithmKind,
            /// Join failure reported by the runtime.
            reason: String,
        },

        /// A lifecycle contract was violated or a stored row was malformed.
        #[error(transparent)]
        Lifecycle(#[from] LifecycleError),
    }
}
