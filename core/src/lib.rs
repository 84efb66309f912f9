//! # Algorithm Hub Core
//!
//! Core types for the Algorithm Hub service.
//!
//! This crate holds everything that can be reasoned about without I/O:
//!
//! - **Routines**: Fibonacci, primality, sorting and matrix multiplication
//! - **Algorithm catalog**: the closed set of [`AlgorithmKind`]s and their input shapes
//! - **Lifecycle record**: the per-invocation [`AlgorithmRequest`] state machine
//! - **Record store contract**: the [`RecordStore`] trait the dispatcher persists through
//! - **Environment**: injected dependencies such as the [`Clock`](environment::Clock)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Closed enums matched exhaustively (adding an algorithm is a compile error until handled)
//! - Dependency Injection via traits, never global clients
//!
//! ## Example
//!
//! ```
//! use algorithm_hub_core::AlgorithmKind;
//! use serde_json::json;
//!
//! let output = AlgorithmKind::Fibonacci.execute(&json!({ "n": 10 })).unwrap();
//! assert_eq!(output["result"], 55);
//! assert_eq!(output["sequence"].as_array().map(Vec::len), Some(11));
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod error;
pub mod lifecycle;
pub mod record_store;
pub mod routines;
pub mod stats;
pub mod validation;

// Re-export commonly used types
pub use algorithm::{AlgorithmDescriptor, AlgorithmKind, catalog};
pub use chrono::{DateTime, Utc};
pub use error::AlgorithmError;
pub use lifecycle::{AlgorithmRequest, LifecycleError, RequestId, RequestStatus};
pub use record_store::{Record, RecordFilter, RecordStore, StorageError};
pub use stats::UsageStats;
pub use validation::{ValidationError, validate_input};

/// Environment module - Dependency injection traits
///
/// All time-dependent behaviour goes through these traits so the
/// dispatcher can be driven by a fixed clock in tests.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use algorithm_hub_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
