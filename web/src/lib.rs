//! Axum HTTP boundary for Algorithm Hub.
//!
//! The dispatcher and routines live in `algorithm-hub-runtime` and
//! `algorithm-hub-core`; this crate only translates HTTP to calls on
//! [`AlgorithmService`](algorithm_hub_runtime::AlgorithmService) and back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, bearer tokens
//! │  - Request parsing and validation       │  ← CORS, tracing, correlation IDs
//! │  - Error → status code mapping          │
//! ├─────────────────────────────────────────┤
//! │         Dispatcher + Routines           │
//! │  - Lifecycle tracking                   │  ← Record store behind a trait
//! │  - Pure numeric routines                │  ← No I/O
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **Correlation ID** assigned by [`middleware::correlation_id_layer`]
//! 2. **Caller verified** by the [`AuthUser`] extractor
//! 3. **Payload validated** with `algorithm_hub_core::validate_input`
//! 4. **Dispatch** through the `AlgorithmService`
//! 5. **Map result** to JSON, or [`AppError`] to a status code
//!
//! # Example
//!
//! ```ignore
//! let state = AppState::new(service, verifier);
//! let app = build_router(state, &["http://localhost:3000".to_string()]);
//! axum::serve(listener, app).await?;
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{AuthUser, BearerToken, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::build_router;
pub use state::AppState;
