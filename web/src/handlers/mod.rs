//! HTTP request handlers, organized by resource.

pub mod algorithms;
pub mod auth;
pub mod health;

pub use health::health_check;
