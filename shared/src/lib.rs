//! Shared types for the fleet services
//!
//! Error codes, the caller-facing error type and the row/response models
//! used by more than one crate.

pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
