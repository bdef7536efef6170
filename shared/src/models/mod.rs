//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Fleet IDs are `i64`; photo IDs are UUIDs.

pub mod photo;

// Re-exports
pub use photo::*;
