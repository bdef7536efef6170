//! Ordered vehicle photo galleries
//!
//! Each vehicle owns a gallery of photos kept in a user-chosen order.
//! Photo rows (and their sparse `position` keys) live in PostgreSQL; the
//! image bytes live in S3. [`service::PhotoService`] keeps the two in step.
//!
//! - [`position`]: sparse position allocation (append, move, rebalance)
//! - [`locks`]: per-vehicle serialization of position writes
//! - [`db`]: photo rows and vehicle lookup
//! - [`storage`]: object storage bridge
//! - [`service`]: create / move / delete with compensation

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod locks;
pub mod position;
pub mod service;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

pub use access::RentalIdentity;
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use service::PhotoService;
pub use state::AppState;
