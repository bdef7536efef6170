//! Vehicle photo models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One photo in a vehicle's ordered gallery.
///
/// `position` only orders photos within the same vehicle; values are sparse
/// and may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VehiclePhoto {
    pub id: Uuid,
    pub vehicle_id: i64,
    pub position: i64,
    /// Object storage key, `"{vehicle_id}/{id}.{ext}"`
    pub storage_key: String,
    /// Public URL of the stored blob
    pub url: String,
    pub content_type: String,
    /// Unix millis
    pub created_at: i64,
}

/// Vehicle as seen by the photo service: only identity and owning rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vehicle {
    pub id: i64,
    pub rental_id: i64,
}
