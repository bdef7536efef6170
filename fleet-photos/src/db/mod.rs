//! Database access layer
//!
//! [`PhotoStore`] is the ordered gallery store; [`PgPhotoStore`] backs it with
//! PostgreSQL. Vehicle lookups for ownership checks live in [`vehicles`].

pub mod photos;
pub mod vehicles;

pub use photos::PgPhotoStore;
pub use vehicles::PgVehicleDirectory;

use async_trait::async_trait;
use shared::models::photo::VehiclePhoto;
use thiserror::Error;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("position {position} already taken in vehicle {vehicle_id}")]
    DuplicatePosition { vehicle_id: i64, position: i64 },

    #[error("photo {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Backend(BoxError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

/// Ordered per-vehicle photo rows.
///
/// Callers serialize read-then-write sequences per vehicle (see
/// [`crate::locks::VehicleLocks`]); implementations still reject duplicate
/// positions so a missed lock cannot corrupt the order.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// All photos of a vehicle, position ascending.
    async fn list_ordered(&self, vehicle_id: i64) -> Result<Vec<VehiclePhoto>, StoreError>;

    async fn find(&self, photo_id: Uuid) -> Result<Option<VehiclePhoto>, StoreError>;

    async fn insert(&self, photo: &VehiclePhoto) -> Result<(), StoreError>;

    /// Returns the updated row.
    async fn update_position(
        &self,
        photo_id: Uuid,
        position: i64,
    ) -> Result<VehiclePhoto, StoreError>;

    async fn remove(&self, photo_id: Uuid) -> Result<(), StoreError>;

    /// Rewrite every listed photo's position in one atomic step.
    async fn rebalance(
        &self,
        vehicle_id: i64,
        positions: &[(Uuid, i64)],
    ) -> Result<(), StoreError>;
}
