//! Vehicle lookups against the fleet application's `vehicles` table

use async_trait::async_trait;
use shared::models::photo::Vehicle;
use sqlx::PgPool;

use super::BoxError;
use crate::access::VehicleDirectory;

#[derive(Clone)]
pub struct PgVehicleDirectory {
    pool: PgPool,
}

impl PgVehicleDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleDirectory for PgVehicleDirectory {
    async fn find_vehicle(&self, vehicle_id: i64) -> Result<Option<Vehicle>, BoxError> {
        let vehicle: Option<Vehicle> =
            sqlx::query_as("SELECT id, rental_id FROM vehicles WHERE id = $1")
                .bind(vehicle_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(vehicle)
    }
}
