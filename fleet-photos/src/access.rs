//! Vehicle ownership
//!
//! The surrounding fleet application owns sessions, rentals and vehicles.
//! This crate only needs to know which rental the caller acts for and which
//! rental a vehicle belongs to.

use async_trait::async_trait;
use shared::models::photo::Vehicle;

use crate::db::BoxError;

/// Looks up vehicles by id.
#[async_trait]
pub trait VehicleDirectory: Send + Sync {
    async fn find_vehicle(&self, vehicle_id: i64) -> Result<Option<Vehicle>, BoxError>;
}

/// Rental identified by the caller's authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalIdentity {
    pub rental_id: i64,
}

impl RentalIdentity {
    pub fn new(rental_id: i64) -> Self {
        Self { rental_id }
    }

    pub fn owns(&self, vehicle: &Vehicle) -> bool {
        vehicle.rental_id == self.rental_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owns_only_vehicles_of_same_rental() {
        let identity = RentalIdentity::new(3);
        assert!(identity.owns(&Vehicle { id: 10, rental_id: 3 }));
        assert!(!identity.owns(&Vehicle { id: 11, rental_id: 4 }));
    }
}
