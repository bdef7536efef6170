//! In-memory fakes for the photo service's collaborators

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use shared::models::photo::{Vehicle, VehiclePhoto};
use uuid::Uuid;

use crate::access::VehicleDirectory;
use crate::db::{BoxError, PhotoStore, StoreError};
use crate::storage::{BlobStore, StorageError};

#[derive(Default)]
pub struct MemoryPhotoStore {
    rows: Mutex<HashMap<Uuid, VehiclePhoto>>,
    rebalances: AtomicU64,
    fail_remove: AtomicBool,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_for(&self, vehicle_id: i64) -> Vec<VehiclePhoto> {
        let mut rows: Vec<VehiclePhoto> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.position);
        rows
    }

    pub fn rebalance_count(&self) -> u64 {
        self.rebalances.load(Ordering::SeqCst)
    }

    /// Seed a row without going through the service
    pub fn seed(&self, photo: VehiclePhoto) {
        self.rows.lock().unwrap().insert(photo.id, photo);
    }

    /// Make every `remove` fail with a backend error
    pub fn fail_removes(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn list_ordered(&self, vehicle_id: i64) -> Result<Vec<VehiclePhoto>, StoreError> {
        // Yield so concurrent callers interleave like real I/O would
        tokio::task::yield_now().await;
        Ok(self.rows_for(vehicle_id))
    }

    async fn find(&self, photo_id: Uuid) -> Result<Option<VehiclePhoto>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&photo_id).cloned())
    }

    async fn insert(&self, photo: &VehiclePhoto) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|p| p.vehicle_id == photo.vehicle_id && p.position == photo.position)
        {
            return Err(StoreError::DuplicatePosition {
                vehicle_id: photo.vehicle_id,
                position: photo.position,
            });
        }
        rows.insert(photo.id, photo.clone());
        Ok(())
    }

    async fn update_position(
        &self,
        photo_id: Uuid,
        position: i64,
    ) -> Result<VehiclePhoto, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let vehicle_id = rows
            .get(&photo_id)
            .map(|p| p.vehicle_id)
            .ok_or(StoreError::NotFound(photo_id))?;
        if rows
            .values()
            .any(|p| p.id != photo_id && p.vehicle_id == vehicle_id && p.position == position)
        {
            return Err(StoreError::DuplicatePosition {
                vehicle_id,
                position,
            });
        }
        let photo = rows
            .get_mut(&photo_id)
            .ok_or(StoreError::NotFound(photo_id))?;
        photo.position = position;
        Ok(photo.clone())
    }

    async fn remove(&self, photo_id: Uuid) -> Result<(), StoreError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        self.rows
            .lock()
            .unwrap()
            .remove(&photo_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(photo_id))
    }

    async fn rebalance(
        &self,
        vehicle_id: i64,
        positions: &[(Uuid, i64)],
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        for (id, position) in positions {
            if let Some(photo) = rows.get_mut(id).filter(|p| p.vehicle_id == vehicle_id) {
                photo.position = *position;
            }
        }
        self.rebalances.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Blob store with switchable failures and latency
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_put: Mutex<Option<u16>>,
    fail_delete: Mutex<Option<u16>>,
    latency: Mutex<Option<Duration>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` answer with `status`
    pub fn fail_puts(&self, status: u16) {
        *self.fail_put.lock().unwrap() = Some(status);
    }

    /// Make every `delete` answer with `status`
    pub fn fail_deletes(&self, status: u16) {
        *self.fail_delete.lock().unwrap() = Some(status);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        match latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        self.simulate_latency().await;
        if let Some(status) = *self.fail_put.lock().unwrap() {
            return Err(StorageError::new(Some(status), "put rejected"));
        }
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.simulate_latency().await;
        if let Some(status) = *self.fail_delete.lock().unwrap() {
            return Err(StorageError::new(Some(status), "delete rejected"));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://photos.test/{key}")
    }
}

/// Fixed set of vehicles
#[derive(Default)]
pub struct StaticVehicles {
    vehicles: HashMap<i64, Vehicle>,
}

impl StaticVehicles {
    pub fn new(vehicles: impl IntoIterator<Item = Vehicle>) -> Self {
        Self {
            vehicles: vehicles.into_iter().map(|v| (v.id, v)).collect(),
        }
    }
}

#[async_trait]
impl VehicleDirectory for StaticVehicles {
    async fn find_vehicle(&self, vehicle_id: i64) -> Result<Option<Vehicle>, BoxError> {
        Ok(self.vehicles.get(&vehicle_id).copied())
    }
}
