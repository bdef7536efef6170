//! Photo gallery coordinator
//!
//! Keeps the photo rows (ordering, source of truth) and the object store
//! (blob content) consistent without a shared transaction:
//!
//! ```text
//! create:  validate → authorize → [lock] append position → insert row → [unlock]
//!          → put blob ── ok ──→ Active
//!                       └ err ─→ remove row (compensate) → PhotoUploadFailed
//!
//! delete:  authorize → delete blob ── ok ──→ remove row
//!                                  └ err ─→ row untouched → PhotoDeleteFailed
//!
//! move:    authorize → [lock] read gallery → allocate → update row → [unlock]
//! ```
//!
//! Create writes the row before the blob so a crash never leaves content
//! nobody references; delete removes the blob before the row so a row never
//! points at content that is already gone.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::error::{AppError, ErrorCode};
use shared::models::photo::{Vehicle, VehiclePhoto};
use uuid::Uuid;

use crate::access::{RentalIdentity, VehicleDirectory};
use crate::db::PhotoStore;
use crate::error::{ServiceError, ServiceResult};
use crate::locks::{VehicleGuard, VehicleLocks};
use crate::position::{AllocatorError, PositionAllocator};
use crate::storage::{BlobStore, MediaType, StorageError, photo_key};

pub struct PhotoService {
    photos: Arc<dyn PhotoStore>,
    blobs: Arc<dyn BlobStore>,
    vehicles: Arc<dyn VehicleDirectory>,
    locks: VehicleLocks,
    positions: PositionAllocator,
    max_photo_bytes: usize,
    storage_timeout: Option<Duration>,
}

impl PhotoService {
    pub fn new(
        photos: Arc<dyn PhotoStore>,
        blobs: Arc<dyn BlobStore>,
        vehicles: Arc<dyn VehicleDirectory>,
        positions: PositionAllocator,
    ) -> Self {
        Self {
            photos,
            blobs,
            vehicles,
            locks: VehicleLocks::new(),
            positions,
            max_photo_bytes: usize::MAX,
            storage_timeout: None,
        }
    }

    pub fn with_max_photo_bytes(mut self, max_photo_bytes: usize) -> Self {
        self.max_photo_bytes = max_photo_bytes;
        self
    }

    pub fn with_storage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// A vehicle's photos in display order.
    pub async fn list(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
    ) -> ServiceResult<Vec<VehiclePhoto>> {
        self.authorize(identity, vehicle_id, ErrorCode::VehicleNotFound)
            .await?;
        Ok(self.photos.list_ordered(vehicle_id).await?)
    }

    /// Store a new photo at the end of the vehicle's gallery.
    pub async fn create(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<VehiclePhoto> {
        let media = MediaType::from_content_type(content_type).ok_or_else(|| {
            AppError::new(ErrorCode::UnsupportedMediaType).with_detail("content_type", content_type)
        })?;
        if bytes.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyPayload).into());
        }
        if bytes.len() > self.max_photo_bytes {
            return Err(AppError::new(ErrorCode::PayloadTooLarge)
                .with_detail("size", bytes.len())
                .with_detail("max", self.max_photo_bytes)
                .into());
        }

        let vehicle = self
            .authorize(identity, vehicle_id, ErrorCode::InvalidVehicle)
            .await?;

        let photo_id = Uuid::new_v4();
        let storage_key = photo_key(vehicle.id, photo_id, media);
        tracing::debug!(vehicle_id, photo_id = %photo_id, size = bytes.len(), "Photo upload requested");

        let photo = {
            let guard = self.locks.acquire(vehicle.id).await;
            let gallery = self.photos.list_ordered(vehicle.id).await?;
            let position = self.append_position(&guard, gallery).await?;

            let photo = VehiclePhoto {
                id: photo_id,
                vehicle_id: vehicle.id,
                position,
                url: self.blobs.public_url(&storage_key),
                storage_key,
                content_type: media.content_type().to_string(),
                created_at: chrono::Utc::now().timestamp_millis(),
            };
            // The reserved row holds the position, so the lock can go before the upload
            self.photos.insert(&photo).await?;
            photo
        };
        tracing::debug!(vehicle_id, photo_id = %photo.id, position = photo.position, "Photo row reserved");

        let size = bytes.len();
        let stored = self
            .storage_call(self.blobs.put(&photo.storage_key, bytes, media.content_type()))
            .await;

        if let Err(e) = stored {
            tracing::warn!(
                vehicle_id,
                photo_id = %photo.id,
                key = %photo.storage_key,
                error = %e,
                "Photo upload failed, removing reserved row"
            );
            if let Err(comp) = self.photos.remove(photo.id).await {
                tracing::error!(
                    vehicle_id,
                    photo_id = %photo.id,
                    error = %comp,
                    "Failed to remove reserved photo row after upload failure"
                );
            }
            return Err(upload_failed(&e).into());
        }

        // A rebalance may have renumbered the row while the upload ran
        let photo = self
            .photos
            .find(photo.id)
            .await?
            .ok_or_else(|| photo_not_found(photo.id))?;

        tracing::info!(
            vehicle_id,
            photo_id = %photo.id,
            position = photo.position,
            size,
            "Photo uploaded"
        );
        Ok(photo)
    }

    /// Move a photo so it ends up at `target_index` (zero-based) in the gallery.
    pub async fn move_photo(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
        photo_id: Uuid,
        target_index: i64,
    ) -> ServiceResult<VehiclePhoto> {
        let photo = self.load_photo(identity, vehicle_id, photo_id).await?;

        let guard = self.locks.acquire(photo.vehicle_id).await;
        let gallery = self.photos.list_ordered(photo.vehicle_id).await?;
        let current_index = gallery
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or_else(|| photo_not_found(photo_id))?;

        let max_index = gallery.len() - 1;
        let target = usize::try_from(target_index)
            .ok()
            .filter(|&t| t <= max_index)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Target index {target_index} out of range 0..={max_index}"
                ))
                .with_detail("target_index", target_index)
                .with_detail("max_index", max_index)
            })?;

        let current = gallery[current_index].clone();
        if current_index == target {
            tracing::debug!(vehicle_id, photo_id = %photo_id, target, "Photo already in place");
            return Ok(current);
        }

        let new_position = match self.move_position(&gallery, photo_id, target) {
            Err(AllocatorError::Exhausted { lo, hi }) => {
                tracing::warn!(vehicle_id, lo, hi, "Gallery positions exhausted, rebalancing");
                let gallery = self.rebalance(&guard, gallery).await?;
                self.move_position(&gallery, photo_id, target)
                    .map_err(allocator_error)?
            }
            other => other.map_err(allocator_error)?,
        };

        // Rebalancing may already have placed the photo correctly
        let stored = self
            .photos
            .find(photo_id)
            .await?
            .ok_or_else(|| photo_not_found(photo_id))?;
        if stored.position == new_position {
            return Ok(stored);
        }

        let moved = self.photos.update_position(photo_id, new_position).await?;
        tracing::info!(
            vehicle_id,
            photo_id = %photo_id,
            from = current.position,
            to = moved.position,
            target,
            "Photo moved"
        );
        Ok(moved)
    }

    /// Delete a photo's blob, then its row.
    pub async fn delete(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
        photo_id: Uuid,
    ) -> ServiceResult<()> {
        let photo = self.load_photo(identity, vehicle_id, photo_id).await?;

        if let Err(e) = self.storage_call(self.blobs.delete(&photo.storage_key)).await {
            tracing::warn!(
                vehicle_id,
                photo_id = %photo_id,
                key = %photo.storage_key,
                error = %e,
                "Photo blob deletion failed, keeping row"
            );
            return Err(delete_failed(&e).into());
        }

        self.photos.remove(photo_id).await?;
        tracing::info!(vehicle_id, photo_id = %photo_id, "Photo deleted");
        Ok(())
    }

    // ── Helpers ──

    /// Resolve the vehicle and check the caller's rental owns it.
    async fn authorize(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
        missing: ErrorCode,
    ) -> ServiceResult<Vehicle> {
        let vehicle = self
            .vehicles
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| AppError::new(missing).with_detail("vehicle_id", vehicle_id))?;

        if !identity.owns(&vehicle) {
            tracing::debug!(
                vehicle_id,
                rental_id = identity.rental_id,
                "Rental does not own vehicle"
            );
            return Err(AppError::forbidden("Vehicle belongs to another rental").into());
        }
        Ok(vehicle)
    }

    async fn load_photo(
        &self,
        identity: &RentalIdentity,
        vehicle_id: i64,
        photo_id: Uuid,
    ) -> ServiceResult<VehiclePhoto> {
        let vehicle = self
            .authorize(identity, vehicle_id, ErrorCode::VehicleNotFound)
            .await?;
        let photo = self
            .photos
            .find(photo_id)
            .await?
            .ok_or_else(|| photo_not_found(photo_id))?;

        if photo.vehicle_id != vehicle.id {
            return Err(AppError::forbidden("Photo belongs to another vehicle")
                .with_detail("photo_id", photo_id.to_string())
                .into());
        }
        Ok(photo)
    }

    async fn append_position(
        &self,
        guard: &VehicleGuard,
        gallery: Vec<VehiclePhoto>,
    ) -> ServiceResult<i64> {
        let existing: Vec<i64> = gallery.iter().map(|p| p.position).collect();
        match self.positions.append_position(&existing) {
            Err(AllocatorError::Exhausted { lo, hi }) => {
                tracing::warn!(
                    vehicle_id = guard.vehicle_id(),
                    lo,
                    hi,
                    "Gallery positions exhausted, rebalancing"
                );
                let gallery = self.rebalance(guard, gallery).await?;
                let existing: Vec<i64> = gallery.iter().map(|p| p.position).collect();
                self.positions
                    .append_position(&existing)
                    .map_err(allocator_error)
            }
            other => other.map_err(allocator_error),
        }
    }

    fn move_position(
        &self,
        gallery: &[VehiclePhoto],
        photo_id: Uuid,
        target: usize,
    ) -> Result<i64, AllocatorError> {
        let others: Vec<i64> = gallery
            .iter()
            .filter(|p| p.id != photo_id)
            .map(|p| p.position)
            .collect();
        self.positions.move_position(&others, target)
    }

    /// Respace the whole gallery to the canonical layout, keeping its order.
    /// Requires the vehicle's guard.
    async fn rebalance(
        &self,
        guard: &VehicleGuard,
        mut gallery: Vec<VehiclePhoto>,
    ) -> ServiceResult<Vec<VehiclePhoto>> {
        let vehicle_id = guard.vehicle_id();
        let layout = self
            .positions
            .canonical_positions(gallery.len())
            .map_err(allocator_error)?;
        for (photo, position) in gallery.iter_mut().zip(layout) {
            photo.position = position;
        }
        let pairs: Vec<(Uuid, i64)> = gallery.iter().map(|p| (p.id, p.position)).collect();
        self.photos.rebalance(vehicle_id, &pairs).await?;
        tracing::info!(vehicle_id, photos = gallery.len(), "Gallery rebalanced");
        Ok(gallery)
    }

    async fn storage_call<F>(&self, op: F) -> Result<(), StorageError>
    where
        F: Future<Output = Result<(), StorageError>>,
    {
        match self.storage_timeout {
            Some(limit) => tokio::time::timeout(limit, op).await.unwrap_or_else(|_| {
                Err(StorageError::new(
                    None,
                    format!("object storage call timed out after {limit:?}"),
                ))
            }),
            None => op.await,
        }
    }
}

fn photo_not_found(photo_id: Uuid) -> AppError {
    AppError::new(ErrorCode::PhotoNotFound).with_detail("photo_id", photo_id.to_string())
}

fn upload_failed(e: &StorageError) -> AppError {
    let err = AppError::new(ErrorCode::PhotoUploadFailed);
    match e.status_hint {
        Some(status) => err.with_detail("storage_status", status),
        None => err,
    }
}

fn delete_failed(e: &StorageError) -> AppError {
    let err = AppError::new(ErrorCode::PhotoDeleteFailed);
    match e.status_hint {
        Some(status) => err.with_detail("storage_status", status),
        None => err,
    }
}

fn allocator_error(e: AllocatorError) -> ServiceError {
    match e {
        AllocatorError::Exhausted { lo, hi } => AppError::new(ErrorCode::PositionExhausted)
            .with_detail("lo", lo)
            .with_detail("hi", hi)
            .into(),
        AllocatorError::IndexOutOfRange { index, len } => {
            AppError::validation(format!("Target index {index} out of range 0..={len}")).into()
        }
        AllocatorError::InvalidGap(gap) => {
            AppError::with_message(ErrorCode::InternalError, format!("Invalid position gap {gap}"))
                .into()
        }
    }
}
