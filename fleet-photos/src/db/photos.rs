//! Vehicle photo rows in PostgreSQL

use async_trait::async_trait;
use shared::models::photo::VehiclePhoto;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PhotoStore, StoreError};

const PHOTO_COLUMNS: &str = "id, vehicle_id, position, storage_key, url, content_type, created_at";

#[derive(Clone)]
pub struct PgPhotoStore {
    pool: PgPool,
}

impl PgPhotoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Collision on update; the row may have been deleted in the meantime
fn position_conflict(photo_id: Uuid, vehicle_id: Option<i64>, position: i64) -> StoreError {
    match vehicle_id {
        Some(vehicle_id) => StoreError::DuplicatePosition {
            vehicle_id,
            position,
        },
        None => StoreError::NotFound(photo_id),
    }
}

#[async_trait]
impl PhotoStore for PgPhotoStore {
    async fn list_ordered(&self, vehicle_id: i64) -> Result<Vec<VehiclePhoto>, StoreError> {
        let photos: Vec<VehiclePhoto> = sqlx::query_as(&format!(
            "SELECT {PHOTO_COLUMNS} FROM vehicle_photos WHERE vehicle_id = $1 ORDER BY position"
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(photos)
    }

    async fn find(&self, photo_id: Uuid) -> Result<Option<VehiclePhoto>, StoreError> {
        let photo: Option<VehiclePhoto> = sqlx::query_as(&format!(
            "SELECT {PHOTO_COLUMNS} FROM vehicle_photos WHERE id = $1"
        ))
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(photo)
    }

    async fn insert(&self, photo: &VehiclePhoto) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO vehicle_photos (id, vehicle_id, position, storage_key, url, content_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(photo.id)
        .bind(photo.vehicle_id)
        .bind(photo.position)
        .bind(&photo.storage_key)
        .bind(&photo.url)
        .bind(&photo.content_type)
        .bind(photo.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicatePosition {
                    vehicle_id: photo.vehicle_id,
                    position: photo.position,
                }
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn update_position(
        &self,
        photo_id: Uuid,
        position: i64,
    ) -> Result<VehiclePhoto, StoreError> {
        let result: Result<Option<VehiclePhoto>, sqlx::Error> = sqlx::query_as(&format!(
            "UPDATE vehicle_photos SET position = $2 WHERE id = $1 RETURNING {PHOTO_COLUMNS}"
        ))
        .bind(photo_id)
        .bind(position)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(photo)) => Ok(photo),
            Ok(None) => Err(StoreError::NotFound(photo_id)),
            Err(e) if is_unique_violation(&e) => {
                // Report the conflicting gallery; the row itself is unchanged
                let vehicle_id: Option<i64> =
                    sqlx::query_scalar("SELECT vehicle_id FROM vehicle_photos WHERE id = $1")
                        .bind(photo_id)
                        .fetch_optional(&self.pool)
                        .await?;
                Err(position_conflict(photo_id, vehicle_id, position))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, photo_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM vehicle_photos WHERE id = $1")
            .bind(photo_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(photo_id));
        }
        Ok(())
    }

    async fn rebalance(
        &self,
        vehicle_id: i64,
        positions: &[(Uuid, i64)],
    ) -> Result<(), StoreError> {
        if positions.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = positions.iter().map(|(id, _)| *id).collect();
        let values: Vec<i64> = positions.iter().map(|(_, p)| *p).collect();

        let mut tx = self.pool.begin().await?;

        // Intermediate states of the bulk update may collide; check at commit
        sqlx::query("SET CONSTRAINTS vehicle_photos_position_key DEFERRED")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE vehicle_photos AS p
            SET position = v.position
            FROM UNNEST($2::uuid[], $3::bigint[]) AS v(id, position)
            WHERE p.id = v.id AND p.vehicle_id = $1
            "#,
        )
        .bind(vehicle_id)
        .bind(&ids)
        .bind(&values)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
