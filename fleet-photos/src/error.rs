//! Service-layer error type
//!
//! `ServiceError` bridges component errors (`StoreError`, `BoxError`) and the
//! caller-facing `AppError`, so the photo service can use `?` throughout.

use shared::error::{AppError, ErrorCode};

use crate::db::{BoxError, StoreError};

/// Service-layer error.
///
/// - `Db`: Database/infrastructure errors (logged on conversion, mapped to DatabaseError)
/// - `App`: Business-rule errors (transparent pass-through to the caller)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (sqlx, vehicle lookup, ...)
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl ServiceError {
    /// Error code the caller will observe
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::App(e) => e.code,
            ServiceError::Db(_) => ErrorCode::DatabaseError,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Db(e) => write!(f, "infrastructure error: {e}"),
            ServiceError::App(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicatePosition {
                vehicle_id,
                position,
            } => ServiceError::App(
                AppError::new(ErrorCode::PositionConflict)
                    .with_detail("vehicle_id", vehicle_id)
                    .with_detail("position", position),
            ),
            StoreError::NotFound(id) => ServiceError::App(
                AppError::new(ErrorCode::PhotoNotFound).with_detail("photo_id", id.to_string()),
            ),
            StoreError::Backend(e) => ServiceError::Db(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Photo service infrastructure error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_codes() {
        let dup: ServiceError = StoreError::DuplicatePosition {
            vehicle_id: 1,
            position: 128,
        }
        .into();
        assert_eq!(dup.code(), ErrorCode::PositionConflict);

        let missing: ServiceError = StoreError::NotFound(Uuid::new_v4()).into();
        assert_eq!(missing.code(), ErrorCode::PhotoNotFound);

        let backend: ServiceError = StoreError::Backend("connection reset".into()).into();
        assert!(matches!(backend, ServiceError::Db(_)));
        assert_eq!(backend.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn infrastructure_details_are_hidden_from_callers() {
        let err = ServiceError::Db("password authentication failed".into());
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.message, "Database error");
    }
}
