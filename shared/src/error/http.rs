//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::VehicleNotFound | Self::PhotoNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::InvalidVehicle | Self::PositionConflict | Self::PositionExhausted => {
                StatusCode::CONFLICT
            }

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 413 / 415
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 500 Internal Server Error
            Self::PhotoUploadFailed
            | Self::PhotoDeleteFailed
            | Self::InternalError
            | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed | Self::EmptyPayload => StatusCode::BAD_REQUEST,
        }
    }
}
