//! Unified error codes for the fleet services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 3xxx: Rental/vehicle errors
//! - 4xxx: Photo errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Rental / Vehicle ====================
    /// Vehicle not found
    VehicleNotFound = 3101,
    /// Referenced vehicle does not exist
    InvalidVehicle = 3102,

    // ==================== 4xxx: Photo ====================
    /// Photo not found
    PhotoNotFound = 4001,
    /// Photo content type is not accepted
    UnsupportedMediaType = 4002,
    /// Photo payload exceeds the size limit
    PayloadTooLarge = 4003,
    /// Photo payload is empty
    EmptyPayload = 4004,
    /// Position already taken within the vehicle's collection
    PositionConflict = 4101,
    /// No free position left between the requested neighbours
    PositionExhausted = 4102,
    /// Photo upload to object storage failed
    PhotoUploadFailed = 4501,
    /// Photo removal from object storage failed
    PhotoDeleteFailed = 4502,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether the failed operation may succeed when retried unchanged
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::PositionExhausted | ErrorCode::PositionConflict
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Rental / Vehicle
            ErrorCode::VehicleNotFound => "Vehicle not found",
            ErrorCode::InvalidVehicle => "Referenced vehicle does not exist",

            // Photo
            ErrorCode::PhotoNotFound => "Photo not found",
            ErrorCode::UnsupportedMediaType => "Only image/png and image/jpeg are accepted",
            ErrorCode::PayloadTooLarge => "Photo exceeds the maximum upload size",
            ErrorCode::EmptyPayload => "Photo payload is empty",
            ErrorCode::PositionConflict => "Position already taken",
            ErrorCode::PositionExhausted => "No free position between neighbours",
            ErrorCode::PhotoUploadFailed => "Photo upload failed",
            ErrorCode::PhotoDeleteFailed => "Photo deletion failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Rental / Vehicle
            3101 => Ok(ErrorCode::VehicleNotFound),
            3102 => Ok(ErrorCode::InvalidVehicle),

            // Photo
            4001 => Ok(ErrorCode::PhotoNotFound),
            4002 => Ok(ErrorCode::UnsupportedMediaType),
            4003 => Ok(ErrorCode::PayloadTooLarge),
            4004 => Ok(ErrorCode::EmptyPayload),
            4101 => Ok(ErrorCode::PositionConflict),
            4102 => Ok(ErrorCode::PositionExhausted),
            4501 => Ok(ErrorCode::PhotoUploadFailed),
            4502 => Ok(ErrorCode::PhotoDeleteFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::VehicleNotFound.code(), 3101);
        assert_eq!(ErrorCode::PhotoNotFound.code(), 4001);
        assert_eq!(ErrorCode::PhotoUploadFailed.code(), 4501);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_known_codes() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidVehicle,
            ErrorCode::UnsupportedMediaType,
            ErrorCode::PositionExhausted,
            ErrorCode::PhotoDeleteFailed,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_code() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        assert_eq!(
            InvalidErrorCode(4999).to_string(),
            "invalid error code: 4999"
        );
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ErrorCode::PositionExhausted.is_retryable());
        assert!(ErrorCode::PositionConflict.is_retryable());
        assert!(!ErrorCode::DatabaseError.is_retryable());
        assert!(!ErrorCode::PhotoUploadFailed.is_retryable());
        assert!(!ErrorCode::PermissionDenied.is_retryable());
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::PayloadTooLarge).unwrap();
        assert_eq!(json, "4003");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::UnsupportedMediaType);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
