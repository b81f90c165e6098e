//! Conversions from the inner layers' error types, so status mapping lives
//! in exactly one place.

use crate::{ApiError, ApiErrorCode};
use waypoint_model::{MutationError, MutationErrorCode, ValidationError};
use waypoint_store::{AssetError, AssetErrorCode, StoreError, StoreErrorCode};

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        let code = match err.code {
            MutationErrorCode::AlreadyExists => ApiErrorCode::AlreadyExists,
            MutationErrorCode::NotFound => ApiErrorCode::NotFound,
            _ => ApiErrorCode::Internal,
        };
        Self::new(code, err.message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let code = match err.code {
            StoreErrorCode::NotFound => ApiErrorCode::NotFound,
            StoreErrorCode::Corrupt => ApiErrorCode::CorruptData,
            StoreErrorCode::Persistence => ApiErrorCode::Persistence,
            _ => ApiErrorCode::Internal,
        };
        Self::new(code, err.message)
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        let code = match err.code {
            AssetErrorCode::NotFound => ApiErrorCode::NotFound,
            AssetErrorCode::InvalidType => ApiErrorCode::InvalidType,
            AssetErrorCode::TooLarge => ApiErrorCode::TooLarge,
            _ => ApiErrorCode::Internal,
        };
        Self::new(code, err.message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_payload(err.0)
    }
}
