// SPDX-License-Identifier: Apache-2.0

use crate::errors::{ApiError, ApiErrorCode, UNKNOWN_REQUEST_ID};
use bijux_labeler_store::{StoreError, StoreErrorCode};
use serde_json::json;

#[must_use]
pub fn api_code_for_store(code: StoreErrorCode) -> ApiErrorCode {
    match code {
        StoreErrorCode::NotFound => ApiErrorCode::NotFound,
        StoreErrorCode::AlreadyExists => ApiErrorCode::AlreadyExists,
        StoreErrorCode::InvalidName => ApiErrorCode::InvalidName,
        StoreErrorCode::InvalidPath => ApiErrorCode::InvalidPath,
        _ => ApiErrorCode::IoError,
    }
}

impl From<&StoreError> for ApiError {
    fn from(err: &StoreError) -> Self {
        ApiError::new(
            api_code_for_store(err.code),
            err.message.clone(),
            json!({"store_code": err.code.as_str()}),
            UNKNOWN_REQUEST_ID,
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::from(&err)
    }
}
