// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use bijux_labeler_api::errors::UNKNOWN_REQUEST_ID;
use bijux_labeler_api::{ApiError, ApiErrorCode};
use bijux_labeler_store::StoreError;
use serde_json::json;
use tracing::error;

/// Runs filesystem work on the blocking pool. A panic in `work` surfaces as
/// `INTERNAL` instead of tearing down the connection.
pub(crate) async fn run_blocking<T, F>(op: &'static str, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(join) => {
            error!(op, error = %join, "blocking task failed");
            Err(ApiError::internal(format!("{op} did not complete")))
        }
    }
}

#[must_use]
pub(crate) fn json_rejection_error(rejection: JsonRejection) -> ApiError {
    let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiErrorCode::PayloadTooLarge
    } else {
        ApiErrorCode::InvalidRequest
    };
    ApiError::new(
        code,
        rejection.body_text(),
        json!({"status": rejection.status().as_u16()}),
        UNKNOWN_REQUEST_ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_errors_keep_their_code() {
        let err = run_blocking("probe", || -> Result<(), StoreError> {
            Err(StoreError::not_found("project `x`"))
        })
        .await
        .expect_err("store error");
        assert_eq!(err.code, ApiErrorCode::NotFound);

        let ok = run_blocking("probe", || Ok::<_, StoreError>(7)).await.expect("ok");
        assert_eq!(ok, 7);
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let err = run_blocking("probe", || -> Result<(), StoreError> {
            panic!("boom");
        })
        .await
        .expect_err("panic");
        assert_eq!(err.code, ApiErrorCode::Internal);
    }
}
