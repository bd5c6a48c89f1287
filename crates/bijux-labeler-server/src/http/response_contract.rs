// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::RequestTrace;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bijux_labeler_api::{map_error, ApiError};
use serde_json::json;
use tracing::{error, warn};

#[must_use]
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

/// Turns a handler outcome into a response, stamping the request id into
/// error bodies. Server-side failures log at `error`, client ones at `warn`.
pub(crate) fn finish<R: IntoResponse>(trace: &RequestTrace, result: Result<R, ApiError>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(err) => {
            let err = err.with_request_id(trace.request_id.clone());
            let status = map_error(&err).status_code;
            if status >= 500 {
                error!(code = %err.code, status, message = %err.message, "request failed");
            } else {
                warn!(code = %err.code, status, message = %err.message, "request rejected");
            }
            api_error_response(err)
        }
    }
}
