// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers_utilities::run_blocking;
use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::finish;
use crate::AppState;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use bijux_labeler_api::errors::UNKNOWN_REQUEST_ID;
use bijux_labeler_api::params::UPLOAD_PATH_FIELD;
use bijux_labeler_api::{
    is_upload_file_field, parse_name, parse_upload_target, ApiError, ApiErrorCode, UploadResponse,
};
use bijux_labeler_model::ImageName;
use bijux_labeler_store::UploadFile;
use serde_json::json;
use tracing::info;

fn multipart_error(status: StatusCode, body_text: String) -> ApiError {
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiErrorCode::PayloadTooLarge
    } else {
        ApiErrorCode::InvalidRequest
    };
    ApiError::new(
        code,
        body_text,
        json!({"status": status.as_u16()}),
        UNKNOWN_REQUEST_ID,
    )
}

fn field_error(err: MultipartError) -> ApiError {
    multipart_error(err.status(), err.body_text())
}

fn rejection_error(rejection: MultipartRejection) -> ApiError {
    multipart_error(rejection.status(), rejection.body_text())
}

/// Parsed form: the raw target path plus `(client file name, bytes)` pairs
/// in arrival order. The browser client appends `path` after the files, so
/// the whole form is read before anything is validated.
struct UploadForm {
    path: Option<String>,
    files: Vec<(String, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart, max_files: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        path: None,
        files: Vec::new(),
    };
    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if is_upload_file_field(&name) {
            if form.files.len() >= max_files {
                return Err(ApiError::payload_too_large(max_files, "files"));
            }
            let file_name = field
                .file_name()
                .map(ToString::to_string)
                .ok_or_else(|| ApiError::missing_field("filename"))?;
            let bytes = field.bytes().await.map_err(field_error)?;
            form.files.push((file_name, bytes.to_vec()));
        } else if name == UPLOAD_PATH_FIELD {
            form.path = Some(field.text().await.map_err(field_error)?);
        }
    }
    Ok(form)
}

pub(crate) async fn upload_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = async move {
        let multipart = multipart.map_err(rejection_error)?;
        let form = read_form(multipart, state.config.max_upload_files).await?;
        let raw_path = form
            .path
            .ok_or_else(|| ApiError::missing_field(UPLOAD_PATH_FIELD))?;
        let (project, label) = parse_upload_target(&raw_path)?;
        if form.files.is_empty() {
            return Err(ApiError::missing_field("files"));
        }
        let files = form
            .files
            .into_iter()
            .map(|(name, bytes)| -> Result<UploadFile, ApiError> {
                let name: ImageName = parse_name("files", &name)?;
                Ok(UploadFile::new(name, bytes))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let store = state.store.clone();
        let (project_for_store, label_for_store) = (project.clone(), label.clone());
        let stored = run_blocking("upload_images", move || {
            store.upload_images(&project_for_store, &label_for_store, files)
        })
        .await?;
        info!(project = %project, label = %label, files = stored.len(), "images uploaded");
        Ok::<_, ApiError>(Json(UploadResponse {
            message: "files uploaded".to_string(),
            filenames: stored.into_iter().map(|i| i.name.to_string()).collect(),
            project_name: project.to_string(),
        }))
    }
    .await;
    finish(&trace, result)
}
