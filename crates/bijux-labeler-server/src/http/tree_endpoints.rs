// SPDX-License-Identifier: Apache-2.0

//! Generic directory endpoints that work on any root-relative path rather
//! than on the project/label/image hierarchy.

use crate::http::handlers_utilities::{json_rejection_error, run_blocking};
use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::finish;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use bijux_labeler_api::{
    directory_path_query, image_content_type, parse_entry_name, parse_path_query, ApiError,
    MessageResponse, MkdirRequest, RenameRequest, RmdirRequest, NOSNIFF,
};
use std::collections::BTreeMap;

pub(crate) async fn directory_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let result = async move {
        let path = directory_path_query(&query);
        let tree = state.tree.clone();
        let mut entries = run_blocking("list", move || tree.list(&path)).await?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok::<_, ApiError>(Json(entries))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn image_bytes_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let result = async move {
        let path = parse_path_query(&query)?;
        let content_type = image_content_type(&path);
        let tree = state.tree.clone();
        let bytes = run_blocking("read_file", move || tree.read_file(&path)).await?;
        Ok::<_, ApiError>(
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::X_CONTENT_TYPE_OPTIONS, NOSNIFF.to_string()),
                ],
                bytes,
            )
                .into_response(),
        )
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn mkdir_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<MkdirRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let name = parse_entry_name("name", &req.name)?;
        let target = format!("{}/{name}", req.path.trim_end_matches('/'));
        let tree = state.tree.clone();
        run_blocking("mkdir", move || tree.create_directory(&target, true)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("directory created")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn rmdir_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<RmdirRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let tree = state.tree.clone();
        run_blocking("rmdir", move || tree.remove_directory(&req.path, true)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("directory removed")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn rename_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let tree = state.tree.clone();
        run_blocking("rename", move || tree.rename_path(&req.old_path, &req.new_path)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("directory renamed")))
    }
    .await;
    finish(&trace, result)
}
