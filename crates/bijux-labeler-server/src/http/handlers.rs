// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers_utilities::{json_rejection_error, run_blocking};
use crate::http::request_tracing::RequestTrace;
use crate::http::response_contract::finish;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use bijux_labeler_api::{
    openapi_spec, parse_name, ApiError, CreateProjectRequest, DeleteImageRequest, LabelRequest,
    LabelsResponse, MessageResponse, MoveImageRequest, MoveImageResponse, ProjectImagesResponse,
    ThumbnailResponse,
};
use bijux_labeler_model::{ImageName, LabelName, ProjectName};
use serde_json::json;

pub(crate) async fn healthz_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub(crate) async fn openapi_handler() -> Json<serde_json::Value> {
    Json(openapi_spec())
}

pub(crate) async fn project_labels_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(raw_project): Path<String>,
) -> Response {
    let result = async move {
        let project: ProjectName = parse_name("projectName", &raw_project)?;
        let store = state.store.clone();
        let labels = run_blocking("list_labels", move || store.list_labels(&project)).await?;
        Ok::<_, ApiError>(Json(LabelsResponse { labels }))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn project_images_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(raw_project): Path<String>,
) -> Response {
    let result = async move {
        let project: ProjectName = parse_name("projectName", &raw_project)?;
        let store = state.store.clone();
        let images = run_blocking("list_images", move || store.list_images(&project)).await?;
        Ok::<_, ApiError>(Json(ProjectImagesResponse { images }))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn project_thumbnail_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(raw_project): Path<String>,
) -> Response {
    let result = async move {
        let project: ProjectName = parse_name("projectName", &raw_project)?;
        let store = state.store.clone();
        let thumbnail = run_blocking("select_thumbnail", move || {
            // Distinguish a missing project from one without a thumbnail.
            store.list_labels(&project)?;
            store.select_thumbnail(&project)
        })
        .await?;
        Ok::<_, ApiError>(Json(ThumbnailResponse { thumbnail }))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn create_project_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let project: ProjectName = parse_name("projectName", &req.project_name)?;
        let store = state.store.clone();
        run_blocking("create_project", move || store.create_project(&project)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("project created")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn create_label_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<LabelRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let project: ProjectName = parse_name("projectName", &req.project_name)?;
        let label: LabelName = parse_name("labelName", &req.label_name)?;
        let store = state.store.clone();
        run_blocking("create_label", move || store.create_label(&project, &label)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("label created")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn delete_label_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<LabelRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let project: ProjectName = parse_name("projectName", &req.project_name)?;
        let label: LabelName = parse_name("labelName", &req.label_name)?;
        let store = state.store.clone();
        run_blocking("delete_label", move || store.delete_label(&project, &label)).await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("label deleted")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn delete_image_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let project: ProjectName = parse_name("projectName", &req.project_name)?;
        let label: LabelName = parse_name("labelName", &req.label_name)?;
        let image: ImageName = parse_name("imageName", &req.image_name)?;
        let store = state.store.clone();
        run_blocking("delete_image", move || {
            store.delete_image(&project, &label, &image)
        })
        .await?;
        Ok::<_, ApiError>(Json(MessageResponse::new("file deleted")))
    }
    .await;
    finish(&trace, result)
}

pub(crate) async fn move_image_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Json<MoveImageRequest>, JsonRejection>,
) -> Response {
    let result = async move {
        let Json(req) = body.map_err(json_rejection_error)?;
        let project: ProjectName = parse_name("projectName", &req.project_name)?;
        let image: ImageName = parse_name("imageName", &req.image_name)?;
        let source: LabelName = parse_name("sourceLabel", &req.source_label)?;
        let target: LabelName = parse_name("targetLabel", &req.target_label)?;
        let store = state.store.clone();
        let image = run_blocking("move_image", move || {
            store.move_image(&project, &image, &source, &target)
        })
        .await?;
        Ok::<_, ApiError>(Json(MoveImageResponse {
            message: "image moved".to_string(),
            image,
        }))
    }
    .await;
    finish(&trace, result)
}
