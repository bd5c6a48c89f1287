// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! HTTP wire contract of the labeler: structured errors and their status
//! mapping, request and response bodies, parameter parsing and the OpenAPI
//! document. Nothing here performs I/O.

pub mod convert;
pub mod dto;
pub mod error_mapping;
pub mod errors;
pub mod openapi;
pub mod params;
pub mod responses;

pub use dto::{
    CreateProjectRequest, DeleteImageRequest, LabelRequest, LabelsResponse, MessageResponse,
    MkdirRequest, MoveImageRequest, MoveImageResponse, ProjectImagesResponse, RenameRequest,
    RmdirRequest, ThumbnailResponse, UploadResponse,
};
pub use error_mapping::{map_error, ApiErrorMapping, API_ERROR_SCHEMA_REF};
pub use errors::{ApiError, ApiErrorCode};
pub use openapi::{openapi_drift, openapi_spec, render_openapi};
pub use params::{
    directory_path_query, is_upload_file_field, parse_entry_name, parse_name, parse_path_query,
    parse_upload_target,
};
pub use responses::{image_content_type, NOSNIFF};

pub const CRATE_NAME: &str = "bijux-labeler-api";
