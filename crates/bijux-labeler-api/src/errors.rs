// SPDX-License-Identifier: Apache-2.0

use bijux_labeler_model::NameError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

pub const UNKNOWN_REQUEST_ID: &str = "req-unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ApiErrorCode {
    NotFound,
    AlreadyExists,
    InvalidName,
    InvalidPath,
    InvalidRequest,
    PayloadTooLarge,
    IoError,
    Internal,
}

impl ApiErrorCode {
    pub const ALL: [Self; 8] = [
        Self::NotFound,
        Self::AlreadyExists,
        Self::InvalidName,
        Self::InvalidPath,
        Self::InvalidRequest,
        Self::PayloadTooLarge,
        Self::IoError,
        Self::Internal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidPath => "INVALID_PATH",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::IoError => "IO_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_name(field: &str, err: &NameError) -> Self {
        Self::new(
            ApiErrorCode::InvalidName,
            err.to_string(),
            json!({"field": field, "value": err.value, "reason": err.reason}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>, details: Value) -> Self {
        Self::new(
            ApiErrorCode::InvalidRequest,
            message,
            details,
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::invalid_request(
            format!("missing required field: {field}"),
            json!({"field": field}),
        )
    }

    #[must_use]
    pub fn payload_too_large(limit: usize, unit: &str) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            format!("request exceeds the limit of {limit} {unit}"),
            json!({"limit": limit, "unit": unit}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::Internal,
            message,
            json!({}),
            UNKNOWN_REQUEST_ID,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
};
