// SPDX-License-Identifier: Apache-2.0

use bijux_labeler_model::NameError;
use std::fmt::{Display, Formatter};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    AlreadyExists,
    InvalidName,
    InvalidPath,
    Io,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidName => "invalid_name",
            Self::InvalidPath => "invalid_path",
            Self::Io => "io_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(what: impl Display) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("{what} does not exist"))
    }

    #[must_use]
    pub fn already_exists(what: impl Display) -> Self {
        Self::new(StoreErrorCode::AlreadyExists, format!("{what} already exists"))
    }

    #[must_use]
    pub fn invalid_path(path: &str, reason: &str) -> Self {
        Self::new(
            StoreErrorCode::InvalidPath,
            format!("invalid path `{path}`: {reason}"),
        )
    }

    /// Classifies an I/O failure of `op` on `path` by its error kind.
    #[must_use]
    pub fn from_io(op: &str, path: &str, err: &io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::NotFound => StoreErrorCode::NotFound,
            io::ErrorKind::AlreadyExists => StoreErrorCode::AlreadyExists,
            _ => StoreErrorCode::Io,
        };
        Self::new(code, format!("{op} `{path}` failed: {err}"))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<NameError> for StoreError {
    fn from(value: NameError) -> Self {
        Self::new(StoreErrorCode::InvalidName, value.to_string())
    }
}
