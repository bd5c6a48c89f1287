// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use bijux_labeler_model::{
    parse_label_dir, validate_entry_name, LabelName, NameError, ProjectName,
};
use serde_json::json;
use std::collections::BTreeMap;

pub const UPLOAD_FILE_FIELDS: [&str; 2] = ["files", "files[]"];
pub const UPLOAD_PATH_FIELD: &str = "path";

/// Validates one identifier taken from a request, naming `field` on failure.
pub fn parse_name<T>(field: &str, raw: &str) -> Result<T, ApiError>
where
    T: for<'a> TryFrom<&'a str, Error = NameError>,
{
    T::try_from(raw).map_err(|e| ApiError::invalid_name(field, &e))
}

/// Validates a bare directory-entry name such as the `name` of `/mkdir`.
pub fn parse_entry_name(field: &str, raw: &str) -> Result<String, ApiError> {
    validate_entry_name(raw).map_err(|e| ApiError::invalid_name(field, &e))?;
    Ok(raw.to_string())
}

/// The `path` query parameter of `/images`.
pub fn parse_path_query(query: &BTreeMap<String, String>) -> Result<String, ApiError> {
    query
        .get("path")
        .cloned()
        .ok_or_else(|| ApiError::missing_field("path"))
}

/// The optional `path` query parameter of `/directory`; absent means the root.
#[must_use]
pub fn directory_path_query(query: &BTreeMap<String, String>) -> String {
    query.get("path").cloned().unwrap_or_default()
}

/// Splits the upload `path` form field (`projects/<project>/<label>`, as sent
/// by the browser client) into validated names.
pub fn parse_upload_target(raw: &str) -> Result<(ProjectName, LabelName), ApiError> {
    let (project, label) = parse_label_dir(raw).ok_or_else(|| {
        ApiError::invalid_request(
            "upload path must have the form projects/<project>/<label>",
            json!({"field": UPLOAD_PATH_FIELD, "value": raw}),
        )
    })?;
    Ok((
        parse_name("projectName", &project)?,
        parse_name("labelName", &label)?,
    ))
}

#[must_use]
pub fn is_upload_file_field(name: &str) -> bool {
    UPLOAD_FILE_FIELDS.contains(&name)
}
