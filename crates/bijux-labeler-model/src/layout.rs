// SPDX-License-Identifier: Apache-2.0

use crate::names::{ImageName, LabelName, ProjectName};

pub const PROJECTS_DIR: &str = "projects";

#[must_use]
pub fn project_dir(project: &ProjectName) -> String {
    format!("{PROJECTS_DIR}/{project}")
}

#[must_use]
pub fn label_dir(project: &ProjectName, label: &LabelName) -> String {
    format!("{PROJECTS_DIR}/{project}/{label}")
}

#[must_use]
pub fn image_path(project: &ProjectName, label: &LabelName, image: &ImageName) -> String {
    format!("{PROJECTS_DIR}/{project}/{label}/{image}")
}

/// Splits `projects/<project>/<label>` (leading and trailing `/` tolerated)
/// into its validated parts. Returns `None` when the path has another shape.
#[must_use]
pub fn parse_label_dir(path: &str) -> Option<(String, String)> {
    let mut parts = path.trim_matches('/').split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(PROJECTS_DIR), Some(project), Some(label), None) => {
            Some((project.to_string(), label.to_string()))
        }
        _ => None,
    }
}
