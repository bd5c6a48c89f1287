// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::tree::TreeAccessor;
use bijux_labeler_model::{
    label_dir, project_dir, DirectoryEntry, ImageName, LabelName, NameError, ProjectName,
    Thumbnail,
};
use tracing::warn;

/// Smallest name by plain byte order (`"10"` sorts before `"2"`) among
/// entries whose directory flag equals `want_directory` and whose name
/// `parse` accepts. Rejected names are skipped, as in the listings.
pub fn first_valid_name<T>(
    entries: &[DirectoryEntry],
    want_directory: bool,
    parse: impl Fn(&str) -> Result<T, NameError>,
) -> Option<T> {
    let mut names: Vec<&str> = entries
        .iter()
        .filter(|e| e.is_directory == want_directory)
        .map(|e| e.name.as_str())
        .collect();
    names.sort_unstable();
    names.into_iter().find_map(|name| match parse(name) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "skipping thumbnail candidate");
            None
        }
    })
}

/// Picks the first image of the first label of `project`.
///
/// An empty first label yields `None` even if a later label has images.
pub fn select_thumbnail(
    tree: &TreeAccessor,
    project: &ProjectName,
) -> Result<Option<Thumbnail>, StoreError> {
    let labels = tree.list(&project_dir(project))?;
    let Some(label) = first_valid_name(&labels, true, |name| LabelName::new(name)) else {
        return Ok(None);
    };
    let images = tree.list(&label_dir(project, &label))?;
    Ok(first_valid_name(&images, false, |name| ImageName::new(name))
        .map(|image| Thumbnail { label, image }))
}
