// SPDX-License-Identifier: Apache-2.0

use crate::names::{ImageName, LabelName};
use serde::{Deserialize, Serialize};

/// One direct child of a listed directory. `path` is relative to the storage
/// root and always uses `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
    pub path: String,
}

impl DirectoryEntry {
    #[must_use]
    pub fn new(name: String, is_directory: bool, path: String) -> Self {
        Self {
            name,
            is_directory,
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSummary {
    pub name: LabelName,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    pub name: ImageName,
    pub label: LabelName,
}

impl ImageRef {
    #[must_use]
    pub fn new(label: LabelName, name: ImageName) -> Self {
        Self { name, label }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thumbnail {
    pub label: LabelName,
    pub image: ImageName,
}
