#![forbid(unsafe_code)]
//! Identifiers and records shared by the labeler store, API and server.
//!
//! The directory tree is the data model: a project is a directory under
//! `projects/`, a label is a directory under a project and an image is a
//! file under a label.

mod entries;
mod layout;
mod names;
mod policy;

pub use entries::{DirectoryEntry, ImageRef, LabelSummary, Thumbnail};
pub use layout::{image_path, label_dir, parse_label_dir, project_dir, PROJECTS_DIR};
pub use names::{
    validate_entry_name, ImageName, LabelName, NameError, ProjectName, NAME_MAX_BYTES,
};
pub use policy::ConflictPolicy;

pub const CRATE_NAME: &str = "bijux-labeler-model";
