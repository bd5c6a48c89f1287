#![forbid(unsafe_code)]

mod error;
mod repository;
mod thumbnail;
mod tree;

pub use error::{StoreError, StoreErrorCode};
pub use repository::{FsProjectStore, ProjectStore, UploadFile};
pub use thumbnail::{first_valid_name, select_thumbnail};
pub use tree::{ResolvedPath, TreeAccessor};

pub const CRATE_NAME: &str = "bijux-labeler-store";
