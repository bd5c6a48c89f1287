// SPDX-License-Identifier: Apache-2.0

use crate::error::{StoreError, StoreErrorCode};
use crate::thumbnail;
use crate::tree::TreeAccessor;
use bijux_labeler_model::{
    image_path, label_dir, project_dir, ConflictPolicy, ImageName, ImageRef, LabelName,
    LabelSummary, ProjectName, Thumbnail, PROJECTS_DIR,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{instrument, warn};

const MAX_RENAME_ATTEMPTS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: ImageName,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: ImageName, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }
}

/// Domain operations over the project → label → image hierarchy.
///
/// The filesystem tree is the only implementation today; callers hold a
/// `dyn ProjectStore` so an indexed backend can replace it.
pub trait ProjectStore: Send + Sync + 'static {
    fn list_projects(&self) -> Result<Vec<ProjectName>, StoreError>;
    fn list_labels(&self, project: &ProjectName) -> Result<Vec<LabelSummary>, StoreError>;
    fn list_images(&self, project: &ProjectName) -> Result<Vec<ImageRef>, StoreError>;
    fn create_project(&self, project: &ProjectName) -> Result<(), StoreError>;
    fn create_label(&self, project: &ProjectName, label: &LabelName) -> Result<(), StoreError>;
    fn delete_label(&self, project: &ProjectName, label: &LabelName) -> Result<(), StoreError>;
    fn delete_image(
        &self,
        project: &ProjectName,
        label: &LabelName,
        image: &ImageName,
    ) -> Result<(), StoreError>;
    fn move_image(
        &self,
        project: &ProjectName,
        image: &ImageName,
        source: &LabelName,
        target: &LabelName,
    ) -> Result<ImageRef, StoreError>;
    fn upload_images(
        &self,
        project: &ProjectName,
        label: &LabelName,
        files: Vec<UploadFile>,
    ) -> Result<Vec<ImageRef>, StoreError>;
    fn read_image(
        &self,
        project: &ProjectName,
        label: &LabelName,
        image: &ImageName,
    ) -> Result<Vec<u8>, StoreError>;
    fn select_thumbnail(&self, project: &ProjectName) -> Result<Option<Thumbnail>, StoreError>;
}

pub struct FsProjectStore {
    tree: TreeAccessor,
    conflict_policy: ConflictPolicy,
}

impl FsProjectStore {
    #[must_use]
    pub fn new(tree: TreeAccessor, conflict_policy: ConflictPolicy) -> Self {
        Self {
            tree,
            conflict_policy,
        }
    }

    /// Opens `root`, creating it and its `projects/` directory when absent.
    pub fn open(root: &Path, conflict_policy: ConflictPolicy) -> Result<Self, StoreError> {
        let tree = TreeAccessor::open(root)?;
        let projects = tree.root().join(PROJECTS_DIR);
        fs::create_dir_all(&projects)
            .map_err(|e| StoreError::from_io("create", PROJECTS_DIR, &e))?;
        Ok(Self::new(tree, conflict_policy))
    }

    #[must_use]
    pub fn tree(&self) -> &TreeAccessor {
        &self.tree
    }

    #[must_use]
    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy
    }

    fn sorted_child_dirs(&self, relative: &str) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .tree
            .list(relative)?
            .into_iter()
            .filter(|e| e.is_directory)
            .map(|e| e.name)
            .collect();
        names.sort();
        Ok(names)
    }

    fn sorted_child_files(&self, relative: &str) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .tree
            .list(relative)?
            .into_iter()
            .filter(|e| !e.is_directory)
            .map(|e| e.name)
            .collect();
        names.sort();
        Ok(names)
    }

    fn labels_of(&self, project: &ProjectName) -> Result<Vec<LabelName>, StoreError> {
        Ok(self
            .sorted_child_dirs(&project_dir(project))?
            .into_iter()
            .filter_map(|name| match LabelName::new(name) {
                Ok(label) => Some(label),
                Err(e) => {
                    warn!(project = %project, error = %e, "skipping label directory");
                    None
                }
            })
            .collect())
    }

    fn require_label(&self, project: &ProjectName, label: &LabelName) -> Result<(), StoreError> {
        if !self.tree.is_dir(&project_dir(project))? {
            return Err(StoreError::not_found(format!("project `{project}`")));
        }
        if !self.tree.is_dir(&label_dir(project, label))? {
            return Err(StoreError::not_found(format!("label `{project}/{label}`")));
        }
        Ok(())
    }

    /// Name under which `image` lands in `label` according to the conflict
    /// policy. `claimed` holds names already assigned earlier in the same
    /// batch.
    fn destination_name(
        &self,
        project: &ProjectName,
        label: &LabelName,
        image: &ImageName,
        claimed: &BTreeSet<ImageName>,
    ) -> Result<ImageName, StoreError> {
        let taken = |name: &ImageName| -> Result<bool, StoreError> {
            Ok(claimed.contains(name) || self.tree.exists(&image_path(project, label, name))?)
        };
        if !taken(image)? {
            return Ok(image.clone());
        }
        match self.conflict_policy {
            ConflictPolicy::Reject => Err(StoreError::already_exists(format!(
                "image `{project}/{label}/{image}`"
            ))),
            ConflictPolicy::Overwrite => Ok(image.clone()),
            ConflictPolicy::Rename => {
                for n in 1..=MAX_RENAME_ATTEMPTS {
                    let candidate = image.with_suffix(n)?;
                    if !taken(&candidate)? {
                        return Ok(candidate);
                    }
                }
                Err(StoreError::new(
                    StoreErrorCode::Io,
                    format!("no free name for `{image}` in `{project}/{label}`"),
                ))
            }
        }
    }
}

impl ProjectStore for FsProjectStore {
    fn list_projects(&self) -> Result<Vec<ProjectName>, StoreError> {
        Ok(self
            .sorted_child_dirs(PROJECTS_DIR)?
            .into_iter()
            .filter_map(|name| match ProjectName::new(name) {
                Ok(project) => Some(project),
                Err(e) => {
                    warn!(error = %e, "skipping project directory");
                    None
                }
            })
            .collect())
    }

    fn list_labels(&self, project: &ProjectName) -> Result<Vec<LabelSummary>, StoreError> {
        let mut out = Vec::new();
        for label in self.labels_of(project)? {
            let count = self
                .tree
                .list(&label_dir(project, &label))?
                .iter()
                .filter(|e| !e.is_directory)
                .count();
            out.push(LabelSummary { name: label, count });
        }
        Ok(out)
    }

    fn list_images(&self, project: &ProjectName) -> Result<Vec<ImageRef>, StoreError> {
        let mut out = Vec::new();
        for label in self.labels_of(project)? {
            for name in self.sorted_child_files(&label_dir(project, &label))? {
                match ImageName::new(name) {
                    Ok(image) => out.push(ImageRef::new(label.clone(), image)),
                    Err(e) => warn!(project = %project, error = %e, "skipping image file"),
                }
            }
        }
        Ok(out)
    }

    #[instrument(level = "debug", skip(self))]
    fn create_project(&self, project: &ProjectName) -> Result<(), StoreError> {
        self.tree.create_directory(&project_dir(project), false)
    }

    #[instrument(level = "debug", skip(self))]
    fn create_label(&self, project: &ProjectName, label: &LabelName) -> Result<(), StoreError> {
        if !self.tree.is_dir(&project_dir(project))? {
            return Err(StoreError::not_found(format!("project `{project}`")));
        }
        self.tree.create_directory(&label_dir(project, label), false)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_label(&self, project: &ProjectName, label: &LabelName) -> Result<(), StoreError> {
        self.tree.remove_directory(&label_dir(project, label), true)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_image(
        &self,
        project: &ProjectName,
        label: &LabelName,
        image: &ImageName,
    ) -> Result<(), StoreError> {
        self.tree.remove_file(&image_path(project, label, image))
    }

    #[instrument(level = "debug", skip(self))]
    fn move_image(
        &self,
        project: &ProjectName,
        image: &ImageName,
        source: &LabelName,
        target: &LabelName,
    ) -> Result<ImageRef, StoreError> {
        let from = image_path(project, source, image);
        if !self.tree.exists(&from)? {
            return Err(StoreError::not_found(format!(
                "image `{project}/{source}/{image}`"
            )));
        }
        if source == target {
            return Ok(ImageRef::new(target.clone(), image.clone()));
        }
        self.require_label(project, target)?;
        let name = self.destination_name(project, target, image, &BTreeSet::new())?;
        self.tree
            .move_entry(&from, &image_path(project, target, &name))?;
        Ok(ImageRef::new(target.clone(), name))
    }

    #[instrument(level = "debug", skip(self, files), fields(files = files.len()))]
    fn upload_images(
        &self,
        project: &ProjectName,
        label: &LabelName,
        files: Vec<UploadFile>,
    ) -> Result<Vec<ImageRef>, StoreError> {
        self.require_label(project, label)?;

        // Every destination is decided before the first write so a rejected
        // batch leaves the label untouched.
        let mut claimed = BTreeSet::new();
        let mut planned = Vec::with_capacity(files.len());
        for file in files {
            let name = self.destination_name(project, label, &file.name, &claimed)?;
            claimed.insert(name.clone());
            planned.push((name, file.bytes));
        }

        let mut stored = Vec::with_capacity(planned.len());
        for (name, bytes) in planned {
            let path = image_path(project, label, &name);
            match self.conflict_policy {
                ConflictPolicy::Overwrite => self.tree.write_file(&path, &bytes)?,
                _ => self.tree.write_new_file(&path, &bytes)?,
            }
            stored.push(ImageRef::new(label.clone(), name));
        }
        Ok(stored)
    }

    fn read_image(
        &self,
        project: &ProjectName,
        label: &LabelName,
        image: &ImageName,
    ) -> Result<Vec<u8>, StoreError> {
        self.tree.read_file(&image_path(project, label, image))
    }

    fn select_thumbnail(&self, project: &ProjectName) -> Result<Option<Thumbnail>, StoreError> {
        thumbnail::select_thumbnail(&self.tree, project)
    }
}
