// SPDX-License-Identifier: Apache-2.0

use crate::error::{StoreError, StoreErrorCode};
use bijux_labeler_model::DirectoryEntry;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, warn};

#[cfg(unix)]
const CROSS_DEVICE_OS_ERROR: i32 = 18; // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_OS_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE

/// A caller path after lexical normalization, plus its absolute location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub absolute: PathBuf,
    /// Root-relative form with `/` separators; empty for the root itself.
    pub relative: String,
}

impl ResolvedPath {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }

    fn child(&self, name: &str) -> String {
        if self.relative.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.relative)
        }
    }
}

/// Primitive filesystem operations scoped beneath one root directory.
///
/// Every path argument is relative to the root. Paths containing `..`,
/// drive prefixes, backslashes or NUL are rejected, and the deepest existing
/// ancestor of the target must canonicalize to a location under the root, so
/// a symlink cannot lead an operation outside of it.
#[derive(Debug, Clone)]
pub struct TreeAccessor {
    root: PathBuf,
}

impl TreeAccessor {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Creates the root if needed and pins it to its canonical form.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let display = root.display().to_string();
        fs::create_dir_all(root).map_err(|e| StoreError::from_io("create root", &display, &e))?;
        let canonical = root
            .canonicalize()
            .map_err(|e| StoreError::from_io("canonicalize root", &display, &e))?;
        Ok(Self::new(canonical))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexically normalizes `relative` into `/`-joined components.
    pub fn normalize(relative: &str) -> Result<String, StoreError> {
        if relative.contains(['\0', '\\']) {
            return Err(StoreError::invalid_path(
                relative,
                "backslashes and NUL are not allowed",
            ));
        }
        let mut parts = Vec::new();
        for component in Path::new(relative).components() {
            match component {
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(StoreError::invalid_path(
                        relative,
                        "parent traversal is not allowed",
                    ))
                }
                Component::Prefix(_) => {
                    return Err(StoreError::invalid_path(
                        relative,
                        "drive prefixes are not allowed",
                    ))
                }
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        StoreError::invalid_path(relative, "path is not valid UTF-8")
                    })?;
                    parts.push(part);
                }
            }
        }
        Ok(parts.join("/"))
    }

    pub fn resolve(&self, relative: &str) -> Result<ResolvedPath, StoreError> {
        let normalized = Self::normalize(relative)?;
        let mut absolute = self.root.clone();
        for part in normalized.split('/').filter(|p| !p.is_empty()) {
            absolute.push(part);
        }
        self.ensure_within_root(&absolute, relative)?;
        Ok(ResolvedPath {
            absolute,
            relative: normalized,
        })
    }

    fn resolve_non_root(&self, relative: &str, op: &str) -> Result<ResolvedPath, StoreError> {
        let resolved = self.resolve(relative)?;
        if resolved.is_root() {
            return Err(StoreError::invalid_path(
                relative,
                &format!("{op} is not allowed on the storage root"),
            ));
        }
        Ok(resolved)
    }

    fn ensure_within_root(&self, absolute: &Path, relative: &str) -> Result<(), StoreError> {
        let root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());
        // A dangling link is an existing entry here, not a missing one.
        let Some(existing) = absolute
            .ancestors()
            .find(|p| fs::symlink_metadata(p).is_ok())
        else {
            return Ok(());
        };
        let canonical = match existing.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) if fs::symlink_metadata(existing).is_ok_and(|m| m.file_type().is_symlink()) => {
                return Err(StoreError::invalid_path(
                    relative,
                    "path goes through a dangling symlink",
                ));
            }
            Err(e) => return Err(StoreError::from_io("canonicalize", relative, &e)),
        };
        if !canonical.starts_with(&root) {
            return Err(StoreError::invalid_path(relative, "path escapes the storage root"));
        }
        Ok(())
    }

    pub fn exists(&self, relative: &str) -> Result<bool, StoreError> {
        let resolved = self.resolve(relative)?;
        Ok(fs::symlink_metadata(&resolved.absolute).is_ok())
    }

    pub fn is_dir(&self, relative: &str) -> Result<bool, StoreError> {
        let resolved = self.resolve(relative)?;
        Ok(fs::metadata(&resolved.absolute).is_ok_and(|m| m.is_dir()))
    }

    /// Direct children of `relative`, in the order the filesystem delivers
    /// them. Entries whose names are not valid UTF-8 are skipped.
    pub fn list(&self, relative: &str) -> Result<Vec<DirectoryEntry>, StoreError> {
        let resolved = self.resolve(relative)?;
        let read = fs::read_dir(&resolved.absolute)
            .map_err(|e| StoreError::from_io("list", &resolved.relative, &e))?;
        let mut out = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| StoreError::from_io("list", &resolved.relative, &e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| StoreError::from_io("stat", &resolved.relative, &e))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(dir = %resolved.relative, name = ?raw, "skipping non-UTF-8 entry");
                    continue;
                }
            };
            let path = resolved.child(&name);
            out.push(DirectoryEntry::new(name, file_type.is_dir(), path));
        }
        Ok(out)
    }

    /// Creates one directory. `recursive` also creates missing ancestors; in
    /// both modes an existing leaf is an `AlreadyExists` failure.
    #[instrument(level = "debug", skip(self))]
    pub fn create_directory(&self, relative: &str, recursive: bool) -> Result<(), StoreError> {
        let resolved = self.resolve_non_root(relative, "mkdir")?;
        if fs::symlink_metadata(&resolved.absolute).is_ok() {
            return Err(StoreError::already_exists(format!(
                "directory `{}`",
                resolved.relative
            )));
        }
        let result = if recursive {
            fs::create_dir_all(&resolved.absolute)
        } else {
            fs::create_dir(&resolved.absolute)
        };
        result.map_err(|e| StoreError::from_io("mkdir", &resolved.relative, &e))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_directory(&self, relative: &str, recursive: bool) -> Result<(), StoreError> {
        let resolved = self.resolve_non_root(relative, "rmdir")?;
        let meta = fs::symlink_metadata(&resolved.absolute)
            .map_err(|e| StoreError::from_io("rmdir", &resolved.relative, &e))?;
        if !meta.is_dir() {
            return Err(StoreError::new(
                StoreErrorCode::Io,
                format!("rmdir `{}` failed: not a directory", resolved.relative),
            ));
        }
        let result = if recursive {
            fs::remove_dir_all(&resolved.absolute)
        } else {
            fs::remove_dir(&resolved.absolute)
        };
        result.map_err(|e| StoreError::from_io("rmdir", &resolved.relative, &e))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_file(&self, relative: &str) -> Result<(), StoreError> {
        let resolved = self.resolve_non_root(relative, "delete")?;
        let meta = fs::symlink_metadata(&resolved.absolute)
            .map_err(|e| StoreError::from_io("delete", &resolved.relative, &e))?;
        if meta.is_dir() {
            return Err(StoreError::new(
                StoreErrorCode::Io,
                format!("delete `{}` failed: is a directory", resolved.relative),
            ));
        }
        fs::remove_file(&resolved.absolute)
            .map_err(|e| StoreError::from_io("delete", &resolved.relative, &e))
    }

    /// Relocates a file or directory. Collisions are left to the platform
    /// rename; callers that need a policy check `exists` first. A file moved
    /// across devices is copied and then removed, which is not atomic.
    #[instrument(level = "debug", skip(self))]
    pub fn move_entry(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let source = self.resolve_non_root(from, "move")?;
        let target = self.resolve_non_root(to, "move")?;
        match fs::rename(&source.absolute, &target.absolute) {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) && source.absolute.is_file() => {
                debug!(from = %source.relative, to = %target.relative, "cross-device move, copying");
                fs::copy(&source.absolute, &target.absolute)
                    .map_err(|e| StoreError::from_io("copy", &target.relative, &e))?;
                fs::remove_file(&source.absolute)
                    .map_err(|e| StoreError::from_io("delete", &source.relative, &e))
            }
            Err(e) => Err(StoreError::from_io(
                "move",
                &format!("{} -> {}", source.relative, target.relative),
                &e,
            )),
        }
    }

    /// Directory rename. Unlike `move_entry` an occupied destination is
    /// refused, since a platform rename may silently replace an empty
    /// directory.
    pub fn rename_path(&self, old: &str, new: &str) -> Result<(), StoreError> {
        if self.exists(new)? {
            return Err(StoreError::already_exists(format!(
                "`{}`",
                Self::normalize(new)?
            )));
        }
        self.move_entry(old, new)
    }

    pub fn read_file(&self, relative: &str) -> Result<Vec<u8>, StoreError> {
        let resolved = self.resolve_non_root(relative, "read")?;
        fs::read(&resolved.absolute).map_err(|e| StoreError::from_io("read", &resolved.relative, &e))
    }

    /// Creates or truncates a file.
    #[instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let resolved = self.resolve_non_root(relative, "write")?;
        fs::write(&resolved.absolute, bytes)
            .map_err(|e| StoreError::from_io("write", &resolved.relative, &e))
    }

    /// Creates a file that must not exist yet.
    #[instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    pub fn write_new_file(&self, relative: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let resolved = self.resolve_non_root(relative, "write")?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&resolved.absolute)
            .map_err(|e| StoreError::from_io("create", &resolved.relative, &e))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| StoreError::from_io("write", &resolved.relative, &e))
    }
}

#[cfg(any(unix, windows))]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(CROSS_DEVICE_OS_ERROR)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}
