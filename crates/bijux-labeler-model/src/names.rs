// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NAME_MAX_BYTES: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameError {
    pub kind: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} `{}`: {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for NameError {}

/// Directory name of a project directly under the projects root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

/// Directory name of a label inside a project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

/// File name of an image inside a label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageName(String);

impl ImageName {
    /// Splits `cat.png` into `("cat", Some("png"))`. Dotfiles keep their
    /// leading dot in the stem.
    #[must_use]
    pub fn stem_and_extension(&self) -> (&str, Option<&str>) {
        match self.0.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < self.0.len() => {
                (&self.0[..idx], Some(&self.0[idx + 1..]))
            }
            _ => (&self.0, None),
        }
    }

    /// Name used for the `n`-th rename-on-conflict attempt: `cat-1.png`.
    pub fn with_suffix(&self, n: usize) -> Result<Self, NameError> {
        let candidate = match self.stem_and_extension() {
            (stem, Some(ext)) => format!("{stem}-{n}.{ext}"),
            (stem, None) => format!("{stem}-{n}"),
        };
        Self::new(candidate)
    }
}

fn validate_name(kind: &'static str, value: &str) -> Result<(), NameError> {
    let fail = |reason: &'static str| NameError {
        kind,
        value: value.to_owned(),
        reason,
    };
    if value.is_empty() {
        return Err(fail("must not be empty"));
    }
    if value.trim().is_empty() {
        return Err(fail("must not be blank"));
    }
    if value.len() > NAME_MAX_BYTES {
        return Err(fail("must be at most 255 bytes"));
    }
    if value == "." || value == ".." {
        return Err(fail("must not be a relative path marker"));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(fail("must not contain path separators or NUL"));
    }
    Ok(())
}

/// Checks a single directory-entry name with the same rules as the typed
/// names, for generic directory operations that have no domain type.
pub fn validate_entry_name(value: &str) -> Result<(), NameError> {
    validate_name("entry name", value)
}

macro_rules! impl_name_traits {
    ($name:ident, $kind:literal) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, NameError> {
                let value = value.into();
                validate_name($kind, &value)?;
                Ok(Self(value))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = NameError;

            fn try_from(value: String) -> Result<Self, NameError> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = NameError;

            fn try_from(value: &str) -> Result<Self, NameError> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = NameError;

            fn from_str(s: &str) -> Result<Self, NameError> {
                Self::new(s)
            }
        }
    };
}

impl_name_traits!(ProjectName, "project name");
impl_name_traits!(LabelName, "label name");
impl_name_traits!(ImageName, "image name");
