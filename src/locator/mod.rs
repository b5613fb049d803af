//! Resource lookup.
//!
//! A [`ResourceLocator`] maps a [`ResourceReference`] to the bytes that
//! should be inlined. [`SearchPath`] is the filesystem implementation: it
//! searches an ordered list of directories, trying each extension registered
//! for the resource type.
//!
//! # Example
//!
//! ```no_run
//! use psincluderes::locator::{ResourceLocator, SearchPath};
//! use psincluderes::{ResourceReference, ResourceType};
//!
//! let path = SearchPath::new().with_dir("/usr/share/ps-resources");
//! let helvetica = ResourceReference::new(ResourceType::Font, "Helvetica");
//! let file = path.locate(&helvetica)?;
//! println!("found {}", file.display());
//! # Ok::<(), psincluderes::Error>(())
//! ```

use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::ResourceReference;

/// Characters removed from resource names before they are used as file names.
const UNSAFE_FILE_NAME_CHARS: &[char] = &[
    '!', '(', ')', '$', '#', '*', '&', '\\', '|', '`', '\'', '"', '~', '{', '}', '[', ']', '<',
    '>', '?',
];

/// Make a file name from a resource name component.
///
/// Shell-unsafe characters are dropped and only the final path component is
/// kept, matching the names `extractres` writes. May return an empty string.
pub fn sanitize_file_name(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .filter(|c| !UNSAFE_FILE_NAME_CHARS.contains(c))
        .collect();
    cleaned.rsplit('/').next().unwrap_or_default().to_string()
}

/// Finds resources for the inliner.
pub trait ResourceLocator {
    /// Find the file holding `reference`.
    ///
    /// Returns [`Error::ResourceNotFound`] when no candidate exists.
    fn locate(&self, reference: &ResourceReference) -> Result<PathBuf>;

    /// Read the full content of `reference`.
    fn load(&self, reference: &ResourceReference) -> Result<Vec<u8>> {
        let path = self.locate(reference)?;
        fs::read(&path).map_err(|source| Error::ResourceRead { path, source })
    }
}

impl<L: ResourceLocator + ?Sized> ResourceLocator for &L {
    fn locate(&self, reference: &ResourceReference) -> Result<PathBuf> {
        (**self).locate(reference)
    }

    fn load(&self, reference: &ResourceReference) -> Result<Vec<u8>> {
        (**self).load(reference)
    }
}

/// Ordered list of directories searched for resource files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Search the current directory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A search path with no directories.
    pub fn empty() -> Self {
        Self { dirs: Vec::new() }
    }

    /// Build a search path from a platform path list (`PATH` syntax).
    /// Empty entries are skipped.
    pub fn from_path_list(list: &OsStr) -> Self {
        Self {
            dirs: std::env::split_paths(list)
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
        }
    }

    /// Append a directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.push(dir);
        self
    }

    /// Append a directory.
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// Directories in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every path tried for `reference`, in search order.
    ///
    /// Directory order comes first, then extension order, then file stem:
    /// the `extractres` name (name, version and revision run together) when
    /// the reference has a version, then the plain name.
    pub fn candidates(&self, reference: &ResourceReference) -> Vec<PathBuf> {
        let stems = file_stems(reference);
        let extensions = reference.resource_type.extensions();

        let mut candidates = Vec::with_capacity(self.dirs.len() * extensions.len() * stems.len());
        for dir in &self.dirs {
            for extension in extensions {
                for stem in &stems {
                    candidates.push(dir.join(format!("{}{}", stem, extension)));
                }
            }
        }
        candidates
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from(".")],
        }
    }
}

impl ResourceLocator for SearchPath {
    fn locate(&self, reference: &ResourceReference) -> Result<PathBuf> {
        for candidate in self.candidates(reference) {
            if is_readable_file(&candidate) {
                log::debug!("{} -> {}", reference, candidate.display());
                return Ok(candidate);
            }
        }
        Err(Error::ResourceNotFound(reference.clone()))
    }
}

fn file_stems(reference: &ResourceReference) -> Vec<String> {
    let name = sanitize_file_name(&reference.name);
    let joined: String = reference
        .components()
        .iter()
        .map(|c| sanitize_file_name(c))
        .collect();

    let mut stems = Vec::with_capacity(2);
    if joined != name && !joined.is_empty() {
        stems.push(joined);
    }
    if !name.is_empty() {
        stems.push(name);
    }
    stems
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
