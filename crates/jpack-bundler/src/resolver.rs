/// Path resolution for require targets
///
/// Turns the literal string inside a `require(...)` call into the file that
/// should be read next:
/// - `.` and `..` segments are folded lexically so every spelling of a file
///   maps to one memoization key
/// - directories are rewritten to their `index.js`
/// - a missing file is retried with the configured extensions
/// - targets named like a vendor library are excluded from bundling

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use crate::error::{BundleError, Result};

/// File substituted when a target names a directory
pub const INDEX_FILE: &str = "index.js";

/// Extensions tried, in order, when a target does not exist as written
pub const DEFAULT_EXTENSIONS: &[&str] = &["js"];

/// Outcome of resolving one require target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file on disk, already normalized and rewritten to an index file if needed
    File(PathBuf),
    /// A vendor library supplied by the runtime loader, never bundled
    Vendor(String),
}

/// Resolves require targets relative to the requesting file
#[derive(Debug, Clone)]
pub struct PathResolver {
    vendor: HashSet<String>,
    extensions: Vec<String>,
}

impl PathResolver {
    pub fn new(vendor: HashSet<String>) -> Self {
        Self {
            vendor,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Whether a target's base name belongs to a vendor library
    pub fn is_vendor(&self, target: &str) -> bool {
        Path::new(target)
            .file_name()
            .map(|name| self.vendor.contains(base_name(&name.to_string_lossy())))
            .unwrap_or(false)
    }

    /// Resolve `target` as required from the file `from`
    pub fn resolve(&self, from: &Path, target: &str) -> Result<Resolution> {
        if self.is_vendor(target) {
            debug!(target, from = %from.display(), "excluding vendor module");
            return Ok(Resolution::Vendor(target.to_string()));
        }

        let joined = parent_dir(from).join(target);
        self.locate(&joined)
            .map(Resolution::File)
            .ok_or_else(|| BundleError::not_found(target, from))
    }

    /// Resolve the build root, which may be a file or a directory
    pub fn resolve_root(&self, root: &Path) -> Result<PathBuf> {
        self.locate(root).ok_or_else(|| {
            BundleError::not_found(root.display().to_string(), root)
        })
    }

    fn locate(&self, path: &Path) -> Option<PathBuf> {
        let path = normalize(path);

        if path.is_dir() {
            let index = path.join(INDEX_FILE);
            return index.is_file().then_some(index);
        }
        if path.is_file() {
            return Some(path);
        }

        self.extensions.iter().find_map(|ext| {
            let mut candidate = path.clone().into_os_string();
            candidate.push(".");
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            candidate.is_file().then_some(candidate)
        })
    }
}

/// Directory a file's requires are resolved against
///
/// A path without a parent (a filesystem root) falls back to the current
/// directory.
pub fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) => parent.to_path_buf(),
        None => {
            warn!(file = %file.display(), "no parent directory, resolving against the current directory");
            PathBuf::new()
        }
    }
}

/// Fold `.` and `..` segments without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// File name up to its first `.`, the key vendor libraries are listed under
pub fn base_name(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}
