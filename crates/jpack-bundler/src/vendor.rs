/// Vendor library discovery
///
/// Pre-built libraries live in vendor directories and are loaded by the page
/// before any bundle. Their base names (`vue.min.js` -> `vue`) are excluded
/// from bundling.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::error::{BundleError, Result};
use crate::resolver::base_name;

/// Directories searched when none are given
pub const DEFAULT_VENDOR_DIRS: &[&str] = &["vendor/dev", "vendor/min", "vendor/common"];

pub fn default_vendor_dirs() -> Vec<PathBuf> {
    DEFAULT_VENDOR_DIRS.iter().map(PathBuf::from).collect()
}

/// Collect vendor names from the entries of each directory
///
/// Directories that do not exist are skipped with a warning.
pub fn vendor_names<P: AsRef<Path>>(dirs: &[P]) -> Result<HashSet<String>> {
    let mut names = HashSet::new();

    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "vendor directory not found, skipping");
            continue;
        }

        let entries = std::fs::read_dir(dir).map_err(|e| BundleError::read(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| BundleError::read(dir, e))?;
            let file_name = entry.file_name();
            let name = base_name(&file_name.to_string_lossy()).to_string();
            debug!(dir = %dir.display(), name, "vendor module");
            names.insert(name);
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_names_are_base_names() {
        let dir = tempfile::tempdir().unwrap();
        let dev = dir.path().join("dev");
        let min = dir.path().join("min");
        fs::create_dir(&dev).unwrap();
        fs::create_dir(&min).unwrap();
        fs::write(dev.join("vue.js"), "").unwrap();
        fs::write(min.join("vue.min.js"), "").unwrap();
        fs::write(min.join("lodash.min.js"), "").unwrap();

        let names = vendor_names(&[dev, min, dir.path().join("missing")]).unwrap();
        let mut names: Vec<_> = names.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["lodash".to_string(), "vue".to_string()]);
    }
}
