//! Finding module spec files under the given paths.

use crate::config::TargetPlatform;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Decides which files are module spec candidates.
#[derive(Debug, Clone, Default)]
pub struct SpecFilter {
    /// When set, `<name>.<other platform>.ts` files are skipped.
    pub platform: Option<TargetPlatform>,
    /// Paths matching this are skipped.
    pub exclude: Option<Regex>,
}

impl SpecFilter {
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        let is_spec = file_name.starts_with("Native") && !file_name.starts_with("NativeUIManager");
        let is_typescript =
            (file_name.ends_with(".ts") || file_name.ends_with(".tsx")) && !file_name.ends_with(".d.ts");
        let is_test = path.components().any(|c| c.as_os_str() == "__tests__");
        let is_excluded = self
            .exclude
            .as_ref()
            .is_some_and(|re| re.is_match(&path.to_string_lossy()));
        if !is_spec || !is_typescript || is_test || is_excluded {
            return false;
        }

        let Some(platform) = self.platform else {
            return true;
        };
        let segments: Vec<&str> = file_name.split('.').collect();
        segments.len() == 2 || segments[1] == platform.as_str()
    }
}

/// Expand directories into the spec files below them, in file-name order.
/// Files named directly are filtered the same way.
pub fn discover_spec_files(paths: &[PathBuf], filter: &SpecFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && filter.accepts(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if filter.accepts(path) {
            files.push(path.clone());
        } else {
            tracing::debug!(path = %path.display(), "skipping, not a spec file");
        }
    }
    files
}
