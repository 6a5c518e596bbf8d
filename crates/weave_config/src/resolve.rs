//! Resolution of configured paths against the project root.

use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Returns the library search paths, with relative entries joined onto
/// `project_dir`. Order is preserved.
pub fn resolve_library_paths(project_dir: &Path, config: &ProjectConfig) -> Vec<PathBuf> {
    config
        .library
        .paths
        .iter()
        .map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                project_dir.join(p)
            }
        })
        .collect()
}
