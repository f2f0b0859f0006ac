use std::path::PathBuf;

use compio::fs;
use tracing::debug;

use crate::drop_target::{FlatTreeItem, TargetResolver};
use crate::paths::trim_slashes;

/// Resolves drop targets named by path against the local filesystem.
///
/// A target that names nothing on disk resolves to no target at all, which
/// sends the drop to the root.
#[derive(Debug, Clone)]
pub struct LocalTargetResolver {
    root: PathBuf,
}

impl LocalTargetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TargetResolver<Option<String>> for LocalTargetResolver {
    async fn resolve(&self, target: &Option<String>) -> Option<FlatTreeItem> {
        let path = trim_slashes(target.as_deref()?);
        match fs::metadata(self.root.join(path)).await {
            Ok(metadata) => Some(FlatTreeItem {
                path: path.to_string(),
                is_directory: metadata.is_dir(),
            }),
            Err(e) => {
                debug!("Drop target '{}' not found: {}", path, e);
                None
            }
        }
    }
}
