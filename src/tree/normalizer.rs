use std::sync::Arc;

use hashlink::LinkedHashMap;
use tracing::{debug, warn};

use crate::paths::{last_segment, trim_slashes};
use crate::tree::{ChildMap, Node};

/// One entry of a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingEntry {
    pub is_directory: bool,
}

#[cfg(test)]
impl ListingEntry {
    pub fn directory() -> Self {
        Self { is_directory: true }
    }

    pub fn file() -> Self {
        Self {
            is_directory: false,
        }
    }
}

/// A single directory level as returned by a listing call, keyed by path
pub type RawListing = LinkedHashMap<String, ListingEntry>;

/// Turns one listing level into child nodes, directories first.
///
/// Both buckets keep the listing's order. Entries whose key is empty once
/// slashes are stripped are dropped.
pub fn normalize(listing: &RawListing) -> ChildMap {
    let mut folders = ChildMap::new();
    let mut files = ChildMap::new();

    for (raw_path, entry) in listing {
        let path = trim_slashes(raw_path);
        if path.is_empty() {
            warn!("Skipping listing entry without a name: {:?}", raw_path);
            continue;
        }

        let node = Arc::new(Node::from_entry(path, entry.is_directory));
        let bucket = if entry.is_directory {
            &mut folders
        } else {
            &mut files
        };
        bucket.insert(last_segment(path).to_string(), node);
    }

    debug!(
        "Normalized listing into {} folders and {} files",
        folders.len(),
        files.len()
    );
    folders.extend(files);
    folders
}
