use std::sync::Arc;

use snafu::ResultExt;
use tracing::debug;

use crate::paths::TraversalKey;
use crate::tree::update::{InvalidPathSnafu, NotADirectorySnafu, TreeUpdateError, rebuild_at};
use crate::tree::{ChildMap, NamespaceTree, Node, RawListing, normalize};

/// Applies a fetched listing of `path` to the tree.
///
/// Listing the root replaces the whole tree. Listing any other directory
/// replaces that directory's level while keeping the already loaded
/// subtrees of entries that are listed again.
pub fn merge_level(
    tree: &NamespaceTree,
    root_id: &str,
    path: &str,
    listing: &RawListing,
) -> Result<NamespaceTree, TreeUpdateError> {
    let key = TraversalKey::new(root_id, path).context(InvalidPathSnafu)?;
    let fetched = normalize(listing);

    if key.is_root() {
        debug!(
            "Replacing root '{}' with {} entries",
            root_id,
            fetched.len()
        );
        return Ok(NamespaceTree::with_root(root_id, fetched));
    }

    debug!(
        "Merging {} entries under '{}'",
        fetched.len(),
        key.relative_path()
    );
    rebuild_at(tree, &key, |existing| {
        if !existing.is_directory {
            return NotADirectorySnafu {
                path: key.relative_path(),
            }
            .fail();
        }

        let mut merged = existing.clone();
        merged.child = Some(merge_children(fetched, existing.child.as_ref()));
        Ok(merged)
    })
}

/// Merges a fetched level over the previous one.
///
/// The result has exactly the fetched keys in the fetched order.
pub fn merge_children(fetched: ChildMap, existing: Option<&ChildMap>) -> ChildMap {
    let Some(existing) = existing else {
        return fetched;
    };

    fetched
        .into_iter()
        .map(|(segment, node)| {
            let merged = match existing.get(&segment) {
                Some(previous) => merge_node(node, previous),
                None => node,
            };
            (segment, merged)
        })
        .collect()
}

/// Fetched fields win; a directory listed again keeps its loaded children.
fn merge_node(fetched: Arc<Node>, existing: &Arc<Node>) -> Arc<Node> {
    let same_directory =
        fetched.is_directory && existing.is_directory && fetched.path == existing.path;
    if !same_directory {
        return fetched;
    }

    let Some(previous) = existing.child.as_ref() else {
        return fetched;
    };

    match fetched.child.as_ref() {
        None if fetched.same_entry(existing) => Arc::clone(existing),
        None => {
            let mut node = Node::clone(&fetched);
            node.child = Some(previous.clone());
            Arc::new(node)
        }
        Some(next) => {
            let mut node = Node::clone(&fetched);
            node.child = Some(merge_children(next.clone(), Some(previous)));
            Arc::new(node)
        }
    }
}
