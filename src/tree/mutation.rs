use std::sync::Arc;

use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::paths::TraversalKey;
use crate::tree::update::{
    EntryNotFoundSnafu, InvalidPathSnafu, NotADirectorySnafu, TreeUpdateError, rebuild_at,
};
use crate::tree::{ChildMap, NamespaceTree, Node};

/// Makes sure an entry exists at `path`.
///
/// The new entry is an unlisted node; its real content arrives with the next
/// listing of its parent. An existing entry is kept as is, and nothing is
/// added below a directory that was never listed, since that would make the
/// directory look loaded.
pub fn insert(
    tree: &NamespaceTree,
    root_id: &str,
    path: &str,
    is_directory: bool,
) -> Result<NamespaceTree, TreeUpdateError> {
    let key = TraversalKey::new(root_id, path).context(InvalidPathSnafu)?;

    if tree.lookup(&key).is_some() {
        debug!("Entry '{}' already present", path);
        return Ok(tree.clone());
    }

    let Some(parent) = key.parent() else {
        let mut next = tree.clone();
        next.set_root(root_id, Arc::new(Node::root(root_id, None)));
        return Ok(next);
    };
    let leaf = key.leaf().unwrap_or_default();

    if tree.lookup(&parent).is_some_and(|dir| dir.is_directory && !dir.is_loaded()) {
        debug!(
            "Parent of '{}' is not listed yet, leaving it for the next listing",
            path
        );
        return Ok(tree.clone());
    }

    rebuild_at(tree, &parent, |dir| {
        if !dir.is_directory {
            return NotADirectorySnafu {
                path: parent.relative_path(),
            }
            .fail();
        }

        let mut updated = dir.clone();
        let children = updated.child.get_or_insert_with(ChildMap::new);
        let node = Arc::new(Node::from_entry(&key.relative_path(), is_directory));
        place_child(children, leaf, node);
        Ok(updated)
    })
}

/// Adds `node` to a level, directories after the last directory and files
/// at the end
fn place_child(children: &mut ChildMap, leaf: &str, node: Arc<Node>) {
    if !node.is_directory || children.values().all(|child| child.is_directory) {
        children.insert(leaf.to_string(), node);
        return;
    }

    let mut reordered = ChildMap::with_capacity(children.len() + 1);
    let mut pending = Some(node);
    for (segment, child) in std::mem::take(children) {
        if !child.is_directory
            && let Some(node) = pending.take()
        {
            reordered.insert(leaf.to_string(), node);
        }
        reordered.insert(segment, child);
    }
    *children = reordered;
}

/// Deletes the entry at `path` together with everything below it.
pub fn remove(
    tree: &NamespaceTree,
    root_id: &str,
    path: &str,
) -> Result<NamespaceTree, TreeUpdateError> {
    let key = TraversalKey::new(root_id, path).context(InvalidPathSnafu)?;

    let Some(parent) = key.parent() else {
        let mut next = tree.clone();
        next.remove_root(root_id).context(EntryNotFoundSnafu {
            path: root_id.to_string(),
        })?;
        return Ok(next);
    };
    let leaf = key.leaf().unwrap_or_default();

    rebuild_at(tree, &parent, |dir| {
        if dir.get_child(leaf).is_none() {
            return EntryNotFoundSnafu {
                path: key.relative_path(),
            }
            .fail();
        }

        let mut updated = dir.clone();
        if let Some(children) = updated.child.as_mut() {
            children.remove(leaf);
        }
        Ok(updated)
    })
}
