use std::sync::Arc;

use snafu::{OptionExt, Snafu};

use crate::paths::{PathError, TraversalKey};
use crate::tree::{NamespaceTree, Node};

/// Rebuilds the tree with the node at `key` replaced by `update(node)`.
///
/// Only the nodes between the root and `key` are copied; every other branch
/// is shared with `tree`, which is left untouched.
pub(crate) fn rebuild_at<F>(
    tree: &NamespaceTree,
    key: &TraversalKey,
    update: F,
) -> Result<NamespaceTree, TreeUpdateError>
where
    F: FnOnce(&Node) -> Result<Node, TreeUpdateError>,
{
    let root = tree.root(key.root()).context(MissingNodeSnafu {
        path: key.root().to_string(),
    })?;
    let rebuilt = rebuild_node(root, key.segments(), key, update)?;

    let mut next = tree.clone();
    next.set_root(key.root(), rebuilt);
    Ok(next)
}

fn rebuild_node<F>(
    node: &Arc<Node>,
    segments: &[String],
    key: &TraversalKey,
    update: F,
) -> Result<Arc<Node>, TreeUpdateError>
where
    F: FnOnce(&Node) -> Result<Node, TreeUpdateError>,
{
    let Some((segment, rest)) = segments.split_first() else {
        return update(node).map(Arc::new);
    };

    let child = node.get_child(segment).context(MissingNodeSnafu {
        path: key.relative_path(),
    })?;
    let rebuilt = rebuild_node(child, rest, key, update)?;

    let mut copy = Node::clone(node);
    if let Some(slot) = copy
        .child
        .as_mut()
        .and_then(|children| children.get_mut(segment.as_str()))
    {
        *slot = rebuilt;
    }
    Ok(Arc::new(copy))
}

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum TreeUpdateError {
    #[snafu(display("Invalid tree path"))]
    InvalidPath { source: PathError },
    #[snafu(display("No loaded node on the way to '{}'", path))]
    MissingNode { path: String },
    #[snafu(display("'{}' is not a directory", path))]
    NotADirectory { path: String },
    #[snafu(display("No entry at '{}'", path))]
    EntryNotFound { path: String },
}
