use std::sync::Arc;

use derive_more::Display;
use hashlink::LinkedHashMap;

use crate::paths::{GIST_PREFIX, TraversalKey, last_segment, name_of, trim_slashes};

/// Children of a loaded directory, keyed by raw path segment in display order
pub type ChildMap = LinkedHashMap<String, Arc<Node>>;

/// Kind of entry a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeType {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
    #[display("gist")]
    Gist,
}

impl NodeType {
    pub fn classify(segment: &str, is_directory: bool) -> Self {
        match (is_directory, segment.starts_with(GIST_PREFIX)) {
            (false, _) => NodeType::File,
            (true, true) => NodeType::Gist,
            (true, false) => NodeType::Folder,
        }
    }
}

/// A named entry of a namespace tree.
///
/// `child` is `None` while a directory has not been listed yet, and
/// `Some` (possibly empty) once it has. Files never carry children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub is_directory: bool,
    pub node_type: NodeType,
    pub child: Option<ChildMap>,
}

impl Node {
    /// Node for a listing entry, with no children loaded
    pub fn from_entry(path: &str, is_directory: bool) -> Self {
        let path = trim_slashes(path);
        let segment = last_segment(path);
        let name = if is_directory {
            name_of(path)
        } else {
            segment.to_string()
        };

        Self {
            path: path.to_string(),
            name,
            is_directory,
            node_type: NodeType::classify(segment, is_directory),
            child: None,
        }
    }

    /// Root directory of a namespace
    pub fn root(root_id: &str, child: Option<ChildMap>) -> Self {
        Self {
            path: String::new(),
            name: root_id.to_string(),
            is_directory: true,
            node_type: NodeType::Folder,
            child,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.child.is_some()
    }

    pub fn get_child(&self, segment: &str) -> Option<&Arc<Node>> {
        self.child.as_ref()?.get(segment)
    }

    /// Walks `segments` down from this node
    pub fn descend(&self, segments: &[String]) -> Option<&Node> {
        segments.iter().try_fold(self, |node, segment| {
            node.get_child(segment).map(Arc::as_ref)
        })
    }

    /// Same entry apart from children
    pub fn same_entry(&self, other: &Node) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.is_directory == other.is_directory
            && self.node_type == other.node_type
    }
}

/// All roots of one namespace, keyed by root identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTree {
    roots: LinkedHashMap<String, Arc<Node>>,
}

impl NamespaceTree {
    /// Tree holding a single, fully listed root
    pub fn with_root(root_id: &str, children: ChildMap) -> Self {
        let mut roots = LinkedHashMap::new();
        roots.insert(
            root_id.to_string(),
            Arc::new(Node::root(root_id, Some(children))),
        );
        Self { roots }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn root(&self, root_id: &str) -> Option<&Arc<Node>> {
        self.roots.get(root_id)
    }

    pub fn lookup(&self, key: &TraversalKey) -> Option<&Node> {
        self.root(key.root())?.descend(key.segments())
    }

    pub(crate) fn set_root(&mut self, root_id: &str, root: Arc<Node>) {
        match self.roots.get_mut(root_id) {
            Some(slot) => *slot = root,
            None => {
                self.roots.insert(root_id.to_string(), root);
            }
        }
    }

    pub(crate) fn remove_root(&mut self, root_id: &str) -> Option<Arc<Node>> {
        self.roots.remove(root_id)
    }
}
