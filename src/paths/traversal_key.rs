use snafu::Snafu;

#[cfg(test)]
/// Field name children live under in the flattened key encoding
const CHILD_FIELD: &str = "child";

/// Address of a node inside a namespace tree: the namespace root plus the
/// segments leading from the root to the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraversalKey {
    root: String,
    segments: Vec<String>,
}

impl TraversalKey {
    /// Builds the key for `path` under `root`.
    ///
    /// Empty segments are discarded and a leading segment equal to the root
    /// identifier is dropped, so `"ws/a/b"`, `"/a/b/"` and `"a/b"` all
    /// address the same node under root `"ws"`.
    pub fn new(root: &str, path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        if segments.first().is_some_and(|first| first == root) {
            segments.remove(0);
        }

        Ok(Self {
            root: root.to_string(),
            segments,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Key of the containing directory, `None` for the root key
    pub fn parent(&self) -> Option<TraversalKey> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            root: self.root.clone(),
            segments: parent.to_vec(),
        })
    }

    /// Final segment, `None` for the root key
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the addressed node relative to the namespace root
    pub fn relative_path(&self) -> String {
        self.segments.join("/")
    }

    /// Flattened encoding used by nested-map trees: the root, then the first
    /// segment directly, then every deeper segment behind a `child` hop.
    #[cfg(test)]
    pub fn to_key_sequence(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(1 + self.segments.len() * 2);
        keys.push(self.root.clone());
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                keys.push(CHILD_FIELD.to_string());
            }
            keys.push(segment.clone());
        }
        keys
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum PathError {
    #[snafu(display("Cannot build a traversal key from an empty path"))]
    EmptyPath,
}
