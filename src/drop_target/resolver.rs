use derive_more::Display;

use crate::namespace::ExplorerState;
use crate::paths::{ROOT_PATH, parent_of, trim_slashes};

/// The entry being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub path: String,
    pub is_directory: bool,
}

/// Flat view of a tree entry, as handed out by resolvers and lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTreeItem {
    pub path: String,
    pub is_directory: bool,
}

/// Turns a raw drop event into the entry under the pointer, if any
pub trait TargetResolver<E> {
    async fn resolve(&self, event: &E) -> Option<FlatTreeItem>;
}

/// Access to the current tree by path
pub trait FlatTreeLookup {
    fn lookup_item(&self, path: &str) -> Option<FlatTreeItem>;
}

impl FlatTreeLookup for ExplorerState {
    fn lookup_item(&self, path: &str) -> Option<FlatTreeItem> {
        self.lookup(path).map(|node| FlatTreeItem {
            path: node.path.clone(),
            is_directory: node.is_directory,
        })
    }
}

/// Performs the actual relocation.
///
/// Implementations must refuse to move a folder into itself or one of its
/// descendants; the resolver never checks for that.
pub trait MoveHandler {
    type Error;

    async fn move_file(&self, destination: &str, source: &str) -> Result<(), Self::Error>;
    async fn move_folder(&self, destination: &str, source: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

/// A move decided by a drop, ready to hand to a [`MoveHandler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub kind: MoveKind,
    pub destination: String,
    pub source: String,
}

impl MoveRequest {
    pub async fn apply<M: MoveHandler>(&self, mover: &M) -> Result<(), M::Error> {
        match self.kind {
            MoveKind::File => mover.move_file(&self.destination, &self.source).await,
            MoveKind::Folder => mover.move_folder(&self.destination, &self.source).await,
        }
    }
}

/// Directory a drop on `target` moves into.
///
/// No target means the background, i.e. the root. A directory receives the
/// drop itself, a file hands it to its parent. When the lookup does not
/// know the target, the resolver's own classification is used.
pub fn destination_directory(target: Option<FlatTreeItem>, lookup: &impl FlatTreeLookup) -> String {
    let Some(target) = target.filter(|target| !trim_slashes(&target.path).is_empty()) else {
        return ROOT_PATH.to_string();
    };
    let destination = lookup.lookup_item(&target.path).unwrap_or(target);

    if destination.is_directory {
        let path = trim_slashes(&destination.path);
        if path.is_empty() {
            ROOT_PATH.to_string()
        } else {
            path.to_string()
        }
    } else {
        parent_of(&destination.path).unwrap_or_else(|| ROOT_PATH.to_string())
    }
}

pub fn plan_move(
    source: &DragSource,
    target: Option<FlatTreeItem>,
    lookup: &impl FlatTreeLookup,
) -> MoveRequest {
    let kind = if source.is_directory {
        MoveKind::Folder
    } else {
        MoveKind::File
    };

    MoveRequest {
        kind,
        destination: destination_directory(target, lookup),
        source: source.path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{Action, Namespace};
    use crate::tree::{ListingEntry, RawListing};
    use rstest::*;

    fn state() -> ExplorerState {
        let mut root = RawListing::new();
        root.insert("contracts".to_string(), ListingEntry::directory());
        root.insert("README.md".to_string(), ListingEntry::file());
        let mut contracts = RawListing::new();
        contracts.insert("contracts/token.sol".to_string(), ListingEntry::file());

        ExplorerState::default()
            .reduce(Action::ModeChanged(Namespace::Localhost))
            .reduce(Action::RequestSucceeded {
                path: "localhost".into(),
                listing: root,
            })
            .reduce(Action::RequestSucceeded {
                path: "contracts".into(),
                listing: contracts,
            })
    }

    fn item(path: &str, is_directory: bool) -> Option<FlatTreeItem> {
        Some(FlatTreeItem {
            path: path.to_string(),
            is_directory,
        })
    }

    #[rstest]
    #[case(None, "/")]
    #[case(item("", true), "/")]
    #[case(item("contracts", false), "contracts")]
    #[case(item("contracts/token.sol", true), "contracts")]
    #[case(item("README.md", false), "/")]
    #[case(item("localhost", true), "/")]
    #[case(item("unknown/dir", true), "unknown/dir")]
    #[case(item("unknown/file.txt", false), "unknown")]
    fn destination_follows_tree(#[case] target: Option<FlatTreeItem>, #[case] expected: &str) {
        assert_eq!(destination_directory(target, &state()), expected);
    }

    #[test]
    fn file_dropped_on_file_goes_to_its_parent() {
        let source = DragSource {
            path: "README.md".into(),
            is_directory: false,
        };

        let request = plan_move(&source, item("contracts/token.sol", false), &state());

        assert_eq!(
            request,
            MoveRequest {
                kind: MoveKind::File,
                destination: "contracts".into(),
                source: "README.md".into(),
            }
        );
    }

    #[test]
    fn folder_dropped_on_background_goes_to_root() {
        let source = DragSource {
            path: "contracts".into(),
            is_directory: true,
        };

        let request = plan_move(&source, None, &state());

        assert_eq!(request.kind, MoveKind::Folder);
        assert_eq!(request.destination, ROOT_PATH);
    }
}
