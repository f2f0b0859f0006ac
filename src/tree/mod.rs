//! In-memory mirror of a file tree.
//!
//! Directories are listed one level at a time; each listing is normalized
//! into child nodes and merged under the directory it belongs to. Point
//! insertions and removals keep the tree in step between listings. Every
//! update returns a new tree that shares all untouched branches with the
//! previous one.

mod merge;
mod mutation;
mod node;
mod normalizer;
mod render;
mod update;

pub use merge::merge_level;
pub use mutation::{insert, remove};
pub use node::{ChildMap, NamespaceTree, Node, NodeType};
pub use normalizer::{ListingEntry, RawListing, normalize};
pub use render::render;
pub use update::TreeUpdateError;
