//! Drag-and-drop: from a drop event to a move of a file or folder.
//!
//! Resolving what lies under the pointer is asynchronous and left to a
//! [`TargetResolver`]. Once it answers, the destination directory is
//! computed synchronously against the current tree and the move is handed
//! to a [`MoveHandler`].

mod pipeline;
mod resolver;

pub use pipeline::{DropController, DropOutcome};
pub use resolver::{
    DragSource, FlatTreeItem, FlatTreeLookup, MoveHandler, MoveKind, MoveRequest, TargetResolver,
    plan_move,
};
