//! The two isolated namespaces and the dispatcher routing actions to them.
//!
//! The browser namespace is rooted at the current workspace, the localhost
//! namespace at the literal `localhost`. Request, listing and change actions
//! only ever touch the namespace selected by the current mode.

mod action;
mod explorer;
mod notification;
mod state;

pub use action::*;
pub use explorer::ExplorerState;
pub use notification::Notification;
pub use state::{LOCALHOST_ROOT, Namespace, NamespaceState};
