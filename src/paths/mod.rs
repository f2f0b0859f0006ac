//! Slash-delimited path helpers shared by every namespace.
//!
//! Paths handled here are relative to a namespace root, use `/` as the only
//! separator and never carry meaning in leading or trailing slashes.

mod path_utils;
mod traversal_key;

pub use path_utils::{GIST_PREFIX, ROOT_PATH, last_segment, name_of, parent_of, trim_slashes};
pub use traversal_key::{PathError, TraversalKey};
