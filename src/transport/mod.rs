//! Connects the explorer state to a real directory: listing fetches, moves
//! on disk and the serial session loop that applies their outcomes.

mod listing_source;
mod local_mover;
mod local_target;
mod session;

pub use listing_source::{ListingSource, LocalDirectorySource};
pub use local_mover::LocalMover;
pub use local_target::LocalTargetResolver;
pub use session::Session;
