use std::io::ErrorKind;
use std::path::PathBuf;

use compio::fs;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info};

use crate::drop_target::MoveHandler;
use crate::paths::{ROOT_PATH, last_segment, trim_slashes};

/// Moves entries on the local filesystem, with every path relative to `root`
#[derive(Debug, Clone)]
pub struct LocalMover {
    root: PathBuf,
}

impl LocalMover {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative_path: &str) -> PathBuf {
        let relative_path = trim_slashes(relative_path);
        if relative_path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative_path)
        }
    }

    async fn relocate(&self, destination: &str, source: &str) -> Result<(), MoveError> {
        let from = self.resolve(source);
        match fs::metadata(&from).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return SourceMissingSnafu { path: source }.fail();
            }
            Err(e) => return Err(e).context(IoSnafu { path: source }),
        }

        let to = self.resolve(destination).join(last_segment(source));
        if to == from {
            debug!("'{}' already lives in '{}'", source, destination);
            return Ok(());
        }
        match fs::metadata(&to).await {
            Ok(_) => {
                return DestinationExistsSnafu {
                    path: to.display().to_string(),
                }
                .fail();
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).context(IoSnafu { path: source }),
        }

        info!("Renaming {} to {}", from.display(), to.display());
        fs::rename(&from, &to)
            .await
            .context(IoSnafu { path: source })
    }
}

/// Whether `path` is `ancestor` itself or lies below it
fn is_within(path: &str, ancestor: &str) -> bool {
    let path = trim_slashes(path);
    let ancestor = trim_slashes(ancestor);
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl MoveHandler for LocalMover {
    type Error = MoveError;

    async fn move_file(&self, destination: &str, source: &str) -> Result<(), MoveError> {
        self.relocate(destination, source).await
    }

    async fn move_folder(&self, destination: &str, source: &str) -> Result<(), MoveError> {
        ensure!(
            destination == ROOT_PATH || !is_within(destination, source),
            CycleSnafu {
                source_path: source,
                destination,
            }
        );
        self.relocate(destination, source).await
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MoveError {
    #[snafu(display("Cannot move '{}' into itself ('{}')", source_path, destination))]
    Cycle {
        source_path: String,
        destination: String,
    },
    #[snafu(display("'{}' does not exist", path))]
    SourceMissing { path: String },
    #[snafu(display("{} already exists", path))]
    DestinationExists { path: String },
    #[snafu(display("Failed to move '{}': {}", path, source))]
    Io {
        path: String,
        source: std::io::Error,
    },
}
