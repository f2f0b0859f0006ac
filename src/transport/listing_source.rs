use std::fs;
use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::paths::trim_slashes;
use crate::tree::{ListingEntry, RawListing};

/// Provider of one directory level at a time
pub trait ListingSource {
    /// Lists the directory at `relative_path` below the source's root.
    /// An empty path lists the root itself.
    async fn fetch(&self, relative_path: &str) -> Result<RawListing, FetchError>;
}

/// Lists directories of the local filesystem below `root`
#[derive(Debug, Clone)]
pub struct LocalDirectorySource {
    root: PathBuf,
}

impl LocalDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ListingSource for LocalDirectorySource {
    async fn fetch(&self, relative_path: &str) -> Result<RawListing, FetchError> {
        let relative_path = trim_slashes(relative_path);
        let directory = if relative_path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative_path)
        };
        debug!("Listing {}", directory.display());

        let mut entries = Vec::new();
        for entry in fs::read_dir(&directory).context(ReadDirSnafu {
            path: directory.clone(),
        })? {
            let entry = entry.context(ReadEntrySnafu {
                path: directory.clone(),
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                warn!("Skipping {}: name is not valid UTF-8", entry.path().display());
                continue;
            };
            // Follows symlinks so a linked directory lists as a directory
            let is_directory = compio::fs::metadata(entry.path())
                .await
                .map(|metadata| metadata.is_dir())
                .context(ReadEntrySnafu { path: entry.path() })?;
            entries.push((name, is_directory));
        }
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));

        Ok(entries
            .into_iter()
            .map(|(name, is_directory)| {
                let path = if relative_path.is_empty() {
                    name
                } else {
                    format!("{relative_path}/{name}")
                };
                (path, ListingEntry { is_directory })
            })
            .collect())
    }
}

#[derive(Debug, Snafu)]
pub enum FetchError {
    #[snafu(display("Cannot list {}: {}", path.display(), source))]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Cannot read an entry of {}: {}", path.display(), source))]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("contracts/lib")).unwrap();
        fs::create_dir(dir.path().join("gist-42-notes")).unwrap();
        fs::write(dir.path().join("README.md"), "readme").unwrap();
        fs::write(dir.path().join("contracts/token.sol"), "contract").unwrap();
        dir
    }

    fn keys(listing: &RawListing) -> Vec<(&str, bool)> {
        listing
            .iter()
            .map(|(path, entry)| (path.as_str(), entry.is_directory))
            .collect()
    }

    #[compio::test]
    async fn lists_root_sorted_by_name() {
        let dir = fixture();
        let source = LocalDirectorySource::new(dir.path());

        let listing = source.fetch("").await.unwrap();

        assert_eq!(
            keys(&listing),
            vec![
                ("README.md", false),
                ("contracts", true),
                ("gist-42-notes", true),
            ]
        );
    }

    #[compio::test]
    async fn nested_listing_uses_root_relative_keys() {
        let dir = fixture();
        let source = LocalDirectorySource::new(dir.path());

        let listing = source.fetch("/contracts/").await.unwrap();

        assert_eq!(
            keys(&listing),
            vec![("contracts/lib", true), ("contracts/token.sol", false)]
        );
    }

    #[cfg(unix)]
    #[compio::test]
    async fn skips_names_that_are_not_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = fixture();
        let name = OsStr::from_bytes(b"bad-\xff.txt");
        if fs::write(dir.path().join(name), "").is_err() {
            // Some filesystems refuse such names outright
            return;
        }
        let source = LocalDirectorySource::new(dir.path());

        let listing = source.fetch("").await.unwrap();

        assert_eq!(
            keys(&listing),
            vec![
                ("README.md", false),
                ("contracts", true),
                ("gist-42-notes", true),
            ]
        );
    }

    #[compio::test]
    async fn missing_directory_fails() {
        let dir = fixture();
        let source = LocalDirectorySource::new(dir.path());

        let result = source.fetch("nope").await;

        assert!(matches!(result, Err(FetchError::ReadDir { .. })));
    }
}
