use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory mirrored as the shared folder
    pub root: PathBuf,
    pub script: Option<PathBuf>,
    /// Paths listed on startup, together with their ancestors
    pub expand: Vec<String>,
    pub use_color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            script: cli.script,
            expand: cli.expand,
            use_color: cli.color.use_color(),
        }
    }
}
