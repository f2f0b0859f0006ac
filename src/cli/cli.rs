use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorChoice, LogLevel};

/// Mirrors a directory as a lazily listed tree and replays events against it
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory to mirror
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// YAML event script replayed after the initial listing
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// Directory to list on startup, may be repeated
    #[clap(long, short)]
    pub expand: Vec<String>,

    #[clap(long, default_value = "auto", value_enum)]
    pub color: ColorChoice,
}
