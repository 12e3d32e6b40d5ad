use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "message-transformer")]
#[command(about = "Upper-cases a JSON message payload and marks it PROCESSED")]
pub struct Cli {
    /// JSON message file. Falls back to `INPUT_PATH`, then stdin.
    pub input: Option<PathBuf>,
}
