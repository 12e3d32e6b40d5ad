pub mod cli;
pub mod conf;
pub mod logging;
pub mod runner;
pub mod transform;

use anyhow::Result;

pub use crate::cli::Cli;
pub use crate::conf::{Config, InputSource};
pub use crate::logging::{LogFormat, init_logging};
pub use crate::runner::{Outcome, message_preview, read_input, run};
pub use crate::transform::{
    Message, MessageTransformer, PROCESSED, TransformError, UppercaseTransformer, transform,
};

/// Convenience runner wired to the process's stdin and stdout.
///
/// # Errors
/// Propagates any errors from [`run`]: unreadable input, a message that fails
/// to decode, or a failed write to stdout.
pub fn run_with_stdio<T>(config: &Config, transformer: &T) -> Result<Outcome>
where
    T: MessageTransformer + ?Sized,
{
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    run(config, transformer, stdin, stdout)
}
