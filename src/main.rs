use anyhow::Context;
use clap::Parser;
use message_transformer::{
    Cli, Config, LogFormat, UppercaseTransformer, init_logging, run_with_stdio,
};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(LogFormat::from_env());

    let result = Config::from_env()
        .context("Failed to load configuration")
        .map(|config| config.with_input_path(cli.input))
        .and_then(|config| run_with_stdio(&config, &UppercaseTransformer));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                event = "application_failed",
                error = ?e,
                "Message transformer failed"
            );
            ExitCode::FAILURE
        }
    }
}
