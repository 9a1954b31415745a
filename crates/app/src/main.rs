//! Cadence CLI

use std::process::ExitCode;

use cadence_app::observability::init_logging;

mod cli;

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = cli::Cli::load();

    if let Err(error) = init_logging(&cli.config.logging) {
        eprintln!("{error}");

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");

            ExitCode::FAILURE
        }
    }
}
