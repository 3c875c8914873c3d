// src/main.rs

use std::process::ExitCode;

use syncwatcher::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.effective_log_level(), args.log_file.as_deref()) {
        eprintln!("syncwatcher: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "fatal error; exiting");
            eprintln!("syncwatcher: {err:#}");
            ExitCode::FAILURE
        }
    }
}
