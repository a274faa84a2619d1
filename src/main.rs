#![allow(non_snake_case)]

use std::env;
use std::process::ExitCode;

use clinicAgenda::cli;
use clinicAgenda::config::{AppConfig, Settings};
use tracing::error;

const DEFAULT_LOG_FILTER: &str = "clinicAgenda=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => AppConfig::default(),
    };

    let settings = match Settings::resolve(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli::cli(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Erro: {e}");
            ExitCode::FAILURE
        }
    }
}
