//! Binario `flowviz`: servidor de visualización de pipelines sobre un
//! directorio de proyecto.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowviz_rust::cli::{Cli, Command};
use flowviz_rust::{config, server};

#[tokio::main]
async fn main() -> ExitCode {
    config::init_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => server::run(args).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
