use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod output;

use cli::Cli;
use config::ConfigError;
use output::OutputWriter;

const EXIT_STAGE_FAILED: u8 = 1;
const EXIT_CONFIG_MISSING: u8 = 2;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "prompt_lab=debug" } else { "prompt_lab=info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = OutputWriter::new(cli.output, cli.no_color);

    match commands::execute(&cli.command).await {
        Ok(report) => {
            if let Err(e) = output.write_report(&report) {
                output.error(&format!("{:#}", e));
            }
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_STAGE_FAILED)
            }
        }
        Err(e) => {
            output.error(&format!("{:#}", e));
            match e.downcast_ref::<ConfigError>() {
                Some(ConfigError::NotFound(_)) => ExitCode::from(EXIT_CONFIG_MISSING),
                _ => ExitCode::from(EXIT_STAGE_FAILED),
            }
        }
    }
}
