use anyhow::Context;
use bannerscan::cli::{self, Cli};
use bannerscan::config::Verbosity;
use bannerscan::output;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    cli::scan::execute(cli)
        .await
        .with_context(|| format!("scan of {} failed", cli.host))
}

fn init_tracing(verbosity: Verbosity) {
    // RUST_LOG wins over -v/-q
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
