//! The `stacks` binary.

use clap::Parser;
use stacks_catalog::SystemClock;
use stacks_cli::{Cli, TerminalConfirm};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let confirm = TerminalConfirm::new(cli.yes);
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: could not start async runtime: {err}");
            return ExitCode::FAILURE;
        },
    };
    let mut stdout = std::io::stdout().lock();
    match runtime.block_on(stacks_cli::run(cli, Arc::new(SystemClock), &confirm, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "Command failed");
            eprintln!("error: {}", *err);
            ExitCode::FAILURE
        },
    }
}
