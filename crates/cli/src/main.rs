use anyhow::{Context, Result};
use clap::Parser;
use pluginforge::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; -v raises the default from warn to debug
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // One process at a time: a single-threaded runtime is all a run needs
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let succeeded = runtime.block_on(cli.command.execute())?;
    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
