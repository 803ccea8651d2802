// File: crates/tsplot/src/main.rs
// Summary: tsplot binary; sets up logging and runs the requested chart subcommand.

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tsplot_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(cli.log_level.into())
        .with_env_var("TSPLOT_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}
