//! `imgroup` - sort images into horizontal and vertical folders, with undo.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use imgroup::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let exit_code = imgroup::engine::execute(&cli)?;
    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "imgroup=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
