use anyhow::Result;
use clap::Parser;
use netkeeper::args::Cli;
use netkeeper::config::Config;
use netkeeper::{logging, runner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env();

    // Misconfiguration surfaces here and exits with code 1
    let config = Config::from_cli(&cli)?;

    runner::run(&config).await
}
