//! Wayfarer terminal runner entry point.

use std::error::Error;
use std::io;

use tracing_subscriber::EnvFilter;
use wayfarer_runner::config::Config;
use wayfarer_runner::play::Runner;

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout carries the story.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        adventure = %config.adventure.display(),
        save_dir = %config.save_dir.display(),
        seeded = config.seed.is_some(),
        "Starting Wayfarer runner"
    );

    let mut runner = Runner::new(config, io::stdin().lock(), io::stdout().lock())?;
    runner.run()?;

    Ok(())
}
