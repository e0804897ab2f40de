//! `firstrarity`: compute word and text rarity tables for the collection

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use firstrarity_core::config::CONFIG_FILENAME;
use firstrarity_core::{Config, EthCallSource, OpenSeaIndex, PipelineContext, PngHistogram};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn run() -> anyhow::Result<()> {
    let config = Config::load(Path::new(CONFIG_FILENAME))
        .with_context(|| format!("loading {CONFIG_FILENAME}"))?;

    let texts = EthCallSource::connect(&config).context("connecting to contract")?;
    let ctx = PipelineContext {
        index: Box::new(OpenSeaIndex::new(&config)),
        texts: Box::new(texts),
        histogram: Box::new(PngHistogram::new(&config)),
        config,
    };

    ctx.run().context("rarity run aborted")?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
