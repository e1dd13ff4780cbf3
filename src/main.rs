use anyhow::Context;
use clap::Parser;
use md_script_filter::cli::CliArgs;
use md_script_filter::config::paths;
use md_script_filter::core::{ItemBuilder, ResultPipeline, SpotlightBackend};
use md_script_filter::utils::file_detection::{ImageFormats, MagicClassifier};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliArgs::parse().into_config(paths::home_dir());
    tracing::debug!("Resolved configuration: {:?}", config);

    let image_formats = ImageFormats::system();
    let home = config.home_str();
    let items = ItemBuilder::new(
        config.item_options(),
        home.as_deref(),
        &image_formats,
        &MagicClassifier,
    );

    let backend = SpotlightBackend::new().context("Could not initialise the search backend")?;
    let pipeline = ResultPipeline::new(&backend, items);

    let stdout = std::io::stdout();
    pipeline
        .run_to(
            &config.search_request(),
            &config.exclusion_set(),
            &mut stdout.lock(),
        )
        .context("Spotlight search failed")?;

    Ok(())
}
