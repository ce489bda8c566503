use anyhow::{Context, Result};
use clap::Parser;

use stockprice_exporter::app;
use stockprice_exporter::cli::Cli;
use stockprice_exporter::config::{load_config, ConfigOverrides};

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &ConfigOverrides::from(&cli))
        .context("Failed to load configuration")?;

    app::run(config).context("Exporter stopped")?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
