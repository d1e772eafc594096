use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use disaster_etl::constants::USAGE;
use disaster_etl::logging;
use disaster_etl::{Config, Pipeline};

#[derive(Parser)]
#[command(name = "disaster_etl")]
#[command(about = "Join disaster messages with their categories and load them into SQLite")]
#[command(version = "0.1.0")]
struct Cli {
    /// <messages_csv> <categories_csv> <database>
    #[arg(allow_hyphen_values = true)]
    paths: Vec<PathBuf>,

    /// Optional TOML file overriding table name, delimiter and logging
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let [messages, categories, database] = match <[PathBuf; 3]>::try_from(cli.paths) {
        Ok(paths) => paths,
        Err(_) => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    dotenv::dotenv().ok();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_logging(&config.logging)?;

    let report = Pipeline::new(config).run(&messages, &categories, &database)?;
    info!(
        rows_loaded = report.rows_loaded,
        rows_saved = report.rows_saved,
        duplicates_dropped = report.duplicates_dropped,
        values_coerced = report.values_coerced,
        categories = report.categories.len(),
        table = %report.table_name,
        destination = %report.destination.display(),
        "Pipeline finished"
    );
    Ok(())
}
