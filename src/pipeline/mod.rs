// Data processing pipeline: load, clean, save

pub mod cleaner;
pub mod loader;
pub mod persister;

pub use cleaner::{Cleaned, Cleaner};
pub use loader::load_data;
pub use persister::{describe_table, save_data, StoredTable};

use crate::config::Config;
use crate::error::Result;
use crate::metrics::StageTimer;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub rows_loaded: usize,
    pub rows_saved: usize,
    pub duplicates_dropped: usize,
    pub values_coerced: usize,
    pub categories: Vec<String>,
    pub table_name: String,
    pub destination: PathBuf,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run load → clean → save, printing a message at each stage boundary.
    pub fn run(
        &self,
        messages_path: &Path,
        categories_path: &Path,
        database_path: &Path,
    ) -> Result<PipelineReport> {
        println!(
            "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
            messages_path.display(),
            categories_path.display()
        );
        let df = {
            let _span = tracing::info_span!("load").entered();
            let _timer = StageTimer::start("load");
            load_data(messages_path, categories_path)?
        };
        let rows_loaded = df.len();

        println!("Cleaning data...");
        let cleaned = {
            let _span = tracing::info_span!("clean").entered();
            let _timer = StageTimer::start("clean");
            Cleaner::from_config(&self.config).clean_data(df)?
        };

        println!("Saving data...\n    DATABASE: {}", database_path.display());
        {
            let _span = tracing::info_span!("save").entered();
            let _timer = StageTimer::start("save");
            save_data(&cleaned.table, database_path, &self.config.table_name)?;
        }

        let stored = describe_table(database_path, &self.config.table_name)?;
        info!(
            rows = stored.row_count,
            columns = stored.columns.len(),
            table = %self.config.table_name,
            "Verified stored table"
        );

        println!("Cleaned data saved to database!");
        Ok(PipelineReport {
            rows_loaded,
            rows_saved: stored.row_count,
            duplicates_dropped: cleaned.duplicates_dropped,
            values_coerced: cleaned.values_coerced,
            categories: cleaned.categories,
            table_name: self.config.table_name.clone(),
            destination: database_path.to_path_buf(),
        })
    }
}
