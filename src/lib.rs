pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod table;

pub use config::{BinaryOverflow, Config};
pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, PipelineReport};
pub use table::{Table, Value};
