use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Parse error for id {id}: cannot read an integer from category token '{token}'")]
    Parse { id: String, token: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EtlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The csv crate folds I/O failures into its own error; keep them apart.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if source.is_io_error() {
            match source.into_kind() {
                csv::ErrorKind::Io(err) => Self::Io { path, source: err },
                other => Self::Format(format!("{:?}", other)),
            }
        } else {
            Self::Csv { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
