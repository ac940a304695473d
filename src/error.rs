use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed BlockCode '{block_code}' at line {line}: expected at least {expected} characters")]
    MalformedBlockCode {
        line: u64,
        block_code: String,
        expected: usize,
    },

    #[error("Destination table '{table}' already exists in {}", .path.display())]
    DestinationExists { table: String, path: PathBuf },

    #[error("Failed to write row from line {line}: {source}")]
    Write {
        line: u64,
        #[source]
        source: Box<LoaderError>,
    },

    #[error("Index build failed, load rolled back: {source}")]
    IndexBuild {
        #[source]
        source: Box<LoaderError>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Sink error: {message}")]
    Sink { message: String },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
