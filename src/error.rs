use crate::parsing::error::ParsingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("File {file}, at line {line_number}: {error}")]
    Parsing {
        error: ParsingError,
        file: String,
        line_number: u64,
    },
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to download data: {0}")]
    Download(#[from] reqwest::Error),
    #[error("Failed to decode data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Report entry \"{0}\" is missing")]
    MissingMergeKey(&'static str),
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
