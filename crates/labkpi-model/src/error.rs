use thiserror::Error;

/// Structural ingestion failures surfaced verbatim to the caller.
///
/// Field-level coercion failures are never represented here; a cell that
/// fails to parse becomes `None` in the mapped record instead.
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("Empty or invalid file")]
    EmptyFile,
    #[error("Missing required date column. Available headers: {available}")]
    MissingDateColumn { available: String },
    #[error("Could not detect file type or no usable records found")]
    NoRecords,
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("failed to read workbook: {0}")]
    Workbook(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KpiError>;
