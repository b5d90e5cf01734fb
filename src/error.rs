use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised before anything is written to the database.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Date is required")]
    MissingDate,

    #[error("Category cannot be empty")]
    BlankCategory,

    #[error("Transaction type is required")]
    MissingType,

    #[error("Invalid transaction ID: {0}")]
    InvalidId(i64),

    #[error("Date {0} is outside the supported years 0000 to 9999")]
    DateOutOfRange(NaiveDate),

    #[error("Start date {start} cannot be after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
