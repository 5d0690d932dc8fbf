use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed table row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("exchange rate table is missing currency: {0}")]
    MissingRate(String),

    #[error("exchange rate table error: {0}")]
    RateTable(String),

    #[error("CSV file write failed: {0}")]
    FileWrite(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
