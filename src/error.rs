//! Crate-wide error type.
//!
//! Expected business outcomes (a blocked trade, a missing forecast, a
//! market not accepting orders) are *not* errors — they are reason
//! codes on the persisted records. `Error` covers everything else:
//! configuration problems, I/O, vendor API failures, and programmer
//! precondition violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Brokerage API error: {0}")]
    Broker(String),

    #[error("sigma must be positive, got {0}")]
    InvalidSigma(f64),

    #[error("Daemon error: {0}")]
    Daemon(String),
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        Self::Connection(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
