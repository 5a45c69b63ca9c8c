use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid credit id: {0}")]
    InvalidCreditId(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
