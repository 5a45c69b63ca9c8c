use ccr_ledger::LedgerError;

/// Errors produced by market operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    /// The credit has no ledger entries: it does not exist.
    #[error("credit not found")]
    CreditNotFound,

    /// The credit exists but is not currently listed on the market.
    #[error("credit is not available on the market")]
    CreditUnavailable,

    /// Buying was attempted on a retired credit.
    #[error("credit has been retired")]
    CreditRetired,

    /// Retiring was attempted on an already-retired credit.
    #[error("credit is already retired")]
    CreditAlreadyRetired,

    /// The caller does not currently own the credit.
    #[error("entity is not the current owner of this credit")]
    NotOwner,

    /// The mint grant carried an unusable reduction figure.
    #[error("invalid mint grant: {0}")]
    InvalidGrant(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
