/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The chain head moved between the caller's read and the append.
    /// Transient: safe to retry the whole check-then-append sequence with a
    /// fresh head.
    #[error("chain head moved: observed seq {observed}, current seq {current}")]
    ChainWriteConflict { observed: u64, current: u64 },

    /// Integrity replay found a mismatch. Fatal: further writes must halt
    /// and the chain surfaced for manual audit; never auto-repaired.
    #[error("chain corruption at seq {seq}: {reason}")]
    ChainCorruption { seq: u64, reason: String },

    /// An entry digest collided with an existing entry.
    #[error("hash collision detected")]
    HashCollision,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Returns `true` for transient errors the caller should retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChainWriteConflict { .. })
    }
}
