use ccr_types::CreditId;

use crate::entry::{AppendEvent, HeadRef, LedgerEntry};
use crate::error::LedgerError;

/// Write boundary for ledger append operations.
///
/// Appending is the only mutation the ledger exposes; no update or delete
/// verb exists anywhere on this surface.
pub trait LedgerWriter: Send + Sync {
    /// Append an event at whatever the current head is.
    fn append(&self, event: AppendEvent) -> Result<LedgerEntry, LedgerError>;

    /// Append an event only if the chain head still matches `observed`
    /// (`None` meaning the caller observed an empty chain). Fails with
    /// `ChainWriteConflict` otherwise, so check-then-append sequences can
    /// retry against a fresh snapshot.
    fn append_at_head(
        &self,
        event: AppendEvent,
        observed: Option<HeadRef>,
    ) -> Result<LedgerEntry, LedgerError>;
}

/// Read boundary for ledger query/replay operations.
pub trait LedgerReader: Send + Sync {
    /// The entry with the highest sequence, if any.
    fn head(&self) -> Result<Option<HeadRef>, LedgerError>;

    /// Every entry in sequence order.
    fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// The entries for one credit, in sequence order.
    fn entries_for_credit(&self, credit_id: &CreditId) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Look up an entry by its digest.
    fn get_by_hash(&self, hash: &str) -> Result<Option<LedgerEntry>, LedgerError>;

    /// Total number of entries.
    fn entry_count(&self) -> Result<u64, LedgerError>;
}
