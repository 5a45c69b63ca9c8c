use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use ccr_crypto::{ContentHasher, HashChainVerifier, GENESIS};
use ccr_types::CreditId;

use crate::entry::{AppendEvent, HeadRef, LedgerEntry};
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger implementation.
///
/// The write lock serializes "read head, compute digest, insert" so the
/// chain has a single global append order and no two entries can claim the
/// same sequence. [`LedgerWriter::append_at_head`] additionally rejects
/// appends whose caller observed a head that has since moved, which is what
/// makes check-then-append sequences safe to retry.
#[derive(Debug)]
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default, Debug)]
struct LedgerState {
    entries: Vec<LedgerEntry>,
    hash_index: HashMap<String, usize>,
    credit_index: HashMap<CreditId, Vec<usize>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Restore a ledger from an exported entry sequence.
    ///
    /// The chain is verified before any entry is accepted, so a tampered
    /// export fails with `ChainCorruption` at the first bad sequence.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        HashChainVerifier::verify_chain(&ContentHasher::LEDGER_ENTRY, &entries)
            .map_err(corruption)?;

        let mut state = LedgerState::default();
        for (index, entry) in entries.iter().enumerate() {
            if state.hash_index.insert(entry.hash.clone(), index).is_some() {
                return Err(LedgerError::HashCollision);
            }
            state
                .credit_index
                .entry(entry.credit_id)
                .or_default()
                .push(index);
        }
        state.entries = entries;

        Ok(Self {
            inner: RwLock::new(state),
        })
    }

    /// Export every entry in sequence order, e.g. for persistence.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.read_state()?.entries.clone())
    }

    /// Replay the full chain, recomputing every digest and link.
    ///
    /// Returns the entry count on success, or `ChainCorruption` carrying the
    /// first mismatching sequence. Takes only the read lock, so writers are
    /// never halted for long.
    pub fn verify_integrity(&self) -> Result<u64, LedgerError> {
        let state = self.read_state()?;
        HashChainVerifier::verify_chain(&ContentHasher::LEDGER_ENTRY, &state.entries)
            .map_err(corruption)?;
        Ok(state.entries.len() as u64)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn insert_entry(
        state: &mut LedgerState,
        event: AppendEvent,
    ) -> Result<LedgerEntry, LedgerError> {
        let sequence = (state.entries.len() + 1) as u64;
        let prev_hash = state
            .entries
            .last()
            .map(|e| e.hash.clone())
            .unwrap_or_else(|| GENESIS.to_string());

        let metadata_json = serde_json::to_string(&event.metadata)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let credit = event.credit_id.to_string();
        let hash = ContentHasher::LEDGER_ENTRY.hash_fields(&[
            event.kind.as_str(),
            &credit,
            event.from_entity.as_str(),
            event.to_entity.as_str(),
            &metadata_json,
            &prev_hash,
        ]);

        if state.hash_index.contains_key(&hash) {
            return Err(LedgerError::HashCollision);
        }

        let entry = LedgerEntry {
            sequence,
            credit_id: event.credit_id,
            kind: event.kind,
            from_entity: event.from_entity,
            to_entity: event.to_entity,
            metadata: event.metadata,
            timestamp: Utc::now(),
            prev_hash,
            hash: hash.clone(),
        };

        let index = state.entries.len();
        state.hash_index.insert(hash, index);
        state
            .credit_index
            .entry(entry.credit_id)
            .or_default()
            .push(index);
        state.entries.push(entry.clone());

        debug!(
            seq = sequence,
            kind = %entry.kind,
            credit = %entry.credit_id.short_id(),
            "ledger append"
        );

        Ok(entry)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append(&self, event: AppendEvent) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.write_state()?;
        Self::insert_entry(&mut state, event)
    }

    fn append_at_head(
        &self,
        event: AppendEvent,
        observed: Option<HeadRef>,
    ) -> Result<LedgerEntry, LedgerError> {
        let mut state = self.write_state()?;

        let current = state.entries.last();
        let head_matches = match (&observed, current) {
            (None, None) => true,
            (Some(head), Some(entry)) => {
                head.sequence == entry.sequence && head.hash == entry.hash
            }
            _ => false,
        };

        if !head_matches {
            return Err(LedgerError::ChainWriteConflict {
                observed: observed.map(|h| h.sequence).unwrap_or(0),
                current: current.map(|e| e.sequence).unwrap_or(0),
            });
        }

        Self::insert_entry(&mut state, event)
    }
}

impl LedgerReader for InMemoryLedger {
    fn head(&self) -> Result<Option<HeadRef>, LedgerError> {
        Ok(self.read_state()?.entries.last().map(LedgerEntry::head_ref))
    }

    fn read_all(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.read_state()?.entries.clone())
    }

    fn entries_for_credit(&self, credit_id: &CreditId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .credit_index
            .get(credit_id)
            .map(|indexes| indexes.iter().map(|&i| state.entries[i].clone()).collect())
            .unwrap_or_default())
    }

    fn get_by_hash(&self, hash: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .hash_index
            .get(hash)
            .map(|&index| state.entries[index].clone()))
    }

    fn entry_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.entries.len() as u64)
    }
}

fn corruption(err: ccr_crypto::ChainError) -> LedgerError {
    LedgerError::ChainCorruption {
        seq: err.sequence(),
        reason: err.to_string(),
    }
}
