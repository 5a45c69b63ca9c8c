use tracing::{debug, info};

use ccr_ledger::{AppendEvent, CreditState, LedgerEntry, LedgerReader, LedgerWriter, OwnershipResolver};
use ccr_types::{CreditId, EntityId, EventKind};

use crate::error::MarketError;

/// Bound on conflict retries before the error surfaces to the caller.
const MAX_RETRIES: u32 = 3;

/// Sole writer of TRADE and RETIRE events.
///
/// Both operations are check-then-append sequences: ownership is re-resolved
/// against a fresh ledger head immediately before every append attempt, the
/// append is guarded by that observed head, and a `ChainWriteConflict` sends
/// the whole sequence back around. Preconditions are never evaluated against
/// an earlier snapshot.
pub struct TradingEngine<'a, L> {
    ledger: &'a L,
}

impl<'a, L: LedgerReader + LedgerWriter> TradingEngine<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Buy a credit off the open market.
    pub fn buy(&self, credit_id: &CreditId, buyer: &EntityId) -> Result<LedgerEntry, MarketError> {
        let mut attempts = 0;
        loop {
            let head = self.ledger.head()?;
            let state = OwnershipResolver::credit_state(self.ledger, credit_id)?
                .ok_or(MarketError::CreditNotFound)?;

            match state {
                CreditState::Retired => return Err(MarketError::CreditRetired),
                CreditState::Owned(_) => return Err(MarketError::CreditUnavailable),
                CreditState::OnMarket => {}
            }

            let event = AppendEvent::new(
                EventKind::Trade,
                *credit_id,
                EntityId::market(),
                buyer.clone(),
            );
            match self.ledger.append_at_head(event, head) {
                Ok(entry) => {
                    info!(credit = %credit_id.short_id(), buyer = %buyer, "credit bought");
                    return Ok(entry);
                }
                Err(e) if e.is_retryable() && attempts < MAX_RETRIES => {
                    attempts += 1;
                    debug!(credit = %credit_id.short_id(), attempts, "buy retrying after head conflict");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Permanently retire a credit held by `holder`.
    pub fn retire(
        &self,
        credit_id: &CreditId,
        holder: &EntityId,
    ) -> Result<LedgerEntry, MarketError> {
        let mut attempts = 0;
        loop {
            let head = self.ledger.head()?;
            let state = OwnershipResolver::credit_state(self.ledger, credit_id)?
                .ok_or(MarketError::CreditNotFound)?;

            match state {
                CreditState::Retired => return Err(MarketError::CreditAlreadyRetired),
                CreditState::Owned(owner) if &owner == holder => {}
                CreditState::Owned(_) | CreditState::OnMarket => {
                    return Err(MarketError::NotOwner)
                }
            }

            let event = AppendEvent::new(
                EventKind::Retire,
                *credit_id,
                holder.clone(),
                EntityId::retired(),
            );
            match self.ledger.append_at_head(event, head) {
                Ok(entry) => {
                    info!(credit = %credit_id.short_id(), holder = %holder, "credit retired");
                    return Ok(entry);
                }
                Err(e) if e.is_retryable() && attempts < MAX_RETRIES => {
                    attempts += 1;
                    debug!(credit = %credit_id.short_id(), attempts, "retire retrying after head conflict");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
