use serde::{Deserialize, Serialize};
use tracing::info;

use ccr_ledger::{AppendEvent, LedgerWriter};
use ccr_types::{CreditId, EntityId, EventKind, Metadata};

use crate::error::MarketError;

/// An approved reduction calculation, ready to be minted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintGrant {
    /// Originating project, recorded in each credit's metadata.
    pub project_id: String,
    /// Entity the credits are issued on behalf of.
    pub project_owner: EntityId,
    /// Verified reduction in kg CO2; truncated to whole units.
    pub reduction_kg: f64,
}

/// Result of a mint run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Units actually minted in this run.
    pub minted: u64,
    /// Whole units left unminted when a batch limit applied.
    pub remaining: u64,
    pub credit_ids: Vec<CreditId>,
}

/// Sole writer of MINT events.
///
/// One ledger entry is appended per whole kilogram of verified reduction,
/// each with a fresh credit id, issued straight onto the open market. The
/// one-unit-per-kg design trades ledger-write volume for trivial per-unit
/// tradeability, so large reductions produce proportionally many entries.
pub struct MintingPipeline<'a, L> {
    ledger: &'a L,
}

impl<'a, L: LedgerWriter> MintingPipeline<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Mint every whole unit of the grant.
    pub fn mint(&self, grant: &MintGrant) -> Result<MintReceipt, MarketError> {
        self.mint_batch(grant, None)
    }

    /// Mint at most `limit` units of the grant.
    ///
    /// Each MINT entry is independently valid once written: a failure or
    /// cancellation mid-batch leaves already-appended entries standing, and
    /// the receipt reports the remainder instead of silently dropping it.
    pub fn mint_batch(
        &self,
        grant: &MintGrant,
        limit: Option<u64>,
    ) -> Result<MintReceipt, MarketError> {
        if !grant.reduction_kg.is_finite() || grant.reduction_kg < 0.0 {
            return Err(MarketError::InvalidGrant(format!(
                "reduction must be a non-negative number, got {}",
                grant.reduction_kg
            )));
        }

        let units = grant.reduction_kg.trunc() as u64;
        let to_mint = limit.map_or(units, |l| units.min(l));

        let mut credit_ids = Vec::with_capacity(to_mint as usize);
        for _ in 0..to_mint {
            let credit_id = CreditId::new();
            let mut metadata = Metadata::new();
            metadata.insert(
                "project_id".into(),
                serde_json::Value::from(grant.project_id.clone()),
            );

            self.ledger.append(
                AppendEvent::new(
                    EventKind::Mint,
                    credit_id,
                    grant.project_owner.clone(),
                    EntityId::market(),
                )
                .with_metadata(metadata),
            )?;
            credit_ids.push(credit_id);
        }

        let minted = credit_ids.len() as u64;
        if minted > 0 {
            info!(
                project = %grant.project_id,
                minted,
                remaining = units - minted,
                "credits minted to market"
            );
        }

        Ok(MintReceipt {
            minted,
            remaining: units - minted,
            credit_ids,
        })
    }
}
