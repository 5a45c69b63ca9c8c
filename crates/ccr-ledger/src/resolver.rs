use std::collections::{BTreeSet, HashMap};

use ccr_types::{CreditId, EntityId, EventKind};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Lifecycle state of a credit, derived from its latest ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreditState {
    /// Listed on the open market, available to buy.
    OnMarket,
    /// Held by a specific entity.
    Owned(EntityId),
    /// Permanently removed from circulation.
    Retired,
}

/// Replay-only ownership queries.
///
/// There is no mutable ownership table anywhere: a credit's custodian and
/// lifecycle state are a pure function of its entry subsequence ordered by
/// `sequence`. Correctness never depends on `timestamp`.
pub struct OwnershipResolver;

impl OwnershipResolver {
    /// The state of a credit, or `None` if it has no entries (does not exist).
    pub fn credit_state<R: LedgerReader>(
        reader: &R,
        credit_id: &CreditId,
    ) -> Result<Option<CreditState>, LedgerError> {
        let entries = reader.entries_for_credit(credit_id)?;
        Ok(entries.last().map(state_of))
    }

    /// The current custodian: the `to_entity` of the latest entry.
    pub fn current_owner<R: LedgerReader>(
        reader: &R,
        credit_id: &CreditId,
    ) -> Result<Option<EntityId>, LedgerError> {
        let entries = reader.entries_for_credit(credit_id)?;
        Ok(entries.last().map(|e| e.to_entity.clone()))
    }

    /// Whether the credit's latest event is a RETIRE.
    pub fn is_retired<R: LedgerReader>(
        reader: &R,
        credit_id: &CreditId,
    ) -> Result<bool, LedgerError> {
        let entries = reader.entries_for_credit(credit_id)?;
        Ok(entries
            .last()
            .map(|e| e.kind == EventKind::Retire)
            .unwrap_or(false))
    }

    /// Credits whose latest entry transfers to `entity` and is not a RETIRE.
    pub fn credits_owned_by<R: LedgerReader>(
        reader: &R,
        entity: &EntityId,
    ) -> Result<BTreeSet<CreditId>, LedgerError> {
        Ok(latest_per_credit(reader)?
            .into_iter()
            .filter(|(_, e)| e.kind != EventKind::Retire && &e.to_entity == entity)
            .map(|(credit, _)| credit)
            .collect())
    }

    /// Credits whose latest entry is a RETIRE issued by `entity`.
    pub fn credits_retired_by<R: LedgerReader>(
        reader: &R,
        entity: &EntityId,
    ) -> Result<BTreeSet<CreditId>, LedgerError> {
        Ok(latest_per_credit(reader)?
            .into_iter()
            .filter(|(_, e)| e.kind == EventKind::Retire && &e.from_entity == entity)
            .map(|(credit, _)| credit)
            .collect())
    }

    /// Full audit trail for one credit, in sequence order.
    pub fn history<R: LedgerReader>(
        reader: &R,
        credit_id: &CreditId,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        reader.entries_for_credit(credit_id)
    }
}

fn state_of(entry: &LedgerEntry) -> CreditState {
    if entry.kind == EventKind::Retire {
        CreditState::Retired
    } else if entry.to_entity.is_market() {
        CreditState::OnMarket
    } else {
        CreditState::Owned(entry.to_entity.clone())
    }
}

fn latest_per_credit<R: LedgerReader>(
    reader: &R,
) -> Result<HashMap<CreditId, LedgerEntry>, LedgerError> {
    let mut latest = HashMap::new();
    // read_all is sequence-ordered, so the last insert per credit wins.
    for entry in reader.read_all()? {
        latest.insert(entry.credit_id, entry);
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AppendEvent;
    use crate::memory::InMemoryLedger;
    use crate::traits::LedgerWriter;

    fn mint(ledger: &InMemoryLedger, owner: &str) -> CreditId {
        let credit = CreditId::new();
        ledger
            .append(AppendEvent::new(
                EventKind::Mint,
                credit,
                EntityId::new(owner),
                EntityId::market(),
            ))
            .unwrap();
        credit
    }

    fn trade(ledger: &InMemoryLedger, credit: CreditId, from: EntityId, to: &str) {
        ledger
            .append(AppendEvent::new(
                EventKind::Trade,
                credit,
                from,
                EntityId::new(to),
            ))
            .unwrap();
    }

    fn retire(ledger: &InMemoryLedger, credit: CreditId, holder: &str) {
        ledger
            .append(AppendEvent::new(
                EventKind::Retire,
                credit,
                EntityId::new(holder),
                EntityId::retired(),
            ))
            .unwrap();
    }

    #[test]
    fn unknown_credit_has_no_state() {
        let ledger = InMemoryLedger::new();
        let credit = CreditId::new();
        assert_eq!(
            OwnershipResolver::credit_state(&ledger, &credit).unwrap(),
            None
        );
        assert_eq!(
            OwnershipResolver::current_owner(&ledger, &credit).unwrap(),
            None
        );
        assert!(!OwnershipResolver::is_retired(&ledger, &credit).unwrap());
    }

    #[test]
    fn owner_follows_the_latest_event() {
        let ledger = InMemoryLedger::new();
        let credit = mint(&ledger, "producer-1");

        assert_eq!(
            OwnershipResolver::credit_state(&ledger, &credit).unwrap(),
            Some(CreditState::OnMarket)
        );

        trade(&ledger, credit, EntityId::market(), "org-a");
        assert_eq!(
            OwnershipResolver::current_owner(&ledger, &credit).unwrap(),
            Some(EntityId::new("org-a"))
        );
        assert_eq!(
            OwnershipResolver::credit_state(&ledger, &credit).unwrap(),
            Some(CreditState::Owned(EntityId::new("org-a")))
        );

        retire(&ledger, credit, "org-a");
        assert_eq!(
            OwnershipResolver::credit_state(&ledger, &credit).unwrap(),
            Some(CreditState::Retired)
        );
        assert!(OwnershipResolver::is_retired(&ledger, &credit).unwrap());
        // Latest to_entity is the retirement sink.
        assert_eq!(
            OwnershipResolver::current_owner(&ledger, &credit).unwrap(),
            Some(EntityId::retired())
        );
    }

    #[test]
    fn portfolio_queries_track_latest_state() {
        let ledger = InMemoryLedger::new();
        let held = mint(&ledger, "producer-1");
        let retired = mint(&ledger, "producer-1");
        let still_on_market = mint(&ledger, "producer-1");

        trade(&ledger, held, EntityId::market(), "org-a");
        trade(&ledger, retired, EntityId::market(), "org-a");
        retire(&ledger, retired, "org-a");

        let owned = OwnershipResolver::credits_owned_by(&ledger, &EntityId::new("org-a")).unwrap();
        assert_eq!(owned, BTreeSet::from([held]));

        let retired_set =
            OwnershipResolver::credits_retired_by(&ledger, &EntityId::new("org-a")).unwrap();
        assert_eq!(retired_set, BTreeSet::from([retired]));

        let market = OwnershipResolver::credits_owned_by(&ledger, &EntityId::market()).unwrap();
        assert_eq!(market, BTreeSet::from([still_on_market]));
    }

    #[test]
    fn resolution_ignores_timestamps() {
        let ledger = InMemoryLedger::new();
        let credit = mint(&ledger, "producer-1");
        trade(&ledger, credit, EntityId::market(), "org-a");

        // Skew the clock on the earlier entry so timestamp order disagrees
        // with sequence order.
        let mut exported = ledger.entries().unwrap();
        let later = exported[1].timestamp + chrono::Duration::hours(6);
        exported[0].timestamp = later;

        // Timestamps are outside the digest, so the chain still verifies,
        // and resolution still follows sequence order.
        let skewed = InMemoryLedger::from_entries(exported).unwrap();
        assert_eq!(
            OwnershipResolver::current_owner(&skewed, &credit).unwrap(),
            Some(EntityId::new("org-a"))
        );
    }

    #[test]
    fn history_returns_the_full_trail() {
        let ledger = InMemoryLedger::new();
        let credit = mint(&ledger, "producer-1");
        trade(&ledger, credit, EntityId::market(), "org-a");
        retire(&ledger, credit, "org-a");

        let history = OwnershipResolver::history(&ledger, &credit).unwrap();
        let kinds: Vec<EventKind> = history.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Mint, EventKind::Trade, EventKind::Retire]
        );
    }
}
