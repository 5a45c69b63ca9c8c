use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ccr_crypto::ChainedRecord;
use ccr_types::{CreditId, EntityId, EventKind, Metadata};

/// One immutable record of a credit lifecycle event.
///
/// Entries are created once by the ledger and never updated or deleted.
/// `sequence` is the canonical ordering authority; `timestamp` is
/// informational only and carries no ordering semantics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Monotonic insertion order assigned by the ledger (1-based).
    pub sequence: u64,
    /// The credit unit this event concerns.
    pub credit_id: CreditId,
    /// Lifecycle event discriminant.
    pub kind: EventKind,
    /// Custodian the credit moves from.
    pub from_entity: EntityId,
    /// Custodian the credit moves to.
    pub to_entity: EntityId,
    /// Opaque payload, not interpreted by the ledger.
    pub metadata: Metadata,
    /// Wall-clock creation time, informational only.
    pub timestamp: DateTime<Utc>,
    /// Digest of the predecessor entry, or `GENESIS` for the first entry.
    pub prev_hash: String,
    /// Digest over the fixed field order plus `prev_hash`; globally unique.
    pub hash: String,
}

impl LedgerEntry {
    /// Canonical JSON rendering of the metadata, as digested.
    ///
    /// `Metadata` is a string-keyed `BTreeMap` of JSON values, so this
    /// serialization cannot fail and is deterministic.
    pub fn metadata_json(&self) -> String {
        serde_json::to_string(&self.metadata).unwrap_or_default()
    }

    /// The head reference this entry represents once appended.
    pub fn head_ref(&self) -> HeadRef {
        HeadRef {
            sequence: self.sequence,
            hash: self.hash.clone(),
        }
    }
}

impl ChainedRecord for LedgerEntry {
    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn entry_hash(&self) -> &str {
        &self.hash
    }

    fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    fn digest_fields(&self) -> Vec<String> {
        vec![
            self.kind.as_str().to_string(),
            self.credit_id.to_string(),
            self.from_entity.to_string(),
            self.to_entity.to_string(),
            self.metadata_json(),
        ]
    }
}

/// Chain head observed at a point in time.
///
/// Check-then-append callers capture this during their precondition reads and
/// hand it back to [`crate::LedgerWriter::append_at_head`], which rejects the
/// append with `ChainWriteConflict` if the head has since moved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRef {
    pub sequence: u64,
    pub hash: String,
}

/// Caller-supplied part of a ledger append.
///
/// `sequence`, `timestamp`, `prev_hash`, and `hash` are assigned by the
/// ledger at insertion time.
#[derive(Clone, Debug)]
pub struct AppendEvent {
    pub kind: EventKind,
    pub credit_id: CreditId,
    pub from_entity: EntityId,
    pub to_entity: EntityId,
    pub metadata: Metadata,
}

impl AppendEvent {
    /// Convenience constructor for events without metadata.
    pub fn new(
        kind: EventKind,
        credit_id: CreditId,
        from_entity: EntityId,
        to_entity: EntityId,
    ) -> Self {
        Self {
            kind,
            credit_id,
            from_entity,
            to_entity,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata payload.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccr_crypto::GENESIS;

    fn entry(kind: EventKind) -> LedgerEntry {
        LedgerEntry {
            sequence: 1,
            credit_id: CreditId::new(),
            kind,
            from_entity: EntityId::new("project-owner"),
            to_entity: EntityId::market(),
            metadata: Metadata::new(),
            timestamp: Utc::now(),
            prev_hash: GENESIS.to_string(),
            hash: String::new(),
        }
    }

    #[test]
    fn digest_fields_are_fixed_order() {
        let e = entry(EventKind::Mint);
        let fields = e.digest_fields();
        assert_eq!(fields[0], "MINT");
        assert_eq!(fields[1], e.credit_id.to_string());
        assert_eq!(fields[2], "project-owner");
        assert_eq!(fields[3], "MARKET");
        assert_eq!(fields[4], "{}");
    }

    #[test]
    fn metadata_json_is_deterministic() {
        let mut e = entry(EventKind::Mint);
        e.metadata.insert("project_id".into(), serde_json::Value::from(12));
        e.metadata.insert("batch".into(), serde_json::Value::from("a"));
        assert_eq!(e.metadata_json(), "{\"batch\":\"a\",\"project_id\":12}");
    }

    #[test]
    fn serde_roundtrip() {
        let e = entry(EventKind::Retire);
        let json = serde_json::to_string(&e).unwrap();
        let parsed: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(e, parsed);
    }
}
