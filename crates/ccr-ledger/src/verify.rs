use std::collections::HashSet;

use ccr_crypto::{ChainedRecord, ContentHasher, GENESIS};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of a full-scan chain audit.
///
/// Unlike the fail-fast `verify_integrity`, the auditor walks the whole
/// chain and collects every violation, for manual audit workflows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrityReport {
    pub entry_count: u64,
    pub hash_chain_valid: bool,
    pub sequence_monotonic: bool,
    pub hashes_unique: bool,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during the audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    ChainBreak,
    HashMismatch,
    DuplicateHash,
}

/// Full-chain integrity auditor.
pub struct ChainAuditor;

impl ChainAuditor {
    pub fn audit<R: LedgerReader>(reader: &R) -> Result<IntegrityReport, LedgerError> {
        let entries = reader.read_all()?;
        let mut violations = Vec::new();
        let mut hash_chain_valid = true;
        let mut sequence_monotonic = true;
        let mut hashes_unique = true;
        let mut seen_hashes = HashSet::new();

        for (index, entry) in entries.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if entry.sequence != expected_seq {
                sequence_monotonic = false;
                violations.push(Violation {
                    seq: entry.sequence,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected seq {expected_seq}, got {}", entry.sequence),
                });
            }

            let expected_prev = if index == 0 {
                GENESIS
            } else {
                entries[index - 1].hash.as_str()
            };
            if entry.prev_hash != expected_prev {
                hash_chain_valid = false;
                violations.push(Violation {
                    seq: entry.sequence,
                    kind: ViolationKind::ChainBreak,
                    description: "previous hash link mismatch".into(),
                });
            }

            let mut fields = entry.digest_fields();
            fields.push(entry.prev_hash.clone());
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            if !ContentHasher::LEDGER_ENTRY.verify_fields(&refs, &entry.hash) {
                hash_chain_valid = false;
                violations.push(Violation {
                    seq: entry.sequence,
                    kind: ViolationKind::HashMismatch,
                    description: "entry hash does not match recomputed digest".into(),
                });
            }

            if !seen_hashes.insert(entry.hash.clone()) {
                hashes_unique = false;
                violations.push(Violation {
                    seq: entry.sequence,
                    kind: ViolationKind::DuplicateHash,
                    description: "entry hash already present in chain".into(),
                });
            }
        }

        Ok(IntegrityReport {
            entry_count: entries.len() as u64,
            hash_chain_valid,
            sequence_monotonic,
            hashes_unique,
            violations,
        })
    }
}
