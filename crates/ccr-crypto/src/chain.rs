use crate::hasher::ContentHasher;

/// Sentinel `prev_hash` of the first entry ever written to a chain.
pub const GENESIS: &str = "GENESIS";

/// Trait for records that participate in a hash chain.
pub trait ChainedRecord {
    /// Canonical position in the chain (assigned order, 1-based).
    fn sequence(&self) -> u64;
    /// The record's own digest (64 lowercase hex chars).
    fn entry_hash(&self) -> &str;
    /// The predecessor's digest, or [`GENESIS`] for the first record.
    fn prev_hash(&self) -> &str;
    /// The fixed-order digest fields, excluding `prev_hash`.
    fn digest_fields(&self) -> Vec<String>;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of records forms a valid chain: sequences are
/// consecutive, each record's `prev_hash` matches its predecessor's digest
/// (the first record linking to [`GENESIS`]), and each digest is correctly
/// recomputed from the record's own fields.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain of records, returning the first violation found.
    pub fn verify_chain<R: ChainedRecord>(
        hasher: &ContentHasher,
        records: &[R],
    ) -> Result<(), ChainError> {
        let mut expected_prev = GENESIS.to_string();
        let mut expected_seq = 1u64;

        for record in records {
            let seq = record.sequence();
            if seq != expected_seq {
                return Err(ChainError::SequenceGap {
                    seq,
                    expected: expected_seq,
                });
            }

            if record.prev_hash() != expected_prev {
                return Err(ChainError::BrokenLink { seq });
            }

            let mut fields = record.digest_fields();
            fields.push(record.prev_hash().to_string());
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            if !hasher.verify_fields(&refs, record.entry_hash()) {
                return Err(ChainError::HashMismatch { seq });
            }

            expected_prev = record.entry_hash().to_string();
            expected_seq += 1;
        }

        Ok(())
    }
}

/// Errors from chain verification, carrying the first offending sequence.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("sequence gap at {seq}: expected {expected}")]
    SequenceGap { seq: u64, expected: u64 },

    #[error("broken link at seq {seq}: prev_hash does not match predecessor")]
    BrokenLink { seq: u64 },

    #[error("hash mismatch at seq {seq}: recomputed digest differs from stored")]
    HashMismatch { seq: u64 },
}

impl ChainError {
    /// The sequence number of the first violating record.
    pub fn sequence(&self) -> u64 {
        match self {
            Self::SequenceGap { seq, .. }
            | Self::BrokenLink { seq }
            | Self::HashMismatch { seq } => *seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASHER: ContentHasher = ContentHasher::new("ccr-chain-test-v1");

    struct TestRecord {
        seq: u64,
        hash: String,
        prev: String,
        payload: String,
    }

    impl ChainedRecord for TestRecord {
        fn sequence(&self) -> u64 {
            self.seq
        }
        fn entry_hash(&self) -> &str {
            &self.hash
        }
        fn prev_hash(&self) -> &str {
            &self.prev
        }
        fn digest_fields(&self) -> Vec<String> {
            vec![self.payload.clone()]
        }
    }

    fn build_chain(count: usize) -> Vec<TestRecord> {
        let mut chain = Vec::new();
        let mut prev = GENESIS.to_string();

        for i in 0..count {
            let payload = format!("record-{i}");
            let hash = HASHER.hash_fields(&[&payload, &prev]);
            chain.push(TestRecord {
                seq: (i + 1) as u64,
                hash: hash.clone(),
                prev: prev.clone(),
                payload,
            });
            prev = hash;
        }

        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        let chain: Vec<TestRecord> = vec![];
        assert!(HashChainVerifier::verify_chain(&HASHER, &chain).is_ok());
    }

    #[test]
    fn multi_record_chain_is_valid() {
        let chain = build_chain(10);
        assert!(HashChainVerifier::verify_chain(&HASHER, &chain).is_ok());
    }

    #[test]
    fn first_record_must_link_to_genesis() {
        let mut chain = build_chain(2);
        chain[0].prev = "0".repeat(64);
        let err = HashChainVerifier::verify_chain(&HASHER, &chain).unwrap_err();
        assert_eq!(err, ChainError::BrokenLink { seq: 1 });
    }

    #[test]
    fn broken_link_detected() {
        let mut chain = build_chain(3);
        chain[2].prev = "9".repeat(64);
        let err = HashChainVerifier::verify_chain(&HASHER, &chain).unwrap_err();
        assert_eq!(err, ChainError::BrokenLink { seq: 3 });
        assert_eq!(err.sequence(), 3);
    }

    #[test]
    fn tampered_payload_detected() {
        let mut chain = build_chain(3);
        chain[1].payload = "tampered".into();
        let err = HashChainVerifier::verify_chain(&HASHER, &chain).unwrap_err();
        assert_eq!(err, ChainError::HashMismatch { seq: 2 });
    }

    #[test]
    fn sequence_gap_detected() {
        let mut chain = build_chain(3);
        chain[2].seq = 5;
        let err = HashChainVerifier::verify_chain(&HASHER, &chain).unwrap_err();
        assert_eq!(err, ChainError::SequenceGap { seq: 5, expected: 3 });
    }
}
