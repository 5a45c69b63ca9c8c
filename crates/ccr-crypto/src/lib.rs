//! Hashing primitives for the carbon credit registry.
//!
//! Provides the domain-separated BLAKE3 digest used for ledger entries
//! (rendered as 64 lowercase hex characters), the `GENESIS` chain sentinel,
//! and a generic hash-chain verifier usable over any chained record type.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainedRecord, HashChainVerifier, GENESIS};
pub use hasher::{ContentHasher, HasherError};
