//! Append-only credit ledger for the carbon credit registry (CCR).
//!
//! This crate is the heart of CCR. It provides:
//! - The immutable hash-linked [`LedgerEntry`] record
//! - [`LedgerWriter`] / [`LedgerReader`] trait boundaries
//! - [`InMemoryLedger`]: RwLock-guarded, globally sequenced, with optimistic
//!   expected-head appends for check-then-append callers
//! - Fail-fast integrity verification and a full-scan chain audit
//! - [`OwnershipResolver`]: credit state derived purely by replay
//!
//! The ledger is the single source of truth for credit existence and
//! ownership. No mutable ownership table exists anywhere; every query is a
//! replay over `sequence` order.

pub mod entry;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod traits;
pub mod verify;

pub use entry::{AppendEvent, HeadRef, LedgerEntry};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use resolver::{CreditState, OwnershipResolver};
pub use traits::{LedgerReader, LedgerWriter};
pub use verify::{ChainAuditor, IntegrityReport, Violation, ViolationKind};
