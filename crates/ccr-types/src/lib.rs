//! Foundation types for the carbon credit registry (CCR).
//!
//! This crate provides the identity and event types used throughout the
//! registry. Every other CCR crate depends on `ccr-types`.
//!
//! # Key Types
//!
//! - [`CreditId`] — Unique identifier of one tradeable credit unit (UUID v4)
//! - [`EntityId`] — Opaque custodian identifier with the `MARKET` and
//!   `RETIRED` sentinels
//! - [`EventKind`] — Lifecycle event discriminant: `MINT`, `TRADE`, `RETIRE`
//! - [`Metadata`] — Opaque key-value payload attached to ledger events

pub mod credit;
pub mod entity;
pub mod error;
pub mod event;

pub use credit::CreditId;
pub use entity::EntityId;
pub use error::TypeError;
pub use event::{EventKind, Metadata};
