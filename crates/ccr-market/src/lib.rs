//! Market operations for the carbon credit registry.
//!
//! Two components, each the sole writer of its event kinds:
//! - [`MintingPipeline`] converts an approved reduction into MINT events,
//!   one freshly identified credit per whole kilogram.
//! - [`TradingEngine`] performs BUY and RETIRE as guarded check-then-append
//!   sequences, re-resolving ownership against a fresh ledger head and
//!   retrying on write conflicts.
//!
//! Neither component holds any state of its own; every precondition is a
//! replay over the ledger at call time.

pub mod error;
pub mod mint;
pub mod trade;

pub use error::MarketError;
pub use mint::{MintGrant, MintReceipt, MintingPipeline};
pub use trade::TradingEngine;
