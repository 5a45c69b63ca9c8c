//! Verification scoring engines for the carbon credit registry.
//!
//! Every engine here is an instantiation of the same pipeline shape:
//! validate the submission, compute an expected value from trusted inputs,
//! expand it into a tolerance band, compare a reported value against the
//! band, map the deviation through an ordered threshold table into a bounded
//! risk score, and aggregate weighted signals into a trust verdict. The
//! shared primitives live in [`signal`]; the domain engines supply their own
//! coefficient tables on top of them:
//!
//! - [`electricity`] — consumption vs. grid-average estimate with auditor
//!   authentication
//! - [`discom`] — utility-bill continuity, meter consistency, and trend
//!   anomaly detection
//! - [`fuel`] — purchase-vs-usage cross-checks, generator efficiency
//!   benchmarks, and fuel-switch reduction credits
//! - [`travel`] — per-class flight estimation and travel-mode substitution
//!   credits
//! - [`report`] — whole-report emission estimation with a completeness score
//! - [`reduction`] — the priority-ordered reduction calculation that gates
//!   minting

pub mod discom;
pub mod electricity;
pub mod error;
pub mod fuel;
pub mod reduction;
pub mod report;
pub mod signal;
pub mod travel;

pub use error::VerifyError;
pub use signal::{
    deviation_percent, round2, RiskLevel, ThresholdTable, ToleranceBand, TrustAggregator,
    TrustLevel, TrustVerdict,
};
