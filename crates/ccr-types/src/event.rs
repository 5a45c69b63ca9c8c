use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque key-value payload attached to a ledger event.
///
/// Not interpreted by the ledger itself. A `BTreeMap` keeps serialization
/// deterministic, which the entry digest depends on.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Kind of credit lifecycle event recorded in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// Credit creation onto the open market.
    Mint,
    /// Custody transfer between entities.
    Trade,
    /// Permanent removal from circulation.
    Retire,
}

impl EventKind {
    /// Wire form used in the entry digest (`MINT`, `TRADE`, `RETIRE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mint => "MINT",
            Self::Trade => "TRADE",
            Self::Retire => "RETIRE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
