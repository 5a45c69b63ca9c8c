use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a credit custodian.
///
/// An entity is usually a user or organization id supplied by the request
/// layer. Two sentinel values are part of the ledger vocabulary:
/// [`EntityId::MARKET`] holds freshly minted and re-listed credits, and
/// [`EntityId::RETIRED`] is the terminal sink a retired credit transfers to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Open-market sentinel.
pub const MARKET: &str = "MARKET";

/// Retirement-sink sentinel.
pub const RETIRED: &str = "RETIRED";

impl EntityId {
    /// The open-market sentinel entity.
    pub fn market() -> Self {
        Self(MARKET.to_string())
    }

    /// The retirement-sink sentinel entity.
    pub fn retired() -> Self {
        Self(RETIRED.to_string())
    }

    /// Create an entity id from an opaque string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the open-market sentinel.
    pub fn is_market(&self) -> bool {
        self.0 == MARKET
    }

    /// Returns `true` for the retirement-sink sentinel.
    pub fn is_retired_sink(&self) -> bool {
        self.0 == RETIRED
    }

    /// Returns `true` for either sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.is_market() || self.is_retired_sink()
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
