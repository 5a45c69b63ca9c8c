use std::fmt;

use serde::{Deserialize, Serialize};

/// Risk classification of a single comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Coarse trust bucket derived from an aggregated risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    High,
    Medium,
    Low,
}

impl TrustLevel {
    /// Fixed breakpoints over the capped 0–100 risk score.
    pub fn from_risk(risk_score: u32) -> Self {
        if risk_score <= 20 {
            Self::High
        } else if risk_score <= 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

/// Inclusive band around an expected value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub lower: f64,
    pub upper: f64,
}

impl ToleranceBand {
    /// Expand `expected` by a fractional tolerance on both sides.
    pub fn around(expected: f64, fraction: f64) -> Self {
        Self {
            lower: round2(expected * (1.0 - fraction)),
            upper: round2(expected * (1.0 + fraction)),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Signed percent deviation of an actual value from an expected value.
pub fn deviation_percent(expected: f64, actual: f64) -> f64 {
    round2((actual - expected) / expected * 100.0)
}

/// Round to two decimal places, the precision every engine reports in.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ordered cut points mapping an absolute deviation (or period-over-period
/// change) to a bounded score. Cut points must be ascending; the first
/// matching `value <= cut` wins, and values beyond the last cut score the
/// default. The mapping is monotonic by construction.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdTable {
    cuts: &'static [(f64, u32)],
    default: u32,
}

impl ThresholdTable {
    pub const fn new(cuts: &'static [(f64, u32)], default: u32) -> Self {
        Self { cuts, default }
    }

    pub fn score(&self, abs_value: f64) -> u32 {
        for (cut, score) in self.cuts {
            if abs_value <= *cut {
                return *score;
            }
        }
        self.default
    }
}

/// Aggregates weighted signal contributions into a single trust verdict.
///
/// Risk points are summed and capped at 100; the trust score is the capped
/// complement; reasons are collected per contributing signal.
#[derive(Default)]
pub struct TrustAggregator {
    risk_points: u32,
    reasons: Vec<String>,
}

impl TrustAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contributing signal with a human-readable reason.
    pub fn add(&mut self, risk_points: u32, reason: impl Into<String>) {
        self.risk_points += risk_points;
        self.reasons.push(reason.into());
    }

    /// Add risk points without a reason line.
    pub fn add_silent(&mut self, risk_points: u32) {
        self.risk_points += risk_points;
    }

    pub fn finish(self) -> TrustVerdict {
        let risk_score = self.risk_points.min(100);
        TrustVerdict {
            risk_score,
            trust_score: 100 - risk_score,
            trust_level: TrustLevel::from_risk(risk_score),
            reasons: self.reasons,
        }
    }
}

/// Aggregated trust verdict over all contributing signals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustVerdict {
    pub risk_score: u32,
    pub trust_score: u32,
    pub trust_level: TrustLevel,
    pub reasons: Vec<String>,
}
