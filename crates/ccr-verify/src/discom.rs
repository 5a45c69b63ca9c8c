use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VerifyError;
use crate::signal::{deviation_percent, round2, RiskLevel, TrustAggregator, TrustVerdict};

/// One utility bill as issued by a distribution company.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscomBill {
    pub meter_number: String,
    pub billing_period_start: NaiveDate,
    pub billing_period_end: NaiveDate,
    pub kwh_billed: f64,
    pub discom_name: String,
    pub invoice_id: String,
}

/// Structural and sanity validation of a single bill.
pub fn validate_bill(bill: &DiscomBill) -> Result<(), VerifyError> {
    if bill.meter_number.trim().is_empty() {
        return Err(VerifyError::field("meter_number", "must not be empty"));
    }
    if bill.invoice_id.trim().is_empty() {
        return Err(VerifyError::field("invoice_id", "must not be empty"));
    }
    if bill.discom_name.trim().is_empty() {
        return Err(VerifyError::field("discom_name", "must not be empty"));
    }
    if !(bill.kwh_billed.is_finite() && bill.kwh_billed > 0.0) {
        return Err(VerifyError::field("kwh_billed", "must be greater than zero"));
    }
    if bill.billing_period_start >= bill.billing_period_end {
        return Err(VerifyError::field(
            "billing_period_start",
            "billing period must start before it ends",
        ));
    }
    Ok(())
}

/// Outcome of the meter-consistency and period-continuity check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContinuityOutcome {
    /// Fewer than 2 bills: nothing to compare.
    InsufficientData,
    /// Meter number consistent and billing periods continuous.
    Continuous,
    IssuesDetected { issues: Vec<ContinuityIssue> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContinuityIssue {
    MeterMismatch {
        expected: String,
        found: String,
        invoice_id: String,
    },
    BillingGap {
        previous_invoice: String,
        current_invoice: String,
        expected_start: NaiveDate,
        found_start: NaiveDate,
    },
}

/// Check meter consistency and billing continuity across bills.
///
/// Bills are ordered by period start; the meter number of every bill must
/// match the first, and each period must start exactly one day after the
/// previous period ends.
pub fn check_continuity(bills: &[DiscomBill]) -> Result<ContinuityOutcome, VerifyError> {
    for bill in bills {
        validate_bill(bill)?;
    }
    if bills.len() < 2 {
        return Ok(ContinuityOutcome::InsufficientData);
    }

    let mut sorted: Vec<&DiscomBill> = bills.iter().collect();
    sorted.sort_by_key(|b| b.billing_period_start);

    let base_meter = &sorted[0].meter_number;
    let mut issues = Vec::new();

    for pair in sorted.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);

        if &curr.meter_number != base_meter {
            issues.push(ContinuityIssue::MeterMismatch {
                expected: base_meter.clone(),
                found: curr.meter_number.clone(),
                invoice_id: curr.invoice_id.clone(),
            });
        }

        let expected_start = prev
            .billing_period_end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| VerifyError::field("billing_period_end", "date out of range"))?;
        if curr.billing_period_start != expected_start {
            issues.push(ContinuityIssue::BillingGap {
                previous_invoice: prev.invoice_id.clone(),
                current_invoice: curr.invoice_id.clone(),
                expected_start,
                found_start: curr.billing_period_start,
            });
        }
    }

    if issues.is_empty() {
        Ok(ContinuityOutcome::Continuous)
    } else {
        Ok(ContinuityOutcome::IssuesDetected { issues })
    }
}

/// Comparison of billed consumption against independently reported kWh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KwhComparison {
    pub billed_kwh: f64,
    pub reported_kwh: f64,
    pub deviation_percent: f64,
    pub status: DeviationStatus,
    pub risk_level: RiskLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationStatus {
    WithinTolerance,
    MinorDeviation,
    MajorDeviation,
}

/// Compare billed kWh with reported kWh for the same period.
pub fn compare_kwh(bill: &DiscomBill, reported_kwh: f64) -> Result<KwhComparison, VerifyError> {
    validate_bill(bill)?;
    if !(reported_kwh.is_finite() && reported_kwh > 0.0) {
        return Err(VerifyError::field("reported_kwh", "must be greater than zero"));
    }

    let deviation = deviation_percent(bill.kwh_billed, reported_kwh);
    let (status, risk_level) = match deviation.abs() {
        d if d <= 3.0 => (DeviationStatus::WithinTolerance, RiskLevel::Low),
        d if d <= 7.0 => (DeviationStatus::MinorDeviation, RiskLevel::Medium),
        _ => (DeviationStatus::MajorDeviation, RiskLevel::High),
    };

    Ok(KwhComparison {
        billed_kwh: bill.kwh_billed,
        reported_kwh,
        deviation_percent: deviation,
        status,
        risk_level,
    })
}

/// Outcome of period-over-period trend analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    /// Fewer than 3 billing periods: no trend to analyse.
    InsufficientData,
    /// No abnormal consumption swings.
    Stable,
    AnomaliesDetected { anomalies: Vec<TrendAnomaly> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendAnomaly {
    pub from_invoice: String,
    pub to_invoice: String,
    pub change_percent: f64,
    pub severity: TrendSeverity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSeverity {
    Suspicious,
    Anomalous,
}

/// Detect abnormal consumption swings across consecutive billing periods.
pub fn detect_trend_anomalies(bills: &[DiscomBill]) -> Result<TrendOutcome, VerifyError> {
    for bill in bills {
        validate_bill(bill)?;
    }
    if bills.len() < 3 {
        return Ok(TrendOutcome::InsufficientData);
    }

    let mut sorted: Vec<&DiscomBill> = bills.iter().collect();
    sorted.sort_by_key(|b| b.billing_period_start);

    let mut anomalies = Vec::new();
    for pair in sorted.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let change = round2((curr.kwh_billed - prev.kwh_billed) / prev.kwh_billed * 100.0);

        let severity = match change.abs() {
            c if c <= 20.0 => None,
            c if c <= 40.0 => Some(TrendSeverity::Suspicious),
            _ => Some(TrendSeverity::Anomalous),
        };

        if let Some(severity) = severity {
            anomalies.push(TrendAnomaly {
                from_invoice: prev.invoice_id.clone(),
                to_invoice: curr.invoice_id.clone(),
                change_percent: change,
                severity,
            });
        }
    }

    if anomalies.is_empty() {
        Ok(TrendOutcome::Stable)
    } else {
        Ok(TrendOutcome::AnomaliesDetected { anomalies })
    }
}

/// Aggregate all billing verification signals into a single trust verdict.
pub fn aggregate_trust(
    continuity: &ContinuityOutcome,
    comparison: &KwhComparison,
    trend: &TrendOutcome,
) -> TrustVerdict {
    let mut agg = TrustAggregator::new();

    if matches!(continuity, ContinuityOutcome::IssuesDetected { .. }) {
        agg.add(40, "Meter inconsistency or billing gaps detected");
    }

    match comparison.risk_level {
        RiskLevel::Low => {}
        RiskLevel::Medium => agg.add(15, "Moderate deviation between reported and billed kWh"),
        RiskLevel::High => agg.add(30, "High deviation between reported and billed kWh"),
    }

    if let TrendOutcome::AnomaliesDetected { anomalies } = trend {
        for anomaly in anomalies {
            match anomaly.severity {
                TrendSeverity::Suspicious => agg.add_silent(10),
                TrendSeverity::Anomalous => agg.add(20, "Abnormal kWh trend detected"),
            }
        }
    }

    let mut verdict = agg.finish();
    if verdict.reasons.is_empty() {
        verdict.reasons.push("No billing risk factors detected".into());
    }

    debug!(
        risk_score = verdict.risk_score,
        trust_level = %verdict.trust_level,
        "billing trust aggregated"
    );
    verdict
}
