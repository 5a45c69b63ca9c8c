use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VerifyError;
use crate::signal::{deviation_percent, round2, RiskLevel, ThresholdTable, ToleranceBand};

/// National grid-average emission factor, kg CO2 per kWh.
pub const GRID_EMISSION_FACTOR: f64 = 0.708;

/// Uncertainty tolerance applied around the grid-average estimate.
const RANGE_TOLERANCE: f64 = 0.07;

/// Auditor deviation to risk score.
static DEVIATION_RISK: ThresholdTable = ThresholdTable::new(&[(5.0, 10), (10.0, 30), (20.0, 60)], 85);

/// One period of metered electricity consumption.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectricityReading {
    pub kwh: f64,
    pub state: String,
    pub period: String,
}

fn validate(reading: &ElectricityReading) -> Result<(), VerifyError> {
    if !reading.kwh.is_finite() {
        return Err(VerifyError::field("kwh", "must be a number"));
    }
    if reading.kwh <= 0.0 {
        return Err(VerifyError::field("kwh", "must be greater than zero"));
    }
    if reading.state.trim().is_empty() {
        return Err(VerifyError::field("state", "must be a non-empty string"));
    }
    if reading.period.trim().is_empty() {
        return Err(VerifyError::field("period", "must be a non-empty string"));
    }
    Ok(())
}

/// Baseline emission computed from the grid-average factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseEmission {
    pub calculated_emission_kg: f64,
    pub emission_factor_used: f64,
}

/// Convert metered consumption into baseline CO2 emissions.
pub fn base_emission(reading: &ElectricityReading) -> Result<BaseEmission, VerifyError> {
    validate(reading)?;
    Ok(BaseEmission {
        calculated_emission_kg: round2(reading.kwh * GRID_EMISSION_FACTOR),
        emission_factor_used: GRID_EMISSION_FACTOR,
    })
}

/// Baseline emission expanded into its tolerance band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionRange {
    pub calculated_emission_kg: f64,
    pub range: ToleranceBand,
}

/// Expand the baseline by the fixed fractional tolerance.
pub fn emission_range(reading: &ElectricityReading) -> Result<EmissionRange, VerifyError> {
    let base = base_emission(reading)?;
    Ok(EmissionRange {
        range: ToleranceBand::around(base.calculated_emission_kg, RANGE_TOLERANCE),
        calculated_emission_kg: base.calculated_emission_kg,
    })
}

/// Whether the auditor value fell inside the expected range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    WithinRange,
    OutsideRange,
}

/// Outcome of comparing an auditor-reported emission against the range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditorAssessment {
    pub auditor_emission_kg: f64,
    pub range: ToleranceBand,
    pub status: RangeStatus,
    pub risk_level: RiskLevel,
    pub deviation_percent: f64,
}

/// Compare an auditor-reported emission against the expected range.
pub fn authenticate_auditor(
    reading: &ElectricityReading,
    auditor_emission_kg: f64,
) -> Result<AuditorAssessment, VerifyError> {
    let expected = emission_range(reading)?;

    let (status, risk_level) = if expected.range.contains(auditor_emission_kg) {
        (RangeStatus::WithinRange, RiskLevel::Low)
    } else {
        (RangeStatus::OutsideRange, RiskLevel::High)
    };

    Ok(AuditorAssessment {
        auditor_emission_kg,
        range: expected.range,
        status,
        risk_level,
        deviation_percent: deviation_percent(expected.calculated_emission_kg, auditor_emission_kg),
    })
}

/// Numeric risk derived from the auditor deviation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub deviation_percent: f64,
}

/// Map the absolute auditor deviation through the risk threshold table.
pub fn risk_score(
    reading: &ElectricityReading,
    auditor_emission_kg: f64,
) -> Result<RiskAssessment, VerifyError> {
    let assessment = authenticate_auditor(reading, auditor_emission_kg)?;
    Ok(RiskAssessment {
        risk_score: DEVIATION_RISK.score(assessment.deviation_percent.abs()),
        risk_level: assessment.risk_level,
        deviation_percent: assessment.deviation_percent,
    })
}

/// Combined result of the full electricity pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectricityReport {
    pub base: BaseEmission,
    pub expected: EmissionRange,
    pub auditor: AuditorAssessment,
    pub risk: RiskAssessment,
}

/// Master entry point: run every stage and return the combined report.
pub fn run(
    reading: &ElectricityReading,
    auditor_emission_kg: f64,
) -> Result<ElectricityReport, VerifyError> {
    let report = ElectricityReport {
        base: base_emission(reading)?,
        expected: emission_range(reading)?,
        auditor: authenticate_auditor(reading, auditor_emission_kg)?,
        risk: risk_score(reading, auditor_emission_kg)?,
    };
    debug!(
        kwh = reading.kwh,
        risk_score = report.risk.risk_score,
        "electricity verification complete"
    );
    Ok(report)
}
