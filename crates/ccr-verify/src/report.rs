use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::signal::round2;

/// A self-reported organizational emission report across measurement groups.
/// Absent measurements default to zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionReport {
    pub electricity_kwh: f64,
    pub diesel_liters: f64,
    pub petrol_liters: f64,
    pub natural_gas_m3: f64,
    pub flight_km: f64,
    pub car_km: f64,
    pub waste_kg: f64,
    pub recycled_waste_kg: f64,
}

/// Estimated emissions plus a completeness-based verification score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionEstimate {
    pub estimated_emissions_kg: f64,
    /// 0–100: 25 points per populated measurement group.
    pub verification_score: u32,
}

fn validate(report: &EmissionReport) -> Result<(), VerifyError> {
    let fields: [(&'static str, f64); 8] = [
        ("electricity_kwh", report.electricity_kwh),
        ("diesel_liters", report.diesel_liters),
        ("petrol_liters", report.petrol_liters),
        ("natural_gas_m3", report.natural_gas_m3),
        ("flight_km", report.flight_km),
        ("car_km", report.car_km),
        ("waste_kg", report.waste_kg),
        ("recycled_waste_kg", report.recycled_waste_kg),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(VerifyError::field(field, "must be a non-negative number"));
        }
    }
    Ok(())
}

/// Estimate total emissions for a report and score its completeness.
///
/// The recycling offset is subtracted, and the total is floored at zero so
/// heavy recycling never produces a negative footprint.
pub fn estimate(report: &EmissionReport) -> Result<EmissionEstimate, VerifyError> {
    validate(report)?;

    let total = report.electricity_kwh * 0.7
        + report.diesel_liters * 2.6
        + report.petrol_liters * 2.3
        + report.natural_gas_m3 * 2.0
        + report.flight_km * 0.15
        + report.car_km * 0.21
        + report.waste_kg * 0.5
        - report.recycled_waste_kg * 0.3;

    Ok(EmissionEstimate {
        estimated_emissions_kg: round2(total.max(0.0)),
        verification_score: verification_score(report),
    })
}

/// 25 points per populated measurement group: electricity, fuel, transport,
/// waste.
fn verification_score(report: &EmissionReport) -> u32 {
    let mut score = 0;
    if report.electricity_kwh > 0.0 {
        score += 25;
    }
    if report.diesel_liters > 0.0 || report.petrol_liters > 0.0 || report.natural_gas_m3 > 0.0 {
        score += 25;
    }
    if report.flight_km > 0.0 || report.car_km > 0.0 {
        score += 25;
    }
    if report.waste_kg > 0.0 {
        score += 25;
    }
    score
}
