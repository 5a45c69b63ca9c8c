use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VerifyError;
use crate::signal::round2;

/// Scope 1 emission factors, kg CO2 per unit (litre, or m³ for gas).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Diesel,
    Petrol,
    Lpg,
    NaturalGas,
}

impl FuelType {
    pub fn emission_factor(&self) -> f64 {
        match self {
            Self::Diesel => 2.68,
            Self::Petrol => 2.31,
            Self::Lpg => 1.51,
            Self::NaturalGas => 1.8,
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diesel => f.write_str("Diesel"),
            Self::Petrol => f.write_str("Petrol"),
            Self::Lpg => f.write_str("LPG"),
            Self::NaturalGas => f.write_str("NaturalGas"),
        }
    }
}

/// Allowed slack between purchased and logged quantity, as a fraction of
/// the purchased quantity (tank level differences).
const CROSS_CHECK_TOLERANCE: f64 = 0.05;

/// Fixed risk score assigned to a flagged invoice/log mismatch.
const MISMATCH_RISK_SCORE: u32 = 80;

/// A fuel purchase invoice (the financial record).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuelInvoice {
    pub invoice_id: String,
    pub fuel_type: FuelType,
    pub liters_bought: f64,
}

/// An operational usage log for the same period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageLog {
    pub fuel_consumed_log: f64,
    pub hours_run: Option<f64>,
    pub odometer_km: Option<f64>,
}

/// Outcome of cross-verifying an invoice against a usage log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossCheckOutcome {
    Verified {
        fuel_type: FuelType,
        total_liters: f64,
        calculated_co2_kg: f64,
    },
    Flagged {
        reason: String,
        risk_score: u32,
    },
}

/// Cross-verify purchased quantity against claimed usage.
///
/// Quantities must agree within the fixed tolerance of the purchased amount
/// or the record is flagged with a fixed risk score; otherwise the verified
/// Scope 1 emissions are the purchased quantity times the fuel factor.
pub fn cross_check(
    invoice: &FuelInvoice,
    log: &UsageLog,
) -> Result<CrossCheckOutcome, VerifyError> {
    if !(invoice.liters_bought.is_finite() && invoice.liters_bought > 0.0) {
        return Err(VerifyError::field("liters_bought", "must be greater than zero"));
    }
    if !(log.fuel_consumed_log.is_finite() && log.fuel_consumed_log >= 0.0) {
        return Err(VerifyError::field("fuel_consumed_log", "must be non-negative"));
    }

    let bought = invoice.liters_bought;
    let logged = log.fuel_consumed_log;
    if (bought - logged).abs() > bought * CROSS_CHECK_TOLERANCE {
        debug!(invoice = %invoice.invoice_id, bought, logged, "fuel cross-check flagged");
        return Ok(CrossCheckOutcome::Flagged {
            reason: format!("Mismatch: bought {bought}L but logged {logged}L"),
            risk_score: MISMATCH_RISK_SCORE,
        });
    }

    Ok(CrossCheckOutcome::Verified {
        fuel_type: invoice.fuel_type,
        total_liters: bought,
        calculated_co2_kg: round2(bought * invoice.fuel_type.emission_factor()),
    })
}

/// Asset classes with known efficiency benchmarks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    /// Expected 3.0–4.0 kWh generated per litre.
    DieselGeneratorIndustrial,
    /// Expected 2.5–4.0 km per litre.
    FleetTruckHeavy,
}

impl AssetType {
    /// Expected efficiency range (output units per litre).
    pub fn benchmark(&self) -> (f64, f64) {
        match self {
            Self::DieselGeneratorIndustrial => (3.0, 4.0),
            Self::FleetTruckHeavy => (2.5, 4.0),
        }
    }
}

/// Outcome of benchmarking logged efficiency against the asset class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EfficiencyOutcome {
    Normal {
        efficiency: f64,
    },
    /// Below the benchmark floor: points at fuel leakage, theft, or poor
    /// maintenance.
    LowEfficiency {
        efficiency: f64,
        expected_min: f64,
    },
}

/// Benchmark actual efficiency (output per litre) against the asset class.
pub fn analyze_efficiency(
    asset_type: AssetType,
    output_value: f64,
    fuel_used: f64,
) -> Result<EfficiencyOutcome, VerifyError> {
    if !(fuel_used.is_finite() && fuel_used > 0.0) {
        return Err(VerifyError::field("fuel_used", "must be greater than zero"));
    }
    if !(output_value.is_finite() && output_value >= 0.0) {
        return Err(VerifyError::field("output_value", "must be non-negative"));
    }

    let efficiency = output_value / fuel_used;
    let (expected_min, _) = asset_type.benchmark();

    if efficiency < expected_min {
        return Ok(EfficiencyOutcome::LowEfficiency {
            efficiency: round2(efficiency),
            expected_min,
        });
    }

    Ok(EfficiencyOutcome::Normal {
        efficiency: round2(efficiency),
    })
}

/// Diesel generator baseline efficiency, kWh per litre.
const BASELINE_GENERATOR_EFFICIENCY: f64 = 3.3;

/// Biodiesel lifecycle factor (kg CO2 per litre) and efficiency.
const BIODIESEL_FACTOR: f64 = 0.4;
const BIODIESEL_EFFICIENCY: f64 = 3.0;

/// The cleaner source a diesel generator is replaced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementSource {
    SolarHybrid,
    Biodiesel,
    /// Unknown source: no emissions change is assumed.
    Unchanged,
}

/// CO2 avoided by replacing diesel generation with a cleaner source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelSwitchCredit {
    pub baseline_co2_kg: f64,
    pub project_co2_kg: f64,
    pub credits_generated_kg: f64,
}

/// Compute avoided emissions for an energy demand served by a cleaner
/// source instead of a baseline diesel generator.
pub fn fuel_switch_credit(
    energy_required_kwh: f64,
    new_source: ReplacementSource,
) -> Result<FuelSwitchCredit, VerifyError> {
    if !(energy_required_kwh.is_finite() && energy_required_kwh > 0.0) {
        return Err(VerifyError::field(
            "energy_required_kwh",
            "must be greater than zero",
        ));
    }

    let baseline_liters = energy_required_kwh / BASELINE_GENERATOR_EFFICIENCY;
    let baseline_co2 = baseline_liters * FuelType::Diesel.emission_factor();

    let project_co2 = match new_source {
        ReplacementSource::SolarHybrid => 0.0,
        ReplacementSource::Biodiesel => (energy_required_kwh / BIODIESEL_EFFICIENCY) * BIODIESEL_FACTOR,
        ReplacementSource::Unchanged => baseline_co2,
    };

    Ok(FuelSwitchCredit {
        baseline_co2_kg: round2(baseline_co2),
        project_co2_kg: round2(project_co2),
        credits_generated_kg: round2(baseline_co2 - project_co2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(liters: f64) -> FuelInvoice {
        FuelInvoice {
            invoice_id: "INV-FUEL-001".into(),
            fuel_type: FuelType::Diesel,
            liters_bought: liters,
        }
    }

    fn log(liters: f64) -> UsageLog {
        UsageLog {
            fuel_consumed_log: liters,
            hours_run: Some(20.0),
            odometer_km: None,
        }
    }

    #[test]
    fn matching_invoice_and_log_verifies() {
        let outcome = cross_check(&invoice(1000.0), &log(1000.0)).unwrap();
        assert_eq!(
            outcome,
            CrossCheckOutcome::Verified {
                fuel_type: FuelType::Diesel,
                total_liters: 1000.0,
                calculated_co2_kg: 2680.0,
            }
        );
    }

    #[test]
    fn five_percent_slack_still_verifies() {
        // 950 logged against 1000 bought is exactly at the tolerance edge.
        let outcome = cross_check(&invoice(1000.0), &log(950.0)).unwrap();
        assert!(matches!(outcome, CrossCheckOutcome::Verified { .. }));
    }

    #[test]
    fn mismatch_beyond_tolerance_is_flagged() {
        let outcome = cross_check(&invoice(1000.0), &log(900.0)).unwrap();
        let CrossCheckOutcome::Flagged { reason, risk_score } = outcome else {
            panic!("expected flag");
        };
        assert_eq!(risk_score, 80);
        assert!(reason.contains("1000"));
        assert!(reason.contains("900"));
    }

    #[test]
    fn factors_per_fuel_type() {
        let petrol = FuelInvoice {
            invoice_id: "INV-2".into(),
            fuel_type: FuelType::Petrol,
            liters_bought: 100.0,
        };
        let outcome = cross_check(&petrol, &log(100.0)).unwrap();
        assert_eq!(
            outcome,
            CrossCheckOutcome::Verified {
                fuel_type: FuelType::Petrol,
                total_liters: 100.0,
                calculated_co2_kg: 231.0,
            }
        );
    }

    #[test]
    fn zero_purchase_fails_validation() {
        let err = cross_check(&invoice(0.0), &log(0.0)).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Validation {
                field: "liters_bought",
                ..
            }
        ));
    }

    #[test]
    fn normal_generator_efficiency() {
        // 3000 kWh from 1000 L = 3.0 kWh/L, at the benchmark floor.
        let outcome =
            analyze_efficiency(AssetType::DieselGeneratorIndustrial, 3000.0, 1000.0).unwrap();
        assert_eq!(outcome, EfficiencyOutcome::Normal { efficiency: 3.0 });
    }

    #[test]
    fn low_efficiency_raises_alert() {
        let outcome =
            analyze_efficiency(AssetType::DieselGeneratorIndustrial, 2000.0, 1000.0).unwrap();
        assert_eq!(
            outcome,
            EfficiencyOutcome::LowEfficiency {
                efficiency: 2.0,
                expected_min: 3.0,
            }
        );
    }

    #[test]
    fn zero_fuel_is_a_validation_error() {
        let err = analyze_efficiency(AssetType::FleetTruckHeavy, 100.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Validation {
                field: "fuel_used",
                ..
            }
        ));
    }

    #[test]
    fn solar_switch_avoids_the_full_baseline() {
        let credit = fuel_switch_credit(1000.0, ReplacementSource::SolarHybrid).unwrap();
        // 1000 kWh / 3.3 kWh/L * 2.68 kg/L = 812.12 kg.
        assert_eq!(credit.baseline_co2_kg, 812.12);
        assert_eq!(credit.project_co2_kg, 0.0);
        assert_eq!(credit.credits_generated_kg, 812.12);
    }

    #[test]
    fn biodiesel_switch_keeps_lifecycle_emissions() {
        let credit = fuel_switch_credit(1000.0, ReplacementSource::Biodiesel).unwrap();
        // 1000 / 3.0 * 0.4 = 133.33 kg.
        assert_eq!(credit.project_co2_kg, 133.33);
        assert_eq!(credit.credits_generated_kg, 678.79);
    }

    #[test]
    fn unknown_source_generates_nothing() {
        let credit = fuel_switch_credit(1000.0, ReplacementSource::Unchanged).unwrap();
        assert_eq!(credit.credits_generated_kg, 0.0);
    }
}
