use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::signal::round2;

/// Measured data behind a reduction project submission. Which fields are
/// present determines which calculation rule applies.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionSubmission {
    pub solar_capacity_kw: Option<f64>,
    pub annual_generation_kwh: Option<f64>,
    pub baseline_energy_kwh: Option<f64>,
    pub post_project_energy_kwh: Option<f64>,
    pub waste_recycled_kg: Option<f64>,
}

fn validate(submission: &ReductionSubmission) -> Result<(), VerifyError> {
    let fields: [(&'static str, Option<f64>); 5] = [
        ("solar_capacity_kw", submission.solar_capacity_kw),
        ("annual_generation_kwh", submission.annual_generation_kwh),
        ("baseline_energy_kwh", submission.baseline_energy_kwh),
        ("post_project_energy_kwh", submission.post_project_energy_kwh),
        ("waste_recycled_kg", submission.waste_recycled_kg),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(VerifyError::field(field, "must be a non-negative number"));
            }
        }
    }
    Ok(())
}

/// Estimated reduction in kg CO2, by mutually exclusive priority-ordered
/// rules. The first applicable rule wins; later rules are never consulted.
///
/// 1. Solar capacity with annual output: `annual_generation_kwh * 0.7`
/// 2. Baseline and post-project energy: `max(0, saved_kwh * 0.5)`
/// 3. Recycled waste mass: `waste_recycled_kg * 0.8`
/// 4. Otherwise zero.
pub fn estimated_reduction_kg(submission: &ReductionSubmission) -> Result<f64, VerifyError> {
    validate(submission)?;

    if let (Some(capacity), Some(generation)) =
        (submission.solar_capacity_kw, submission.annual_generation_kwh)
    {
        if capacity > 0.0 && generation > 0.0 {
            return Ok(round2(generation * 0.7));
        }
    }

    if let (Some(baseline), Some(post)) =
        (submission.baseline_energy_kwh, submission.post_project_energy_kwh)
    {
        if baseline > 0.0 && post > 0.0 {
            return Ok(round2(((baseline - post) * 0.5).max(0.0)));
        }
    }

    if let Some(waste) = submission.waste_recycled_kg {
        if waste > 0.0 {
            return Ok(round2(waste * 0.8));
        }
    }

    Ok(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_rule_wins_when_present() {
        let submission = ReductionSubmission {
            solar_capacity_kw: Some(50.0),
            annual_generation_kwh: Some(10_000.0),
            // Present but never consulted: the solar rule applies first.
            baseline_energy_kwh: Some(100_000.0),
            post_project_energy_kwh: Some(10.0),
            waste_recycled_kg: Some(1_000_000.0),
        };
        assert_eq!(estimated_reduction_kg(&submission).unwrap(), 7000.0);
    }

    #[test]
    fn efficiency_rule_applies_second() {
        let submission = ReductionSubmission {
            baseline_energy_kwh: Some(10_000.0),
            post_project_energy_kwh: Some(6_000.0),
            waste_recycled_kg: Some(500.0),
            ..Default::default()
        };
        assert_eq!(estimated_reduction_kg(&submission).unwrap(), 2000.0);
    }

    #[test]
    fn efficiency_rule_floors_negative_savings() {
        let submission = ReductionSubmission {
            baseline_energy_kwh: Some(5_000.0),
            post_project_energy_kwh: Some(8_000.0),
            ..Default::default()
        };
        assert_eq!(estimated_reduction_kg(&submission).unwrap(), 0.0);
    }

    #[test]
    fn waste_rule_applies_last() {
        let submission = ReductionSubmission {
            waste_recycled_kg: Some(500.0),
            ..Default::default()
        };
        assert_eq!(estimated_reduction_kg(&submission).unwrap(), 400.0);
    }

    #[test]
    fn empty_submission_reduces_nothing() {
        assert_eq!(
            estimated_reduction_kg(&ReductionSubmission::default()).unwrap(),
            0.0
        );
    }

    #[test]
    fn solar_needs_both_fields() {
        let submission = ReductionSubmission {
            annual_generation_kwh: Some(10_000.0),
            waste_recycled_kg: Some(500.0),
            ..Default::default()
        };
        // Without capacity, the solar rule does not apply; waste does.
        assert_eq!(estimated_reduction_kg(&submission).unwrap(), 400.0);
    }

    #[test]
    fn negative_measurement_fails_validation() {
        let submission = ReductionSubmission {
            waste_recycled_kg: Some(-1.0),
            ..Default::default()
        };
        let err = estimated_reduction_kg(&submission).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Validation {
                field: "waste_recycled_kg",
                ..
            }
        ));
    }
}
