use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::signal::round2;

/// Emission factors per passenger-km by seat class. Premium cabins carry
/// higher factors from their larger space/weight share.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl FlightClass {
    pub fn emission_factor(&self) -> f64 {
        match self {
            Self::Economy => 0.15,
            Self::PremiumEconomy => 0.23,
            Self::Business => 0.45,
            Self::First => 0.60,
        }
    }
}

impl fmt::Display for FlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Economy => f.write_str("Economy"),
            Self::PremiumEconomy => f.write_str("PremiumEconomy"),
            Self::Business => f.write_str("Business"),
            Self::First => f.write_str("First"),
        }
    }
}

/// Travel modes used for reduction benchmarking, kg CO2 per passenger-km.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelMode {
    FlightShortHaul,
    TrainElectric,
    VideoConference,
}

impl TravelMode {
    pub fn emission_factor(&self) -> f64 {
        match self {
            Self::FlightShortHaul => 0.25,
            Self::TrainElectric => 0.04,
            Self::VideoConference => 0.0,
        }
    }
}

/// Uplift for non-direct routing and takeoff/landing intensity.
const ROUTING_UPLIFT: f64 = 1.08;

/// Mean Earth radius in km, for the haversine distance.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lon) coordinate pairs.
pub fn haversine_km(origin: (f64, f64), dest: (f64, f64)) -> f64 {
    let (lat1, lon1) = (origin.0.to_radians(), origin.1.to_radians());
    let (lat2, lon2) = (dest.0.to_radians(), dest.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// One flight record from an invoice or expense export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightInvoice {
    pub invoice_id: String,
    /// Origin airport (lat, lon).
    pub origin: (f64, f64),
    /// Destination airport (lat, lon).
    pub dest: (f64, f64),
    pub flight_class: FlightClass,
}

/// Estimated emissions for one flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightEstimate {
    pub trip_id: String,
    pub distance_km: f64,
    pub flight_class: FlightClass,
    pub estimated_co2_kg: f64,
}

fn validate_coords(field: &'static str, (lat, lon): (f64, f64)) -> Result<(), VerifyError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(VerifyError::field(field, "coordinates out of range"));
    }
    Ok(())
}

/// Estimate flight emissions from coordinates and seat class.
pub fn estimate_flight(invoice: &FlightInvoice) -> Result<FlightEstimate, VerifyError> {
    validate_coords("origin", invoice.origin)?;
    validate_coords("dest", invoice.dest)?;

    let distance_km = haversine_km(invoice.origin, invoice.dest);
    let factor = invoice.flight_class.emission_factor();

    Ok(FlightEstimate {
        trip_id: invoice.invoice_id.clone(),
        distance_km: round2(distance_km),
        flight_class: invoice.flight_class,
        estimated_co2_kg: round2(distance_km * factor * ROUTING_UPLIFT),
    })
}

/// Result of substituting a cleaner travel mode for the usual one.
///
/// Negative avoided emissions (the actual mode was dirtier than the
/// baseline) yield an explicit no-credit result, never a negative credit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SubstitutionCredit {
    Credit {
        baseline_co2_kg: f64,
        actual_co2_kg: f64,
        credit_kg: f64,
    },
    NoCredit {
        baseline_co2_kg: f64,
        actual_co2_kg: f64,
    },
}

/// Avoided emissions from choosing a greener travel mode.
pub fn substitution_credit(
    distance_km: f64,
    baseline_mode: TravelMode,
    actual_mode: TravelMode,
) -> Result<SubstitutionCredit, VerifyError> {
    if !(distance_km.is_finite() && distance_km > 0.0) {
        return Err(VerifyError::field("distance_km", "must be greater than zero"));
    }

    let baseline_co2 = round2(distance_km * baseline_mode.emission_factor());
    let actual_co2 = round2(distance_km * actual_mode.emission_factor());
    let avoided = baseline_co2 - actual_co2;

    if avoided < 0.0 {
        return Ok(SubstitutionCredit::NoCredit {
            baseline_co2_kg: baseline_co2,
            actual_co2_kg: actual_co2,
        });
    }

    Ok(SubstitutionCredit::Credit {
        baseline_co2_kg: baseline_co2,
        actual_co2_kg: actual_co2,
        credit_kg: round2(avoided),
    })
}
