//! Great-circle distance and the straight-line drive-leg fallback.
//!
//! Used whenever the road routing service is unavailable. Ignores roads
//! entirely but is always defined.

use crate::error::LegError;
use crate::legs::DriveLeg;
use crate::place::Place;
use crate::traits::DriveLegProvider;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 80.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometers.
///
/// Inputs are not range checked.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// [`distance_km`] over (lat, lng) tuples.
pub fn distance_between(from: (f64, f64), to: (f64, f64)) -> f64 {
    distance_km(from.0, from.1, to.0, to.1)
}

/// Straight-line drive-leg provider.
///
/// Estimates drive time from great-circle distance and an assumed speed.
#[derive(Debug, Clone)]
pub struct HaversineLegs {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineLegs {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineLegs {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in km to drive time in hours.
    fn km_to_hours(&self, km: f64) -> f64 {
        if self.speed_kmh <= 0.0 {
            return 0.0;
        }
        km / self.speed_kmh
    }

    /// Legs for consecutive point pairs. Never fails.
    pub fn legs(&self, points: &[Place]) -> Vec<DriveLeg> {
        points
            .windows(2)
            .map(|pair| {
                let km = distance_between(pair[0].coords(), pair[1].coords());
                DriveLeg {
                    from: pair[0].name.clone(),
                    to: pair[1].name.clone(),
                    distance_km: km,
                    drive_hours: self.km_to_hours(km),
                }
            })
            .collect()
    }
}

impl DriveLegProvider for HaversineLegs {
    fn legs_for(&self, points: &[Place]) -> Result<Vec<DriveLeg>, LegError> {
        Ok(self.legs(points))
    }
}
