//! Drive legs between consecutive route points.
//!
//! Leg lookup is best effort: a failing or inconsistent provider is replaced
//! by straight-line legs. A [`LegRequest`] snapshots the point set it was made
//! for so callers can discard results that arrive after the route changed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LegError;
use crate::haversine::HaversineLegs;
use crate::place::Place;
use crate::state::TripPlanState;
use crate::traits::DriveLegProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveLeg {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub drive_hours: f64,
}

/// Where a set of legs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSource {
    Provider,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSet {
    pub legs: Vec<DriveLeg>,
    pub source: LegSource,
}

impl LegSet {
    pub fn total_km(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_km).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.legs.iter().map(|leg| leg.drive_hours).sum()
    }
}

/// The point set a leg lookup was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegRequest {
    points: Vec<Place>,
}

impl LegRequest {
    pub fn new(points: Vec<Place>) -> Self {
        Self { points }
    }

    /// Request for the current map points of `state`.
    pub fn for_state(state: &TripPlanState) -> Self {
        Self::new(state.map_points())
    }

    pub fn points(&self) -> &[Place] {
        &self.points
    }

    /// Ask `provider` for legs, falling back to straight-line legs on failure.
    pub fn fetch<P: DriveLegProvider>(&self, provider: &P, fallback: &HaversineLegs) -> LegSet {
        if self.points.len() < 2 {
            return LegSet {
                legs: Vec::new(),
                source: LegSource::Provider,
            };
        }

        match provider.legs_for(&self.points).and_then(|legs| self.check(legs)) {
            Ok(legs) => LegSet {
                legs,
                source: LegSource::Provider,
            },
            Err(err) => {
                warn!(error = %err, points = self.points.len(), "drive-leg lookup failed, using straight-line legs");
                LegSet {
                    legs: fallback.legs(&self.points),
                    source: LegSource::StraightLine,
                }
            }
        }
    }

    /// True when `state` still has the point set this request was made for.
    pub fn is_current(&self, state: &TripPlanState) -> bool {
        self.points == state.map_points()
    }

    /// Legs from this request if it is still current for `state`.
    pub fn accept(&self, legs: LegSet, state: &TripPlanState) -> Option<LegSet> {
        if self.is_current(state) {
            Some(legs)
        } else {
            warn!("discarding drive legs for an outdated route");
            None
        }
    }

    fn check(&self, legs: Vec<DriveLeg>) -> Result<Vec<DriveLeg>, LegError> {
        let expected = self.points.len().saturating_sub(1);
        if legs.len() != expected {
            return Err(LegError::Malformed(format!(
                "expected {} legs, got {}",
                expected,
                legs.len()
            )));
        }
        Ok(legs)
    }
}
