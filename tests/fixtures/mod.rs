//! Test fixtures for trip-planner.
//!
//! Provides:
//! - Real New Zealand locations outside the built-in catalog
//! - Mock collaborators (resolver, leg providers)
//! - Date and request helpers

#![allow(dead_code)]

pub mod nz_locations;

pub use nz_locations::*;

use std::cell::Cell;

use chrono::NaiveDate;
use trip_planner::catalog::StopCatalog;
use trip_planner::error::LegError;
use trip_planner::legs::DriveLeg;
use trip_planner::place::Place;
use trip_planner::sequencer::SequenceOptions;
use trip_planner::state::{submit, TripPlanState, TripRequest};
use trip_planner::traits::{CoordinateResolver, DriveLegProvider, NoResolver};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid fixture date")
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Resolver backed by the fixture location tables.
pub struct FixtureResolver;

impl CoordinateResolver for FixtureResolver {
    fn resolve(&self, query: &str) -> Option<Place> {
        NORTH_ISLAND
            .iter()
            .chain(SOUTH_ISLAND)
            .find(|loc| loc.name.eq_ignore_ascii_case(query.trim()))
            .map(|loc| Place::new(loc.name, loc.lat, loc.lng))
    }
}

/// Submit against the built-in catalog with no external resolver.
pub fn submit_catalog(request: &TripRequest) -> TripPlanState {
    submit(request, &StopCatalog::new_zealand(), &NoResolver, &SequenceOptions::default())
        .expect("fixture request is valid")
}

/// Auckland -> [Rotorua, Taupo] -> Wellington over 7 days.
pub fn north_island_trip() -> TripPlanState {
    submit_catalog(
        &TripRequest::new("Auckland")
            .end("Wellington")
            .waypoint("Taupo")
            .waypoint("Rotorua")
            .dates(date("2025-01-01"), date("2025-01-07")),
    )
}

/// Leg provider that always fails.
pub struct FailingLegs;

impl DriveLegProvider for FailingLegs {
    fn legs_for(&self, _points: &[Place]) -> Result<Vec<DriveLeg>, LegError> {
        Err(LegError::Malformed("service unavailable".to_string()))
    }
}

/// Leg provider that returns fixed-size legs and counts calls.
#[derive(Default)]
pub struct FixedLegs {
    pub calls: Cell<usize>,
    /// Drop the last leg to simulate a truncated response.
    pub truncate: bool,
}

impl DriveLegProvider for FixedLegs {
    fn legs_for(&self, points: &[Place]) -> Result<Vec<DriveLeg>, LegError> {
        self.calls.set(self.calls.get() + 1);
        let mut legs: Vec<DriveLeg> = points
            .windows(2)
            .map(|pair| DriveLeg {
                from: pair[0].name.clone(),
                to: pair[1].name.clone(),
                distance_km: 100.0,
                drive_hours: 1.5,
            })
            .collect();
        if self.truncate {
            legs.pop();
        }
        Ok(legs)
    }
}
