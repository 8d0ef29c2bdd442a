//! Day-plan construction.
//!
//! Expands an ordered stop list and its night counts into dated day records.
//! All functions here are pure.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::sector::SectorType;

/// Date format used for trip dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single dated day of the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDay {
    /// 1-based, consecutive.
    pub day_number: u32,
    pub date: NaiveDate,
    pub location: String,
}

/// Per-day link back into the route, parallel to the day plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStopMeta {
    /// Index of the originating stop in the route.
    pub stop_index: usize,
    /// True for the first day of the stop's block.
    pub first_day: bool,
}

/// Build the dated day plan.
///
/// Iterates only up to the shorter of `stops` and `nights`. Stops with zero
/// nights emit no days.
pub fn build_plan<S: AsRef<str>>(stops: &[S], nights: &[u32], start_date: NaiveDate) -> Vec<TripDay> {
    let mut plan = Vec::new();
    let mut date = Some(start_date);
    let mut day_number = 1u32;

    for (stop, &count) in stops.iter().zip(nights) {
        for _ in 0..count {
            let Some(current) = date else {
                return plan;
            };
            plan.push(TripDay {
                day_number,
                date: current,
                location: stop.as_ref().to_string(),
            });
            day_number += 1;
            date = current.checked_add_days(Days::new(1));
        }
    }

    plan
}

/// [`build_plan`] with a textual start date. Unparseable dates give an empty plan.
pub fn build_plan_from_str<S: AsRef<str>>(stops: &[S], nights: &[u32], start_date: &str) -> Vec<TripDay> {
    match parse_trip_date(start_date) {
        Some(date) => build_plan(stops, nights, date),
        None => Vec::new(),
    }
}

/// Per-day stop metadata, derived by the same expansion as [`build_plan`].
pub fn build_day_stop_meta<S>(stops: &[S], nights: &[u32]) -> Vec<DayStopMeta> {
    stops
        .iter()
        .zip(nights)
        .enumerate()
        .flat_map(|(stop_index, (_, &count))| {
            (0..count).map(move |offset| DayStopMeta {
                stop_index,
                first_day: offset == 0,
            })
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` trip date.
pub fn parse_trip_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Days from `start` to `end`, both inclusive. Non-positive when `end < start`.
pub fn count_days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Trip end date for a built plan.
///
/// A road end stop arrives the day after the last overnight day.
pub fn derive_end_date(plan: &[TripDay], end_sector: SectorType) -> Option<NaiveDate> {
    let last = plan.last()?;
    match end_sector {
        SectorType::Itinerary => Some(last.date),
        SectorType::Road => last.date.checked_add_days(Days::new(1)),
    }
}
