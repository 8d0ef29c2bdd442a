//! Trip plan state and its transitions.
//!
//! [`TripPlanState`] owns the route, the night allocation, the endpoint
//! sectors and everything derived from them. Derived fields are rebuilt
//! together on every transition, so they cannot drift apart. Edits never
//! fail: a rejected edit returns the unchanged state plus a [`Rejection`].

use std::collections::{BTreeSet, HashSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::StopCatalog;
use crate::day_plan::{build_day_stop_meta, build_plan, count_days_inclusive, derive_end_date, DayStopMeta, TripDay};
use crate::error::PlanError;
use crate::nights::allocate_for_sectors;
use crate::place::{normalize_name, KnownCoords, Place, Stop};
use crate::sector::{classify, endpoint_index, Endpoint, SectorType, Sectors};
use crate::sequencer::{order_waypoints, resolve_waypoint, SequenceOptions};
use crate::traits::CoordinateResolver;

/// Longest trip, in nights, the planner will build.
pub const MAX_TRIP_NIGHTS: u32 = 3_660;

/// Free-form detail attached to a route stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopDetail {
    #[serde(default)]
    pub note: Option<String>,
}

/// Detail attached to one day of a stop's block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetail {
    pub stop_index: usize,
    /// Zero-based day within the stop's block.
    pub day_offset: u32,
    pub note: String,
}

/// Input collected for a new trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub waypoints: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Coordinates already known to the caller, e.g. from place search.
    pub known_coords: KnownCoords,
}

impl TripRequest {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            ..Self::default()
        }
    }

    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn waypoint(mut self, name: impl Into<String>) -> Self {
        self.waypoints.push(name.into());
        self
    }

    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn known(mut self, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        self.known_coords.insert(name, lat, lng);
        self
    }
}

/// A structural or detail edit to an existing plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    ChangeNights { index: usize, nights: i64 },
    RemoveStop { index: usize },
    InsertStop { after: usize, stop: Stop },
    ReorderStop { from: usize, to: usize },
    ConvertSector { endpoint: Endpoint, to: SectorType },
    AnnotateStop { index: usize, note: Option<String> },
    AnnotateDay { day_number: u32, note: Option<String> },
    ToggleExpanded { index: usize },
}

/// Why an edit left the plan unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("stop {index} is a fixed start or end position")]
    AnchorPosition { index: usize },
    #[error("stop {index} is out of range for a route of {len} stops")]
    OutOfRange { index: usize, len: usize },
    #[error("stop {index} is a road sector and has no nights to change")]
    RoadSector { index: usize },
    #[error("route has no movable stops")]
    NoInteriorStops,
    #[error("edit does not change the plan")]
    Unchanged,
    #[error("the plan must keep at least one overnight stop")]
    LastOvernightStop,
    #[error("a {nights}-night trip does not fit the calendar or the planner's limit")]
    TripTooLong { nights: u64 },
    #[error("day {day_number} is not part of the plan")]
    UnknownDay { day_number: u32 },
}

/// Outcome of [`TripPlanState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub state: TripPlanState,
    pub rejection: Option<Rejection>,
}

impl Applied {
    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    pub fn into_state(self) -> TripPlanState {
        self.state
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlanState {
    stops: Vec<Stop>,
    nights: Vec<u32>,
    sectors: Sectors,
    has_end_anchor: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    plan: Vec<TripDay>,
    day_meta: Vec<DayStopMeta>,
    stop_details: Vec<StopDetail>,
    #[serde(default)]
    day_details: Vec<DayDetail>,
    #[serde(default)]
    expanded: BTreeSet<usize>,
}

/// Validate `request`, order its waypoints and build the initial plan.
pub fn submit<R: CoordinateResolver>(
    request: &TripRequest,
    catalog: &StopCatalog,
    resolver: &R,
    options: &SequenceOptions,
) -> Result<TripPlanState, PlanError> {
    let start_name = request
        .start
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(PlanError::MissingStart)?;
    let end_name = request
        .end
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let (Some(start_date), Some(end_date)) = (request.start_date, request.end_date) else {
        return Err(PlanError::MissingDates);
    };
    let total_days = count_days_inclusive(start_date, end_date);
    if total_days <= 0 {
        return Err(PlanError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }
    if total_days > i64::from(MAX_TRIP_NIGHTS) {
        return Err(PlanError::TripTooLong {
            days: total_days,
            max: MAX_TRIP_NIGHTS,
        });
    }

    let mut known = request.known_coords.clone();
    let start = resolve_place(start_name, &known, catalog, resolver);
    let end = end_name.map(|name| (name, resolve_place(name, &known, catalog, resolver)));

    let mut missing = Vec::new();
    if start.is_none() {
        missing.push(start_name.to_string());
    }
    if let Some((name, None)) = &end {
        missing.push(name.to_string());
    }
    let (Some(start), true) = (start, missing.is_empty()) else {
        return Err(PlanError::UnresolvedPlaces(missing));
    };
    let end = end.and_then(|(_, place)| place);

    let waypoints: Vec<String> = request
        .waypoints
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    for name in &waypoints {
        if resolve_waypoint(name, &known, catalog).is_none() {
            if let Some(place) = resolver.resolve(name) {
                known.insert(name.clone(), place.lat, place.lng);
            }
        }
    }

    let ordered = order_waypoints(&start, end.as_ref(), &waypoints, &known, catalog, options);

    let mut stops = Vec::with_capacity(ordered.ordered_names.len() + 2);
    stops.push(Stop::from(start.clone()));
    for name in &ordered.ordered_names {
        let location = resolve_waypoint(name, &known, catalog).map(|(_, location)| location);
        stops.push(Stop::new(name.clone(), location));
    }
    let has_end_anchor = end.is_some();
    let round_trip = end
        .as_ref()
        .is_some_and(|end| normalize_name(&end.name) == normalize_name(&start.name));
    if let Some(end) = end {
        stops.push(Stop::from(end));
    }

    let sectors = classify(has_end_anchor, round_trip, stops.len());
    let nights = allocate_for_sectors(&sectors.road_mask(stops.len()), total_days);

    let state = TripPlanState::assemble(stops, nights, sectors, has_end_anchor, start_date);
    info!(
        stops = state.stops.len(),
        days = state.plan.len(),
        round_trip,
        unresolved = state.stops.iter().filter(|s| s.location.is_none()).count(),
        "trip plan submitted"
    );
    Ok(state)
}

/// Supplied coordinates, then the catalog, then the external resolver.
fn resolve_place<R: CoordinateResolver>(
    name: &str,
    known: &KnownCoords,
    catalog: &StopCatalog,
    resolver: &R,
) -> Option<Place> {
    if let Some((lat, lng)) = known.get(name) {
        return Some(Place::new(name, lat, lng));
    }
    if let Some(entry) = catalog.find(name) {
        return Some(Place::new(name, entry.lat, entry.lng));
    }
    resolver
        .resolve(name)
        .map(|place| Place::new(name, place.lat, place.lng))
}

/// Where index `index` ends up after moving `from` to `to`.
fn moved_index(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < to && index > from && index <= to {
        index - 1
    } else if from > to && index >= to && index < from {
        index + 1
    } else {
        index
    }
}

impl TripPlanState {
    /// Build a state from its structural parts, deriving the plan.
    pub fn assemble(
        stops: Vec<Stop>,
        nights: Vec<u32>,
        sectors: Sectors,
        has_end_anchor: bool,
        start_date: NaiveDate,
    ) -> Self {
        let stop_details = vec![StopDetail::default(); stops.len()];
        Self {
            stops,
            nights,
            sectors,
            has_end_anchor,
            start_date,
            end_date: None,
            plan: Vec::new(),
            day_meta: Vec::new(),
            stop_details,
            day_details: Vec::new(),
            expanded: BTreeSet::new(),
        }
        .rebuild()
    }

    fn rebuild(mut self) -> Self {
        let names = self.route_stops();
        self.plan = build_plan(&names[..], &self.nights, self.start_date);
        self.day_meta = build_day_stop_meta(&names[..], &self.nights);
        self.end_date = derive_end_date(&self.plan, self.sectors.end);
        self
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Stop names in route order.
    pub fn route_stops(&self) -> Vec<String> {
        self.stops.iter().map(|stop| stop.name.clone()).collect()
    }

    pub fn nights(&self) -> &[u32] {
        &self.nights
    }

    pub fn total_nights(&self) -> u32 {
        self.nights.iter().sum()
    }

    pub fn sectors(&self) -> Sectors {
        self.sectors
    }

    /// Sector of the stop at `index`.
    pub fn sector_at(&self, index: usize) -> SectorType {
        self.sectors.at(index, self.stops.len())
    }

    pub fn has_end_anchor(&self) -> bool {
        self.has_end_anchor
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn plan(&self) -> &[TripDay] {
        &self.plan
    }

    pub fn day_meta(&self) -> &[DayStopMeta] {
        &self.day_meta
    }

    pub fn stop_details(&self) -> &[StopDetail] {
        &self.stop_details
    }

    pub fn day_details(&self) -> &[DayDetail] {
        &self.day_details
    }

    pub fn expanded(&self) -> &BTreeSet<usize> {
        &self.expanded
    }

    /// Days that belong to the stop at `index`.
    pub fn days_for_stop(&self, index: usize) -> Vec<&TripDay> {
        self.plan
            .iter()
            .zip(&self.day_meta)
            .filter(|(_, meta)| meta.stop_index == index)
            .map(|(day, _)| day)
            .collect()
    }

    /// Coordinate-resolved stops in route order, as sent to the leg service.
    pub fn map_points(&self) -> Vec<Place> {
        self.stops.iter().filter_map(Stop::to_place).collect()
    }

    /// Apply `edit`, returning the new state or the unchanged state and the reason.
    pub fn apply(&self, edit: Edit) -> Applied {
        debug!(?edit, "applying edit");
        let result = match edit {
            Edit::ChangeNights { index, nights } => self.change_nights(index, nights),
            Edit::RemoveStop { index } => self.remove_stop(index),
            Edit::InsertStop { after, stop } => self.insert_stop(after, stop),
            Edit::ReorderStop { from, to } => self.reorder_stop(from, to),
            Edit::ConvertSector { endpoint, to } => self.convert_sector(endpoint, to),
            Edit::AnnotateStop { index, note } => self.annotate_stop(index, note),
            Edit::AnnotateDay { day_number, note } => self.annotate_day(day_number, note),
            Edit::ToggleExpanded { index } => self.toggle_expanded(index),
        }
        .and_then(|next| next.check_length().map(|()| next));

        match result {
            Ok(state) => Applied {
                state: state.rebuild(),
                rejection: None,
            },
            Err(rejection) => {
                warn!(%rejection, "edit rejected");
                Applied {
                    state: self.clone(),
                    rejection: Some(rejection),
                }
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), Rejection> {
        if index >= self.stops.len() {
            return Err(Rejection::OutOfRange {
                index,
                len: self.stops.len(),
            });
        }
        Ok(())
    }

    /// The plan's last day must exist and stay within [`MAX_TRIP_NIGHTS`].
    fn check_length(&self) -> Result<(), Rejection> {
        let total: u64 = self.nights.iter().map(|&n| u64::from(n)).sum();
        let last_day = self
            .start_date
            .checked_add_days(Days::new(total.saturating_sub(1)));
        if total > u64::from(MAX_TRIP_NIGHTS) || last_day.is_none() {
            return Err(Rejection::TripTooLong { nights: total });
        }
        Ok(())
    }

    fn change_nights(&self, index: usize, nights: i64) -> Result<Self, Rejection> {
        self.check_index(index)?;
        if self.sector_at(index).is_road() {
            return Err(Rejection::RoadSector { index });
        }

        let requested = nights.max(1);
        let nights = u32::try_from(requested)
            .ok()
            .filter(|&n| n <= MAX_TRIP_NIGHTS)
            .ok_or(Rejection::TripTooLong {
                nights: requested.unsigned_abs(),
            })?;
        let mut next = self.clone();
        next.nights[index] = nights;
        next.day_details
            .retain(|detail| detail.stop_index != index || detail.day_offset < nights);
        Ok(next)
    }

    fn remove_stop(&self, index: usize) -> Result<Self, Rejection> {
        self.check_index(index)?;
        if index == 0 || index == self.stops.len() - 1 {
            return Err(Rejection::AnchorPosition { index });
        }
        let remaining: u32 = self
            .nights
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, n)| *n)
            .sum();
        if remaining == 0 {
            return Err(Rejection::LastOvernightStop);
        }

        let mut next = self.clone();
        next.stops.remove(index);
        next.nights.remove(index);
        next.stop_details.remove(index);
        next.day_details.retain(|detail| detail.stop_index != index);
        for detail in &mut next.day_details {
            if detail.stop_index > index {
                detail.stop_index -= 1;
            }
        }
        next.expanded = self
            .expanded
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        Ok(next)
    }

    fn insert_stop(&self, after: usize, stop: Stop) -> Result<Self, Rejection> {
        self.check_index(after)?;
        if after == self.stops.len() - 1 {
            return Err(Rejection::AnchorPosition { index: after });
        }

        let at = after + 1;
        let mut next = self.clone();
        next.stops.insert(at, stop);
        next.nights.insert(at, 1);
        next.stop_details.insert(at, StopDetail::default());
        for detail in &mut next.day_details {
            if detail.stop_index >= at {
                detail.stop_index += 1;
            }
        }
        next.expanded = self
            .expanded
            .iter()
            .map(|&i| if i >= at { i + 1 } else { i })
            .collect();
        Ok(next)
    }

    fn reorder_stop(&self, from: usize, to: usize) -> Result<Self, Rejection> {
        let len = self.stops.len();
        if len < 3 {
            return Err(Rejection::NoInteriorStops);
        }
        let from = from.clamp(1, len - 2);
        let to = to.clamp(1, len - 2);
        if from == to {
            return Err(Rejection::Unchanged);
        }

        // Anchors keep their positions; a round trip's anchors share a name.
        let last = len - 1;
        let expanded_names: HashSet<String> = self
            .expanded
            .iter()
            .filter(|&&i| i != 0 && i != last)
            .filter_map(|&i| self.stops.get(i))
            .map(|stop| stop.name.clone())
            .collect();

        let mut next = self.clone();
        let stop = next.stops.remove(from);
        next.stops.insert(to, stop);
        let nights = next.nights.remove(from);
        next.nights.insert(to, nights);
        let detail = next.stop_details.remove(from);
        next.stop_details.insert(to, detail);
        for detail in &mut next.day_details {
            detail.stop_index = moved_index(detail.stop_index, from, to);
        }
        let anchors = self.expanded.iter().copied().filter(|&i| i == 0 || i == last);
        let interior = (1..last).filter(|&i| expanded_names.contains(&next.stops[i].name));
        next.expanded = anchors.chain(interior).collect();
        Ok(next)
    }

    fn convert_sector(&self, endpoint: Endpoint, to: SectorType) -> Result<Self, Rejection> {
        let len = self.stops.len();
        let index = endpoint_index(endpoint, len).ok_or(Rejection::OutOfRange { index: 0, len })?;
        if self.sector_at(index) == to {
            return Err(Rejection::Unchanged);
        }

        let mut next = self.clone();
        match to {
            SectorType::Itinerary => {
                next.nights[index] = next.nights[index].max(1);
            }
            SectorType::Road => {
                let others: u32 = self
                    .nights
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, n)| *n)
                    .sum();
                if others == 0 {
                    return Err(Rejection::LastOvernightStop);
                }
                next.nights[index] = 0;
                next.day_details.retain(|detail| detail.stop_index != index);
            }
        }
        next.sectors.set(endpoint, to);
        if len == 1 {
            next.sectors.start = to;
            next.sectors.end = to;
        }
        Ok(next)
    }

    fn annotate_stop(&self, index: usize, note: Option<String>) -> Result<Self, Rejection> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.stop_details[index].note = note;
        Ok(next)
    }

    fn annotate_day(&self, day_number: u32, note: Option<String>) -> Result<Self, Rejection> {
        let Some((position, meta)) = (day_number as usize)
            .checked_sub(1)
            .and_then(|p| self.day_meta.get(p).map(|meta| (p, meta)))
        else {
            return Err(Rejection::UnknownDay { day_number });
        };
        let day_offset = self.day_meta[..position]
            .iter()
            .filter(|m| m.stop_index == meta.stop_index)
            .count() as u32;

        let mut next = self.clone();
        next.day_details
            .retain(|d| !(d.stop_index == meta.stop_index && d.day_offset == day_offset));
        if let Some(note) = note {
            next.day_details.push(DayDetail {
                stop_index: meta.stop_index,
                day_offset,
                note,
            });
            next.day_details
                .sort_by_key(|d| (d.stop_index, d.day_offset));
        }
        Ok(next)
    }

    fn toggle_expanded(&self, index: usize) -> Result<Self, Rejection> {
        self.check_index(index)?;
        let mut next = self.clone();
        if !next.expanded.remove(&index) {
            next.expanded.insert(index);
        }
        Ok(next)
    }

    /// Structural consistency of a state restored from storage.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let len = self.stops.len();
        if self.nights.len() != len {
            return Err(format!("{} stops but {} night counts", len, self.nights.len()));
        }
        if self.stop_details.len() != len {
            return Err(format!("{} stops but {} stop details", len, self.stop_details.len()));
        }
        let total = self.total_nights() as usize;
        if self.plan.len() != total || self.day_meta.len() != total {
            return Err(format!(
                "{} nights but {} days and {} day links",
                total,
                self.plan.len(),
                self.day_meta.len()
            ));
        }
        for (position, (day, meta)) in self.plan.iter().zip(&self.day_meta).enumerate() {
            if day.day_number as usize != position + 1 {
                return Err(format!("day {} numbered {}", position + 1, day.day_number));
            }
            if meta.stop_index >= len {
                return Err(format!("day {} links to missing stop {}", day.day_number, meta.stop_index));
            }
        }
        if let Some(&index) = self.expanded.iter().find(|&&i| i >= len) {
            return Err(format!("expanded stop {} out of range", index));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_index_forward() {
        // [a, b, c, d, e] move 1 -> 3 gives [a, c, d, b, e]
        assert_eq!(moved_index(1, 1, 3), 3);
        assert_eq!(moved_index(2, 1, 3), 1);
        assert_eq!(moved_index(3, 1, 3), 2);
        assert_eq!(moved_index(4, 1, 3), 4);
        assert_eq!(moved_index(0, 1, 3), 0);
    }

    #[test]
    fn test_moved_index_backward() {
        // [a, b, c, d, e] move 3 -> 1 gives [a, d, b, c, e]
        assert_eq!(moved_index(3, 3, 1), 1);
        assert_eq!(moved_index(1, 3, 1), 2);
        assert_eq!(moved_index(2, 3, 1), 3);
        assert_eq!(moved_index(4, 3, 1), 4);
    }

    #[test]
    fn test_assemble_derives_plan() {
        let stops = vec![
            Stop::unresolved("Start"),
            Stop::unresolved("Middle"),
            Stop::unresolved("End"),
        ];
        let sectors = Sectors {
            start: SectorType::Road,
            end: SectorType::Itinerary,
        };
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date");
        let state = TripPlanState::assemble(stops, vec![0, 2, 1], sectors, true, start);

        assert_eq!(state.plan().len(), 3);
        assert_eq!(state.day_meta().len(), 3);
        assert_eq!(state.end_date(), NaiveDate::from_ymd_opt(2025, 5, 3));
        assert!(state.check_consistency().is_ok());
    }
}
