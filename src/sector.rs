//! Sector classification for the trip's endpoints.
//!
//! A road endpoint is driven through and gets no nights. An itinerary
//! endpoint is an overnight stop with at least one night.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorType {
    Road,
    Itinerary,
}

impl SectorType {
    pub const fn is_road(self) -> bool {
        matches!(self, Self::Road)
    }
}

/// Which end of the route a sector applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

/// Sector types held for the two endpoints.
///
/// `end` applies to the last route stop: the end anchor when there is one,
/// otherwise the last destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sectors {
    pub start: SectorType,
    pub end: SectorType,
}

impl Sectors {
    pub fn get(&self, endpoint: Endpoint) -> SectorType {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn set(&mut self, endpoint: Endpoint, sector: SectorType) {
        match endpoint {
            Endpoint::Start => self.start = sector,
            Endpoint::End => self.end = sector,
        }
    }

    /// Sector of the stop at `index` in a route of `len` stops.
    /// Interior stops are always itinerary stops.
    pub fn at(&self, index: usize, len: usize) -> SectorType {
        match endpoint_at(index, len) {
            Some(endpoint) => self.get(endpoint),
            None => SectorType::Itinerary,
        }
    }

    /// Road mask over a route of `len` stops.
    pub fn road_mask(&self, len: usize) -> Vec<bool> {
        (0..len).map(|index| self.at(index, len).is_road()).collect()
    }
}

/// Endpoint occupying `index`, if any. A single-stop route reports `Start`.
pub fn endpoint_at(index: usize, len: usize) -> Option<Endpoint> {
    if len == 0 || index >= len {
        None
    } else if index == 0 {
        Some(Endpoint::Start)
    } else if index == len - 1 {
        Some(Endpoint::End)
    } else {
        None
    }
}

/// Route index of `endpoint` in a route of `len` stops.
pub fn endpoint_index(endpoint: Endpoint, len: usize) -> Option<usize> {
    match (endpoint, len) {
        (_, 0) => None,
        (Endpoint::Start, _) => Some(0),
        (Endpoint::End, len) => Some(len - 1),
    }
}

/// Default endpoint sectors for a freshly submitted trip.
///
/// | has end | round trip | stops | start | end |
/// |---|---|---|---|---|
/// | no | - | any | road | itinerary (last destination) |
/// | yes | yes | 2 | itinerary | road |
/// | yes | yes | >2 | road | road |
/// | yes | no | any | road | itinerary |
///
/// A round trip with nothing in between would otherwise have no stop to
/// spend nights at, so its start becomes the home base. A lone stop is both
/// endpoints and always itinerary. Interior stops are always itinerary.
pub fn classify(has_end: bool, round_trip: bool, stop_count: usize) -> Sectors {
    match (has_end, round_trip, stop_count) {
        (_, _, 0..=1) => Sectors {
            start: SectorType::Itinerary,
            end: SectorType::Itinerary,
        },
        (false, _, _) | (true, false, _) => Sectors {
            start: SectorType::Road,
            end: SectorType::Itinerary,
        },
        (true, true, 2) => Sectors {
            start: SectorType::Itinerary,
            end: SectorType::Road,
        },
        (true, true, _) => Sectors {
            start: SectorType::Road,
            end: SectorType::Road,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_end_city() {
        for count in [2, 3, 6] {
            let sectors = classify(false, false, count);
            assert_eq!(sectors.start, SectorType::Road);
            assert_eq!(sectors.end, SectorType::Itinerary);
        }
    }

    #[test]
    fn test_round_trip_is_road_both_ends() {
        for count in [3, 5] {
            let sectors = classify(true, true, count);
            assert_eq!(sectors.start, SectorType::Road);
            assert_eq!(sectors.end, SectorType::Road);
        }
    }

    #[test]
    fn test_round_trip_without_waypoints_stays_at_home() {
        let sectors = classify(true, true, 2);
        assert_eq!(sectors.start, SectorType::Itinerary);
        assert_eq!(sectors.end, SectorType::Road);
        assert_eq!(sectors.road_mask(2), vec![false, true]);
    }

    #[test]
    fn test_one_way_trip() {
        for count in [2, 4] {
            let sectors = classify(true, false, count);
            assert_eq!(sectors.start, SectorType::Road);
            assert_eq!(sectors.end, SectorType::Itinerary);
        }
    }

    #[test]
    fn test_single_stop_holds_nights() {
        let sectors = classify(false, false, 1);
        assert_eq!(sectors.start, SectorType::Itinerary);
    }

    #[test]
    fn test_interior_stops_are_itinerary() {
        let sectors = classify(true, true, 4);
        assert_eq!(sectors.road_mask(4), vec![true, false, false, true]);
    }

    #[test]
    fn test_endpoint_positions() {
        assert_eq!(endpoint_at(0, 3), Some(Endpoint::Start));
        assert_eq!(endpoint_at(1, 3), None);
        assert_eq!(endpoint_at(2, 3), Some(Endpoint::End));
        assert_eq!(endpoint_at(3, 3), None);
        assert_eq!(endpoint_index(Endpoint::End, 4), Some(3));
        assert_eq!(endpoint_index(Endpoint::Start, 0), None);
    }
}
