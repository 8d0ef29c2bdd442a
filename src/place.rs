//! Named points and stops.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named geographic point: a trip anchor or a point sent to the leg service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }

    /// Location as (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// An entry in the route. Coordinates are absent for names nothing could resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub location: Option<(f64, f64)>,
}

impl Stop {
    pub fn new(name: impl Into<String>, location: Option<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    pub fn resolved(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::new(name, Some((lat, lng)))
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn to_place(&self) -> Option<Place> {
        self.location
            .map(|(lat, lng)| Place::new(self.name.clone(), lat, lng))
    }
}

impl From<Place> for Stop {
    fn from(place: Place) -> Self {
        Self::resolved(place.name, place.lat, place.lng)
    }
}

/// Externally supplied name → coordinate map (e.g. places picked from search).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownCoords(HashMap<String, (f64, f64)>);

impl KnownCoords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, lat: f64, lng: f64) {
        self.0.insert(name.into(), (lat, lng));
    }

    /// Exact key match first, then a case-insensitive match on trimmed names.
    pub fn get(&self, name: &str) -> Option<(f64, f64)> {
        if let Some(coords) = self.0.get(name) {
            return Some(*coords);
        }
        let wanted = normalize_name(name);
        let mut matches: Vec<(&String, &(f64, f64))> = self
            .0
            .iter()
            .filter(|(key, _)| normalize_name(key) == wanted)
            .collect();
        // HashMap order is unstable; pick the lexically smallest key.
        matches.sort_by(|a, b| a.0.cmp(b.0));
        matches.first().map(|(_, coords)| **coords)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, (f64, f64))> for KnownCoords {
    fn from_iter<I: IntoIterator<Item = (S, (f64, f64))>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Case-insensitive comparison key for place names.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Stable identity key for a coordinate pair.
pub fn location_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_coords_exact_then_case_insensitive() {
        let mut known = KnownCoords::new();
        known.insert("Taupo", -38.6857, 176.0702);

        assert_eq!(known.get("Taupo"), Some((-38.6857, 176.0702)));
        assert_eq!(known.get("  taupo "), Some((-38.6857, 176.0702)));
        assert_eq!(known.get("Napier"), None);
    }

    #[test]
    fn test_stop_to_place() {
        let stop = Stop::resolved("Picton", -41.29, 174.0);
        assert_eq!(stop.to_place(), Some(Place::new("Picton", -41.29, 174.0)));
        assert_eq!(Stop::unresolved("Somewhere").to_place(), None);
    }

    #[test]
    fn test_location_key_rounds_to_six_places() {
        assert_eq!(location_key((1.23456789, -2.0)), "1.234568,-2.000000");
    }
}
