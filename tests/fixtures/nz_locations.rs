//! Real New Zealand town coordinates for planner fixtures.
//!
//! None of these are in the built-in catalog, so tests can decide whether
//! they resolve through supplied coordinates, a resolver, or not at all.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// North Island
// ============================================================================

pub const NORTH_ISLAND: &[Location] = &[
    Location::new("Paihia", -35.2820, 174.0910),
    Location::new("Whangarei", -35.7251, 174.3237),
    Location::new("Thames", -37.1383, 175.5403),
    Location::new("Whitianga", -36.8331, 175.6997),
    Location::new("Waitomo", -38.2610, 175.1030),
    Location::new("Gisborne", -38.6623, 178.0176),
    Location::new("Whanganui", -39.9301, 175.0479),
    Location::new("Martinborough", -41.2180, 175.4590),
];

// ============================================================================
// South Island
// ============================================================================

pub const SOUTH_ISLAND: &[Location] = &[
    Location::new("Blenheim", -41.5138, 173.9612),
    Location::new("Westport", -41.7545, 171.6042),
    Location::new("Greymouth", -42.4504, 171.2108),
    Location::new("Franz Josef", -43.3890, 170.1830),
    Location::new("Haast", -43.8810, 169.0420),
    Location::new("Te Anau", -45.4145, 167.7180),
    Location::new("Invercargill", -46.4132, 168.3538),
    Location::new("Oamaru", -45.0966, 170.9714),
    Location::new("Akaroa", -43.8036, 172.9683),
];

pub fn find(name: &str) -> &'static Location {
    NORTH_ISLAND
        .iter()
        .chain(SOUTH_ISLAND)
        .find(|loc| loc.name == name)
        .unwrap_or_else(|| panic!("unknown fixture location {name}"))
}
