//! Collaborator seams for the planning engine.
//!
//! The engine never searches for places or computes road routes itself.
//! Callers plug in implementations of these traits.

use crate::error::LegError;
use crate::legs::DriveLeg;
use crate::place::{KnownCoords, Place};

/// Resolves a free-text place name to at most one coordinate record.
///
/// Exact or fuzzy matching is the implementor's concern.
pub trait CoordinateResolver {
    fn resolve(&self, query: &str) -> Option<Place>;
}

/// Provides one drive leg per consecutive pair of an ordered point sequence.
pub trait DriveLegProvider {
    fn legs_for(&self, points: &[Place]) -> Result<Vec<DriveLeg>, LegError>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl CoordinateResolver for NoResolver {
    fn resolve(&self, _query: &str) -> Option<Place> {
        None
    }
}

impl CoordinateResolver for KnownCoords {
    fn resolve(&self, query: &str) -> Option<Place> {
        self.get(query)
            .map(|(lat, lng)| Place::new(query.trim(), lat, lng))
    }
}
