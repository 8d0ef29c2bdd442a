//! Persistence bundle.
//!
//! The bundle is the authoritative saved form of a plan. Restoring it gives
//! back the exact state that was saved; nothing is recomputed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BundleError;
use crate::place::Place;
use crate::state::TripPlanState;

pub const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanBundle {
    pub version: u32,
    pub state: TripPlanState,
    /// Map points at save time, for consumers that only draw the route.
    pub map_points: Vec<Place>,
}

impl PlanBundle {
    pub fn from_state(state: &TripPlanState) -> Self {
        Self {
            version: BUNDLE_VERSION,
            state: state.clone(),
            map_points: state.map_points(),
        }
    }

    /// Restore the saved state after a structural consistency check.
    pub fn into_state(self) -> Result<TripPlanState, BundleError> {
        if self.version != BUNDLE_VERSION {
            return Err(BundleError::UnsupportedVersion(self.version));
        }
        self.state
            .check_consistency()
            .map_err(BundleError::Inconsistent)?;
        debug!(stops = self.state.stops().len(), days = self.state.plan().len(), "restored plan bundle");
        Ok(self.state)
    }

    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(json)?)
    }
}
