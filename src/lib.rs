//! trip-planner engine
//!
//! Orders waypoints between fixed anchors, spreads nights across stops, and
//! keeps a dated day-by-day plan consistent under edits.

pub mod traits;
pub mod place;
pub mod catalog;
pub mod haversine;
pub mod sequencer;
pub mod nights;
pub mod day_plan;
pub mod sector;
pub mod state;
pub mod legs;
pub mod osrm;
pub mod bundle;
pub mod config;
pub mod error;
