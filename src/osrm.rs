//! OSRM HTTP adapter for drive legs.

use serde::{Deserialize, Serialize};

use crate::error::LegError;
use crate::legs::DriveLeg;
use crate::place::Place;
use crate::traits::DriveLegProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Route service URL for `points`, in OSRM's lng,lat order.
    pub fn route_url(&self, points: &[Place]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DriveLegProvider for OsrmClient {
    fn legs_for(&self, points: &[Place]) -> Result<Vec<DriveLeg>, LegError> {
        if points.len() < 2 {
            return Ok(Vec::new());
        }

        let body = self
            .client
            .get(self.route_url(points))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        legs_from_response(body, points)
    }
}

fn legs_from_response(body: OsrmRouteResponse, points: &[Place]) -> Result<Vec<DriveLeg>, LegError> {
    if body.code != "Ok" {
        return Err(LegError::Malformed(format!("OSRM returned code {}", body.code)));
    }
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| LegError::Malformed("OSRM returned no routes".to_string()))?;

    Ok(route
        .legs
        .into_iter()
        .zip(points.windows(2))
        .map(|(leg, pair)| DriveLeg {
            from: pair[0].name.clone(),
            to: pair[1].name.clone(),
            distance_km: leg.distance / 1000.0,
            drive_hours: leg.duration / 3600.0,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}
