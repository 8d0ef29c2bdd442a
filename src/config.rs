//! Planner configuration with environment overrides.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::haversine::{HaversineLegs, DEFAULT_SPEED_KMH};
use crate::osrm::OsrmConfig;
use crate::sequencer::SequenceOptions;

pub const ENV_OSRM_URL: &str = "TRIP_PLANNER_OSRM_URL";
pub const ENV_OSRM_PROFILE: &str = "TRIP_PLANNER_OSRM_PROFILE";
pub const ENV_OSRM_TIMEOUT_SECS: &str = "TRIP_PLANNER_OSRM_TIMEOUT_SECS";
pub const ENV_FALLBACK_SPEED_KMH: &str = "TRIP_PLANNER_FALLBACK_SPEED_KMH";
pub const ENV_TWO_OPT_ROUNDS: &str = "TRIP_PLANNER_TWO_OPT_ROUNDS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub osrm: OsrmConfig,
    /// Speed assumed for straight-line fallback legs.
    pub fallback_speed_kmh: f64,
    pub sequence: SequenceOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            fallback_speed_kmh: DEFAULT_SPEED_KMH,
            sequence: SequenceOptions::default(),
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by `TRIP_PLANNER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Defaults overridden by entries of `vars`.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = vars.get(ENV_OSRM_URL) {
            config.osrm.base_url = url.clone();
        }
        if let Some(profile) = vars.get(ENV_OSRM_PROFILE) {
            config.osrm.profile = profile.clone();
        }
        if let Some(value) = vars.get(ENV_OSRM_TIMEOUT_SECS) {
            config.osrm.timeout_secs = parse(ENV_OSRM_TIMEOUT_SECS, value)?;
        }
        if let Some(value) = vars.get(ENV_FALLBACK_SPEED_KMH) {
            let speed: f64 = parse(ENV_FALLBACK_SPEED_KMH, value)?;
            if !speed.is_finite() || speed <= 0.0 {
                return Err(invalid(ENV_FALLBACK_SPEED_KMH, value));
            }
            config.fallback_speed_kmh = speed;
        }
        if let Some(value) = vars.get(ENV_TWO_OPT_ROUNDS) {
            config.sequence.two_opt_rounds = parse(ENV_TWO_OPT_ROUNDS, value)?;
        }

        Ok(config)
    }

    pub fn fallback_legs(&self) -> HaversineLegs {
        HaversineLegs::new(self.fallback_speed_kmh)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = PlannerConfig::from_vars(HashMap::new()).expect("defaults");
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.osrm.profile, "car");
        assert_eq!(config.sequence.two_opt_rounds, 0);
    }

    #[test]
    fn test_overrides_applied() {
        let config = PlannerConfig::from_vars(vars(&[
            (ENV_OSRM_URL, "http://osrm:5000"),
            (ENV_OSRM_TIMEOUT_SECS, " 3 "),
            (ENV_FALLBACK_SPEED_KMH, "65.5"),
            (ENV_TWO_OPT_ROUNDS, "4"),
        ]))
        .expect("valid overrides");

        assert_eq!(config.osrm.base_url, "http://osrm:5000");
        assert_eq!(config.osrm.timeout_secs, 3);
        assert_eq!(config.fallback_legs().speed_kmh, 65.5);
        assert_eq!(config.sequence.two_opt_rounds, 4);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = PlannerConfig::from_vars(vars(&[(ENV_OSRM_TIMEOUT_SECS, "soon")]))
            .expect_err("invalid timeout");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_OSRM_TIMEOUT_SECS.to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        assert!(PlannerConfig::from_vars(vars(&[(ENV_FALLBACK_SPEED_KMH, "0")])).is_err());
    }
}
