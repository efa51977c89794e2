use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default run length: 2 minutes of wall-clock time.
const DEFAULT_DURATION_SECS: u64 = 120;
/// Default pacing: one tick per wall-clock second.
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Fleet composition and run pacing, passed explicitly into the fleet builder
/// and runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetParams {
    /// Province id → number of vehicles. Provinces are built in key order.
    pub vehicles_per_province: BTreeMap<String, usize>,
    pub duration_secs: u64,
    pub tick_interval_ms: u64,
    /// Simulated time per tick; drives how far vehicles travel each tick.
    pub sim_seconds_per_tick: f64,
    /// RNG seed for reproducibility. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            vehicles_per_province: BTreeMap::new(),
            duration_secs: DEFAULT_DURATION_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            sim_seconds_per_tick: 1.0,
            seed: None,
        }
    }
}

impl FleetParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Adds (or replaces) the vehicle count for `province`.
    pub fn with_province(mut self, province: impl Into<String>, vehicles: usize) -> Self {
        self.vehicles_per_province.insert(province.into(), vehicles);
        self
    }

    pub fn with_duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms.max(1);
        self
    }

    pub fn with_sim_seconds_per_tick(mut self, seconds: f64) -> Self {
        self.sim_seconds_per_tick = seconds;
        self
    }

    pub fn total_vehicles(&self) -> usize {
        self.vehicles_per_province.values().sum()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let params = FleetParams::default()
            .with_province("corrientes", 50)
            .with_province("mendoza", 5)
            .with_duration_secs(30)
            .with_tick_interval_ms(250)
            .with_seed(9);

        assert_eq!(params.total_vehicles(), 55);
        assert_eq!(params.duration(), Duration::from_secs(30));
        assert_eq!(params.tick_interval(), Duration::from_millis(250));
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.sim_seconds_per_tick, 1.0);
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let params = FleetParams::default().with_tick_interval_ms(0);
        assert_eq!(params.tick_interval(), Duration::from_millis(1));
    }
}
