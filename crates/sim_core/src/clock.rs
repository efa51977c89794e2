use bevy_ecs::prelude::Resource;
use chrono::{DateTime, Utc};

/// Tick counter and the wall-clock timestamp stamped on the current tick's payloads.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct SimulationClock {
    ticks: u64,
    now: DateTime<Utc>,
}

impl SimulationClock {
    /// Number of completed or in-progress ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Starts the next tick at `now`.
    pub fn begin_tick(&mut self, now: DateTime<Utc>) {
        self.ticks += 1;
        self.now = now;
    }
}

/// How much simulated time one tick represents.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct TickConfig {
    pub sim_seconds_per_tick: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            sim_seconds_per_tick: 1.0,
        }
    }
}
