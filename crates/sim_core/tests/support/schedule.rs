use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sim_core::runner::{fleet_schedule, run_tick};

/// Helper that owns a reusable `Schedule` and steps the fleet on a fake clock,
/// one simulated second per tick.
pub struct TickRunner {
    schedule: Schedule,
    now: DateTime<Utc>,
}

impl Default for TickRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TickRunner {
    /// Create a runner with the default fleet schedule.
    pub fn new() -> Self {
        Self {
            schedule: fleet_schedule(),
            now: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    /// Run a single tick.
    pub fn run_one(&mut self, world: &mut World) {
        self.now += Duration::seconds(1);
        run_tick(world, &mut self.schedule, self.now);
    }

    /// Run `ticks` ticks.
    pub fn run(&mut self, world: &mut World, ticks: usize) {
        for _ in 0..ticks {
            self.run_one(world);
        }
    }

    /// Timestamp of the last tick that ran.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
