//! Fleet runner: advances all vehicles in lockstep, one tick per interval.
//!
//! Each tick stamps [`SimulationClock`], then runs the schedule: the lifecycle
//! system updates every vehicle, then the publishing system serializes and
//! forwards each one. [`run_realtime`] paces ticks against wall-clock time and
//! stops on the configured duration or on cancellation.

use std::time::Duration;

use bevy_ecs::prelude::{IntoSystemConfigs, Schedule, World};
use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::clock::SimulationClock;
use crate::error::PublishError;
use crate::publisher::PublisherResource;
use crate::scenario::FleetParams;
use crate::systems::movement::vehicle_update_system;
use crate::systems::telemetry_snapshot::publish_snapshots_system;
use crate::telemetry::{FleetCounts, PublishStats};
use crate::vehicle::Vehicle;

/// Wall-clock pacing of a realtime run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    pub duration: Duration,
    pub tick_interval: Duration,
}

impl From<&FleetParams> for RunLimits {
    fn from(params: &FleetParams) -> Self {
        Self {
            duration: params.duration(),
            tick_interval: params.tick_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DurationElapsed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub stop_reason: StopReason,
    pub publish: PublishStats,
    pub final_counts: FleetCounts,
    pub flushed: bool,
}

/// Builds the per-tick schedule: lifecycle update, then publishing.
pub fn fleet_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((vehicle_update_system, publish_snapshots_system).chain());
    schedule
}

/// Runs one tick stamped with `now`.
pub fn run_tick(world: &mut World, schedule: &mut Schedule, now: DateTime<Utc>) {
    world.resource_mut::<SimulationClock>().begin_tick(now);
    schedule.run(world);
}

/// Flushes the publisher resource, if one is installed.
pub fn flush_publisher(world: &mut World) -> Result<(), PublishError> {
    match world.get_resource_mut::<PublisherResource>() {
        Some(mut publisher) => publisher.0.flush(),
        None => Ok(()),
    }
}

/// Ticks once per `limits.tick_interval` until `limits.duration` has elapsed or
/// `cancel` fires, then flushes the publisher.
///
/// The first tick runs immediately. Waiting between ticks is cancellable.
pub async fn run_realtime(
    world: &mut World,
    schedule: &mut Schedule,
    limits: RunLimits,
    cancel: CancellationToken,
) -> RunSummary {
    let vehicles = world.query::<&Vehicle>().iter(world).count();
    info!(
        vehicles,
        duration_secs = limits.duration.as_secs_f64(),
        tick_interval_ms = limits.tick_interval.as_millis() as u64,
        "starting simulation"
    );

    let deadline = tokio::time::sleep(limits.duration);
    tokio::pin!(deadline);
    let mut interval = tokio::time::interval(limits.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = 0u64;
    let stop_reason = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break StopReason::Cancelled,
            _ = &mut deadline => break StopReason::DurationElapsed,
            _ = interval.tick() => {
                run_tick(world, schedule, Utc::now());
                ticks += 1;
            }
        }
    };

    let flushed = match flush_publisher(world) {
        Ok(()) => true,
        Err(error) => {
            error!(%error, "failed to flush publisher");
            false
        }
    };

    let publish = *world.resource::<PublishStats>();
    let final_counts = *world.resource::<FleetCounts>();
    info!(
        ticks,
        reason = ?stop_reason,
        sent = publish.sent,
        failed = publish.failed,
        "simulation finished"
    );

    RunSummary {
        ticks,
        stop_reason,
        publish,
        final_counts,
        flushed,
    }
}
