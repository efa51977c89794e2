//! Publishing system: serializes every vehicle after the lifecycle update and
//! forwards it keyed by vehicle id.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{debug, warn};

use crate::clock::SimulationClock;
use crate::error::PublishError;
use crate::publisher::PublisherResource;
use crate::telemetry::{FleetCounts, PublishStats};
use crate::vehicle::Vehicle;

pub fn publish_snapshots_system(
    clock: Res<SimulationClock>,
    mut publisher: ResMut<PublisherResource>,
    mut stats: ResMut<PublishStats>,
    mut counts: ResMut<FleetCounts>,
    vehicles: Query<&Vehicle>,
) {
    let now = clock.now();
    let mut tick_counts = FleetCounts::default();

    for vehicle in vehicles.iter() {
        tick_counts.add(vehicle.state());

        let result = vehicle
            .snapshot(now)
            .to_json()
            .map_err(PublishError::from)
            .and_then(|payload| publisher.0.send(vehicle.id(), &payload));
        match result {
            Ok(()) => stats.sent += 1,
            Err(error) => {
                stats.failed += 1;
                warn!(vehicle_id = %vehicle.id(), %error, "failed to publish vehicle state");
            }
        }
    }

    debug!(
        tick = clock.ticks(),
        available = tick_counts.available,
        in_trip = tick_counts.in_trip,
        paused = tick_counts.paused,
        out_of_service = tick_counts.out_of_service,
        "tick published"
    );
    *counts = tick_counts;
}
