//! Lifecycle system: advances every vehicle by one tick.
//!
//! Vehicles are visited sequentially in spawn order and share the fleet's
//! random source, so a seeded run replays identically.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::TickConfig;
use crate::random::SimRng;
use crate::vehicle::Vehicle;

pub fn vehicle_update_system(
    tick: Res<TickConfig>,
    mut rng: ResMut<SimRng>,
    mut vehicles: Query<&mut Vehicle>,
) {
    let rng = rng.0.as_mut();
    for mut vehicle in vehicles.iter_mut() {
        vehicle.update(rng, tick.sim_seconds_per_tick);
    }
}
