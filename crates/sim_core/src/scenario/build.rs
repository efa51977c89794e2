use bevy_ecs::prelude::World;
use tracing::{info, warn};

use crate::clock::{SimulationClock, TickConfig};
use crate::error::SimError;
use crate::poi::PoiCatalog;
use crate::random::{RandomSource, SeededRandom, SimRng};
use crate::scenario::params::FleetParams;
use crate::telemetry::{FleetCounts, PublishStats};
use crate::vehicle::Vehicle;

/// Populates `world` with the fleet described by `params`, seeding the RNG
/// from `params.seed`. Returns the number of vehicles spawned.
///
/// The caller inserts the [`crate::publisher::PublisherResource`].
pub fn build_fleet(
    world: &mut World,
    params: &FleetParams,
    catalog: &PoiCatalog,
) -> Result<usize, SimError> {
    build_fleet_with_rng(
        world,
        params,
        catalog,
        Box::new(SeededRandom::new(params.seed)),
    )
}

/// Same as [`build_fleet`] with an explicit random source, which stays in the
/// world as [`SimRng`] and drives the run.
pub fn build_fleet_with_rng(
    world: &mut World,
    params: &FleetParams,
    catalog: &PoiCatalog,
    mut rng: Box<dyn RandomSource>,
) -> Result<usize, SimError> {
    let mut spawned = 0;
    for (province, &count) in &params.vehicles_per_province {
        if catalog.get(province).is_none() {
            warn!(province = %province, "no POIs loaded for province, no vehicles created");
            continue;
        }
        for _ in 0..count {
            let id = rng.random_id().to_string();
            let vehicle = Vehicle::new(id, province, catalog, rng.as_mut())?;
            world.spawn(vehicle);
            spawned += 1;
        }
    }

    if spawned == 0 {
        return Err(SimError::EmptyFleet);
    }

    world.insert_resource(SimRng(rng));
    world.insert_resource(TickConfig {
        sim_seconds_per_tick: params.sim_seconds_per_tick,
    });
    world.insert_resource(SimulationClock::default());
    world.insert_resource(FleetCounts::default());
    world.insert_resource(PublishStats::default());

    info!(
        vehicles = spawned,
        provinces = params.vehicles_per_province.len(),
        "fleet built"
    );
    Ok(spawned)
}
