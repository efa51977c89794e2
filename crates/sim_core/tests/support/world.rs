use bevy_ecs::prelude::World;
use sim_core::poi::PoiCatalog;
use sim_core::publisher::PublisherResource;
use sim_core::random::RandomSource;
use sim_core::scenario::{build_fleet, build_fleet_with_rng, FleetParams};
use sim_core::test_helpers::{test_catalog, MemoryPublisher, TEST_PROVINCE};
use sim_core::vehicle::Vehicle;

/// Builder for fleet worlds wired to an in-memory publisher.
pub struct TestFleetBuilder {
    params: FleetParams,
    catalog: PoiCatalog,
    rng: Option<Box<dyn RandomSource>>,
    publisher: MemoryPublisher,
    initial_fuel: Option<f64>,
    out_of_service: Option<(usize, f64)>,
}

impl Default for TestFleetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFleetBuilder {
    /// Five vehicles in the test province, seed 42.
    pub fn new() -> Self {
        Self {
            params: FleetParams::default()
                .with_province(TEST_PROVINCE, 5)
                .with_seed(42),
            catalog: test_catalog(),
            rng: None,
            publisher: MemoryPublisher::new(),
            initial_fuel: None,
            out_of_service: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params = self.params.with_seed(seed);
        self
    }

    pub fn with_vehicles(mut self, vehicles: usize) -> Self {
        self.params = self.params.with_province(TEST_PROVINCE, vehicles);
        self
    }

    pub fn with_params(mut self, params: FleetParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_catalog(mut self, catalog: PoiCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the seeded RNG with a scripted source.
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_publisher(mut self, publisher: MemoryPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Override every vehicle's starting fuel level.
    pub fn with_initial_fuel(mut self, fuel_percent: f64) -> Self {
        self.initial_fuel = Some(fuel_percent);
        self
    }

    /// Start the first `count` vehicles out of service with `fuel_percent` fuel.
    pub fn with_out_of_service(mut self, count: usize, fuel_percent: f64) -> Self {
        self.out_of_service = Some((count, fuel_percent));
        self
    }

    /// Build the world and return it with a handle onto the publisher's log.
    pub fn build(self) -> (World, MemoryPublisher) {
        let mut world = World::new();
        match self.rng {
            Some(rng) => build_fleet_with_rng(&mut world, &self.params, &self.catalog, rng),
            None => build_fleet(&mut world, &self.params, &self.catalog),
        }
        .expect("fleet builds");

        let mut fleet = world.query::<&mut Vehicle>();
        for (i, mut vehicle) in fleet.iter_mut(&mut world).enumerate() {
            if let Some(fuel) = self.initial_fuel {
                vehicle.set_fuel(fuel);
            }
            if let Some((count, fuel)) = self.out_of_service {
                if i < count {
                    vehicle.set_fuel(fuel);
                    vehicle.break_down();
                }
            }
        }
        world.insert_resource(PublisherResource(Box::new(self.publisher.clone())));
        (world, self.publisher)
    }
}

/// Snapshot of every vehicle in spawn order.
pub fn vehicles(world: &mut World) -> Vec<Vehicle> {
    world.query::<&Vehicle>().iter(world).cloned().collect()
}
