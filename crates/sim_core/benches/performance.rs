//! Performance benchmarks for sim_core using Criterion.rs.

use bevy_ecs::prelude::World;
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sim_core::publisher::PublisherResource;
use sim_core::runner::{fleet_schedule, run_tick};
use sim_core::scenario::{build_fleet, FleetParams};
use sim_core::spatial::{distance_km, interpolate_route};
use sim_core::test_helpers::{north_of, test_catalog, TEST_ORIGIN, TEST_PROVINCE};

fn bench_fleet_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("fleet_tick");
    for vehicles in [50usize, 500, 2_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(vehicles),
            &vehicles,
            |b, &vehicles| {
                let mut world = World::new();
                let params = FleetParams::default()
                    .with_province(TEST_PROVINCE, vehicles)
                    .with_seed(42);
                build_fleet(&mut world, &params, &test_catalog()).expect("fleet");
                world.insert_resource(PublisherResource(Box::new(NullPublisher)));
                let mut schedule = fleet_schedule();
                let now = Utc::now();

                b.iter(|| run_tick(&mut world, &mut schedule, black_box(now)));
            },
        );
    }
    group.finish();
}

fn bench_geo_math(c: &mut Criterion) {
    let destination = north_of(TEST_ORIGIN, 12.0);
    c.bench_function("distance_km", |b| {
        b.iter(|| distance_km(black_box(TEST_ORIGIN), black_box(destination)))
    });
    c.bench_function("interpolate_route_1200_steps", |b| {
        b.iter(|| interpolate_route(black_box(TEST_ORIGIN), black_box(destination), 1_200))
    });
}

/// Drops every message; isolates update and serialization cost.
struct NullPublisher;

impl sim_core::publisher::Publisher for NullPublisher {
    fn send(&mut self, _key: &str, payload: &[u8]) -> Result<(), sim_core::error::PublishError> {
        black_box(payload);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), sim_core::error::PublishError> {
        Ok(())
    }
}

criterion_group!(benches, bench_fleet_tick, bench_geo_math);
criterion_main!(benches);
