//! Scenario setup: fleet composition, tick pacing and the ECS resources a run needs.
//!
//! Vehicles are spawned per province at random POIs of that province; the
//! random source is seeded from the parameters so runs can be replayed.

mod build;
mod params;

pub use build::{build_fleet, build_fleet_with_rng};
pub use params::FleetParams;
