pub mod clock;
pub mod ecs;
pub mod error;
pub mod poi;
pub mod publisher;
pub mod random;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod spatial;
pub mod systems;
pub mod telemetry;
pub mod vehicle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
