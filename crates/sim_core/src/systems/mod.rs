pub mod movement;
pub mod telemetry_snapshot;
