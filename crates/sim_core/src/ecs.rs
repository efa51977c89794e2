use serde::{Deserialize, Serialize};

use crate::routing::PlannedRoute;
use crate::spatial::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleState {
    Available,
    InTrip,
    Paused,
    OutOfService,
}

impl VehicleState {
    pub const ALL: [VehicleState; 4] = [
        VehicleState::Available,
        VehicleState::InTrip,
        VehicleState::Paused,
        VehicleState::OutOfService,
    ];
}

/// Trip context; present on a vehicle only while it is `InTrip`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrip {
    pub trip_id: String,
    /// 1..=4
    pub passengers: u8,
    pub destination: Coordinate,
    pub destination_name: String,
    pub route: PlannedRoute,
}
