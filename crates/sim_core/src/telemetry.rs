//! Telemetry: the per-vehicle payload published every tick, plus fleet-level counters.

use bevy_ecs::prelude::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ecs::VehicleState;
use crate::spatial::Coordinate;
use crate::vehicle::Vehicle;

/// Rounds to 2 decimals, the precision of every published float metric.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One vehicle's state as published to the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    pub vehicle_id: String,
    pub province: String,
    pub trip_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub current_location: Coordinate,
    pub vehicle_state: VehicleState,
    pub current_passengers: u8,
    #[serde(rename = "speedKPH")]
    pub speed_kph: f64,
    pub orientation_degrees: f64,
    pub fuel_percentage: f64,
    pub predicted_destination: Option<Coordinate>,
    pub kilometers_remaining_trip: f64,
    pub estimated_time_remaining_minutes: f64,
}

impl VehicleSnapshot {
    pub fn from_vehicle(vehicle: &Vehicle, timestamp: DateTime<Utc>) -> Self {
        Self {
            vehicle_id: vehicle.id().to_string(),
            province: vehicle.province().to_string(),
            trip_id: vehicle.trip_id().map(str::to_string),
            timestamp,
            current_location: vehicle.location(),
            vehicle_state: vehicle.state(),
            current_passengers: vehicle.passengers(),
            speed_kph: round2(vehicle.speed_kph()),
            orientation_degrees: round2(vehicle.heading_degrees()),
            fuel_percentage: round2(vehicle.fuel_percent()),
            predicted_destination: vehicle.destination(),
            kilometers_remaining_trip: round2(vehicle.km_remaining()),
            estimated_time_remaining_minutes: round2(vehicle.eta_minutes()),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Vehicles per lifecycle state, as of the last published tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Resource)]
pub struct FleetCounts {
    pub available: usize,
    pub in_trip: usize,
    pub paused: usize,
    pub out_of_service: usize,
}

impl FleetCounts {
    pub fn add(&mut self, state: VehicleState) {
        match state {
            VehicleState::Available => self.available += 1,
            VehicleState::InTrip => self.in_trip += 1,
            VehicleState::Paused => self.paused += 1,
            VehicleState::OutOfService => self.out_of_service += 1,
        }
    }

    pub fn get(&self, state: VehicleState) -> usize {
        match state {
            VehicleState::Available => self.available,
            VehicleState::InTrip => self.in_trip,
            VehicleState::Paused => self.paused,
            VehicleState::OutOfService => self.out_of_service,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.in_trip + self.paused + self.out_of_service
    }
}

/// Running publish counters. Failed sends are counted, never retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Resource)]
pub struct PublishStats {
    pub sent: u64,
    pub failed: u64,
}
