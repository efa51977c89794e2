//! Vehicle lifecycle: availability, trip assignment, motion, refueling and breakdown.
//!
//! A [`Vehicle`] advances exactly once per tick through [`Vehicle::update`]:
//!
//! | From | Condition | To |
//! |---|---|---|
//! | Available | draw < 0.05 and fuel < 20 | Paused |
//! | Available | draw < 0.05 and fuel >= 20 | InTrip (if a destination qualifies) |
//! | InTrip | remaining < 0.05 km | Available |
//! | InTrip | fuel <= 0 | OutOfService |
//! | Paused | fuel >= 95 after refueling | Available |
//! | OutOfService | fuel > 10 and draw < 0.01 | Available |
//! | OutOfService | fuel <= 10, refuels past 50 | Available |
//!
//! Fuel assistance, once started, continues every tick until the vehicle recovers.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::ecs::{ActiveTrip, VehicleState};
use crate::error::SimError;
use crate::poi::{PoiCatalog, PointOfInterest};
use crate::random::RandomSource;
use crate::routing::PlannedRoute;
use crate::spatial::{distance_km, heading_degrees, Coordinate};
use crate::telemetry::VehicleSnapshot;

/// Destinations closer than this are never assigned.
pub const MIN_TRIP_DISTANCE_KM: f64 = 0.5;
/// A trip ends once the vehicle is this close to its destination.
pub const ARRIVAL_THRESHOLD_KM: f64 = 0.05;
/// Per-tick chance an available vehicle takes a trip (or goes refueling).
pub const TRIP_REQUEST_PROBABILITY: f64 = 0.05;
/// Available vehicles under this fuel level pause to refuel instead of taking trips.
pub const LOW_FUEL_PERCENT: f64 = 20.0;
/// Paused vehicles return to service at this fuel level.
pub const REFUELED_PERCENT: f64 = 95.0;
/// Per-tick chance an out-of-service vehicle with fuel above the stranded level is rescued.
pub const RESCUE_PROBABILITY: f64 = 0.01;
/// At or below this level an out-of-service vehicle receives fuel assistance.
pub const STRANDED_FUEL_PERCENT: f64 = 10.0;
/// Fuel assistance ends once the level exceeds this.
pub const ASSISTED_RECOVERY_PERCENT: f64 = 50.0;

pub const MIN_SPEED_KPH: f64 = 10.0;
pub const MAX_SPEED_KPH: f64 = 120.0;
const INITIAL_SPEED_KPH: (f64, f64) = (30.0, 80.0);
const SPEED_JITTER_KPH: f64 = 1.0;
const FUEL_BURN_PER_TICK: f64 = 0.01;
const REFUEL_PER_TICK: (f64, f64) = (0.5, 2.0);
const ASSISTED_REFUEL_PER_TICK: (f64, f64) = (0.1, 0.5);
const INITIAL_FUEL_PERCENT: (u32, u32) = (70, 100);
const MAX_PASSENGERS: u32 = 4;
/// Displacements at or below this do not change the heading.
const HEADING_EPSILON_KM: f64 = 1e-6;

/// Remaining minutes at `speed_kph`; 0 when stationary.
pub fn eta_minutes(distance_km: f64, speed_kph: f64) -> f64 {
    if speed_kph > 0.0 {
        distance_km / speed_kph * 60.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Component)]
pub struct Vehicle {
    id: String,
    province: String,
    pois: Arc<[PointOfInterest]>,
    state: VehicleState,
    trip: Option<ActiveTrip>,
    location: Coordinate,
    speed_kph: f64,
    heading_degrees: f64,
    fuel_percent: f64,
    km_remaining: f64,
    eta_minutes: f64,
    /// Set while an out-of-service vehicle is being refueled by assistance.
    assisted_refuel: bool,
}

impl Vehicle {
    /// Places a new `Available` vehicle at a random POI of `province`.
    ///
    /// Fails when the province has no POIs in the catalog.
    pub fn new(
        id: impl Into<String>,
        province: &str,
        catalog: &PoiCatalog,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SimError> {
        let pois = catalog
            .get(province)
            .filter(|pois| !pois.is_empty())
            .cloned()
            .ok_or_else(|| SimError::NoPois {
                province: province.to_string(),
            })?;

        let start = &pois[rng.index(pois.len())];
        let fuel_percent = rng.int_inclusive(INITIAL_FUEL_PERCENT.0, INITIAL_FUEL_PERCENT.1) as f64;
        let vehicle = Self {
            id: id.into(),
            province: province.to_string(),
            location: start.coordinate(),
            pois: pois.clone(),
            state: VehicleState::Available,
            trip: None,
            speed_kph: 0.0,
            heading_degrees: 0.0,
            fuel_percent,
            km_remaining: 0.0,
            eta_minutes: 0.0,
            assisted_refuel: false,
        };
        debug!(
            vehicle_id = %vehicle.id,
            province = %vehicle.province,
            poi = %start.name,
            latitude = vehicle.location.latitude,
            longitude = vehicle.location.longitude,
            "vehicle initialized"
        );
        Ok(vehicle)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn trip(&self) -> Option<&ActiveTrip> {
        self.trip.as_ref()
    }

    pub fn trip_id(&self) -> Option<&str> {
        self.trip.as_ref().map(|trip| trip.trip_id.as_str())
    }

    pub fn passengers(&self) -> u8 {
        self.trip.as_ref().map_or(0, |trip| trip.passengers)
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.trip.as_ref().map(|trip| trip.destination)
    }

    pub fn route(&self) -> Option<&PlannedRoute> {
        self.trip.as_ref().map(|trip| &trip.route)
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn speed_kph(&self) -> f64 {
        self.speed_kph
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading_degrees
    }

    pub fn fuel_percent(&self) -> f64 {
        self.fuel_percent
    }

    pub fn km_remaining(&self) -> f64 {
        self.km_remaining
    }

    pub fn eta_minutes(&self) -> f64 {
        self.eta_minutes
    }

    /// Advances the vehicle by one tick of `tick_secs` simulated seconds.
    pub fn update(&mut self, rng: &mut dyn RandomSource, tick_secs: f64) {
        match self.state {
            VehicleState::Available => self.tick_available(rng),
            VehicleState::InTrip => self.tick_in_trip(rng, tick_secs),
            VehicleState::Paused => self.tick_paused(rng),
            VehicleState::OutOfService => self.tick_out_of_service(rng),
        }
    }

    /// Starts a trip to a random province POI at least [`MIN_TRIP_DISTANCE_KM`] away.
    ///
    /// Returns `false` and leaves the vehicle untouched when it is not available or
    /// when no POI qualifies; the vehicle simply tries again on a later tick.
    pub fn assign_trip(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.state != VehicleState::Available {
            return false;
        }

        let origin = self.location;
        let candidates: Vec<&PointOfInterest> = self
            .pois
            .iter()
            .filter(|poi| distance_km(origin, poi.coordinate()) >= MIN_TRIP_DISTANCE_KM)
            .collect();
        if candidates.is_empty() {
            debug!(
                vehicle_id = %self.id,
                province = %self.province,
                "no destination far enough for a trip"
            );
            return false;
        }

        let destination_poi = candidates[rng.index(candidates.len())];
        let destination = destination_poi.coordinate();
        let trip_id = rng.random_id().to_string();
        let passengers = rng.int_inclusive(1, MAX_PASSENGERS) as u8;
        let speed_kph = rng.uniform(INITIAL_SPEED_KPH.0, INITIAL_SPEED_KPH.1);
        let route = PlannedRoute::between(origin, destination);
        let trip_km = distance_km(origin, destination);

        debug!(
            vehicle_id = %self.id,
            trip_id = %trip_id,
            destination = %destination_poi.name,
            distance_km = trip_km,
            route_points = route.len(),
            "trip assigned"
        );

        self.trip = Some(ActiveTrip {
            trip_id,
            passengers,
            destination,
            destination_name: destination_poi.name.clone(),
            route,
        });
        self.state = VehicleState::InTrip;
        self.speed_kph = speed_kph;
        self.km_remaining = trip_km;
        self.eta_minutes = eta_minutes(trip_km, speed_kph);
        true
    }

    /// Serializable state at `timestamp`, rounded for publishing.
    pub fn snapshot(&self, timestamp: DateTime<Utc>) -> VehicleSnapshot {
        VehicleSnapshot::from_vehicle(self, timestamp)
    }

    fn tick_available(&mut self, rng: &mut dyn RandomSource) {
        self.park();
        if rng.unit() >= TRIP_REQUEST_PROBABILITY {
            return;
        }
        if self.fuel_percent < LOW_FUEL_PERCENT {
            info!(
                vehicle_id = %self.id,
                fuel = self.fuel_percent,
                "low fuel, pausing to refuel"
            );
            self.state = VehicleState::Paused;
            return;
        }
        self.assign_trip(rng);
    }

    fn tick_in_trip(&mut self, rng: &mut dyn RandomSource, tick_secs: f64) {
        let Some(trip) = self.trip.as_mut() else {
            self.state = VehicleState::Available;
            self.park();
            return;
        };

        let budget_km = self.speed_kph * tick_secs / 3600.0;
        let previous = self.location;
        self.location = trip.route.advance(previous, budget_km);
        if distance_km(previous, self.location) > HEADING_EPSILON_KM {
            self.heading_degrees = heading_degrees(previous, self.location);
        }

        self.fuel_percent = (self.fuel_percent - FUEL_BURN_PER_TICK).max(0.0);
        self.km_remaining = distance_km(self.location, trip.destination);
        self.eta_minutes = eta_minutes(self.km_remaining, self.speed_kph);

        let jitter = rng.uniform(-SPEED_JITTER_KPH, SPEED_JITTER_KPH);
        self.speed_kph = (self.speed_kph + jitter).clamp(MIN_SPEED_KPH, MAX_SPEED_KPH);

        if self.km_remaining < ARRIVAL_THRESHOLD_KM {
            debug!(
                vehicle_id = %self.id,
                trip_id = %trip.trip_id,
                destination = %trip.destination_name,
                "trip finished"
            );
            self.state = VehicleState::Available;
            self.park();
        } else if self.fuel_percent <= 0.0 {
            warn!(
                vehicle_id = %self.id,
                trip_id = %trip.trip_id,
                "out of fuel during trip, trip abandoned"
            );
            self.state = VehicleState::OutOfService;
            self.park();
        }
    }

    fn tick_paused(&mut self, rng: &mut dyn RandomSource) {
        self.refuel(rng.uniform(REFUEL_PER_TICK.0, REFUEL_PER_TICK.1));
        if self.fuel_percent >= REFUELED_PERCENT {
            info!(vehicle_id = %self.id, fuel = self.fuel_percent, "refueled, back to available");
            self.state = VehicleState::Available;
        }
    }

    fn tick_out_of_service(&mut self, rng: &mut dyn RandomSource) {
        if !self.assisted_refuel && self.fuel_percent > STRANDED_FUEL_PERCENT {
            if rng.unit() < RESCUE_PROBABILITY {
                info!(vehicle_id = %self.id, "repaired, back to available");
                self.state = VehicleState::Available;
            }
            return;
        }

        self.assisted_refuel = true;
        self.refuel(rng.uniform(ASSISTED_REFUEL_PER_TICK.0, ASSISTED_REFUEL_PER_TICK.1));
        if self.fuel_percent > ASSISTED_RECOVERY_PERCENT {
            self.assisted_refuel = false;
            info!(vehicle_id = %self.id, "fuel assistance received, back to available");
            self.state = VehicleState::Available;
        }
    }

    fn refuel(&mut self, amount: f64) {
        self.fuel_percent = (self.fuel_percent + amount).min(100.0);
    }

    /// Drops any trip context and zeroes kinematics and trip metrics.
    fn park(&mut self) {
        self.trip = None;
        self.speed_kph = 0.0;
        self.heading_degrees = 0.0;
        self.km_remaining = 0.0;
        self.eta_minutes = 0.0;
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Vehicle {
    /// Moves an idle vehicle to `location` (test setup only).
    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = location;
        self
    }

    /// Overrides the fuel level (test setup only).
    pub fn with_fuel(mut self, fuel_percent: f64) -> Self {
        self.set_fuel(fuel_percent);
        self
    }

    pub fn set_fuel(&mut self, fuel_percent: f64) {
        self.fuel_percent = fuel_percent.clamp(0.0, 100.0);
    }

    /// Parks the vehicle out of service, as if it had run dry mid-trip.
    pub fn break_down(&mut self) {
        self.park();
        self.assisted_refuel = false;
        self.state = VehicleState::OutOfService;
    }
}
