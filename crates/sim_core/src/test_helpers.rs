//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files:
//! a scripted random source, an in-memory publisher and a small POI catalog.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::error::PublishError;
use crate::poi::{PoiCatalog, PointOfInterest};
use crate::publisher::Publisher;
use crate::random::RandomSource;
use crate::spatial::{Coordinate, EARTH_RADIUS_KM};

/// Province used by [`test_catalog`].
pub const TEST_PROVINCE: &str = "corrientes";

/// Plaza 25 de Mayo, Corrientes. First POI of [`test_catalog`].
pub const TEST_ORIGIN: Coordinate = Coordinate::new(-27.4669, -58.8306);

/// Kilometres per degree of latitude on the Haversine sphere.
pub fn km_per_degree() -> f64 {
    EARTH_RADIUS_KM.to_radians()
}

/// Point `km` due north of `from`.
pub fn north_of(from: Coordinate, km: f64) -> Coordinate {
    Coordinate::new(from.latitude + km / km_per_degree(), from.longitude)
}

/// Point `km` due east of `from` (along the parallel).
pub fn east_of(from: Coordinate, km: f64) -> Coordinate {
    let km_per_degree_lng = km_per_degree() * from.latitude.to_radians().cos();
    Coordinate::new(from.latitude, from.longitude + km / km_per_degree_lng)
}

/// Six POIs around [`TEST_ORIGIN`]; the second one is only 0.3 km away.
pub fn test_catalog() -> PoiCatalog {
    let pois = vec![
        PointOfInterest::new("Plaza 25 de Mayo", TEST_ORIGIN),
        PointOfInterest::new("Casa de Gobierno", north_of(TEST_ORIGIN, 0.3)),
        PointOfInterest::new("Costanera Norte", north_of(TEST_ORIGIN, 2.0)),
        PointOfInterest::new("Terminal de Omnibus", east_of(TEST_ORIGIN, 3.0)),
        PointOfInterest::new("Hospital Escuela", north_of(TEST_ORIGIN, -1.2)),
        PointOfInterest::new("Parque Mitre", east_of(TEST_ORIGIN, -0.8)),
    ];
    PoiCatalog::new().with_province(TEST_PROVINCE, pois)
}

/// Plays back a fixed sequence of unit draws, then repeats a fallback value.
///
/// The default fallback of 0.5 keeps vehicles quiet: no trip draws succeed and
/// speed jitter is zero. Ids are sequential.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
    fallback: f64,
    next_id: u128,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws: draws.into(),
            fallback: 0.5,
            next_id: 1,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new()).then_constant(value)
    }

    /// Value returned once the scripted draws are used up.
    pub fn then_constant(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }

    fn random_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next_id);
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct MemoryLog {
    messages: Vec<(String, Vec<u8>)>,
    attempts: usize,
    flushes: usize,
}

/// Records published messages behind a shared handle; clones see the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    log: Arc<Mutex<MemoryLog>>,
    reject: bool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every send fails.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    fn log(&self) -> MutexGuard<'_, MemoryLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn messages(&self) -> Vec<(String, Vec<u8>)> {
        self.log().messages.clone()
    }

    pub fn attempts(&self) -> usize {
        self.log().attempts
    }

    pub fn flushes(&self) -> usize {
        self.log().flushes
    }
}

impl Publisher for MemoryPublisher {
    fn send(&mut self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        let mut log = self.log();
        log.attempts += 1;
        if self.reject {
            return Err(PublishError::Rejected("queue full".to_string()));
        }
        log.messages.push((key.to_string(), payload.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PublishError> {
        self.log().flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::distance_km;

    #[test]
    fn offsets_land_at_requested_distance() {
        assert!((distance_km(TEST_ORIGIN, north_of(TEST_ORIGIN, 2.0)) - 2.0).abs() < 1e-6);
        assert!((distance_km(TEST_ORIGIN, east_of(TEST_ORIGIN, 3.0)) - 3.0).abs() < 1e-3);
    }

    #[test]
    fn scripted_random_plays_back_then_falls_back() {
        let mut rng = ScriptedRandom::new(vec![0.1, 0.2]).then_constant(0.9);
        assert_eq!(rng.unit(), 0.1);
        assert_eq!(rng.unit(), 0.2);
        assert_eq!(rng.remaining(), 0);
        assert_eq!(rng.unit(), 0.9);
        assert_ne!(rng.random_id(), rng.random_id());
    }

    #[test]
    fn memory_publisher_clones_share_the_log() {
        let handle = MemoryPublisher::new();
        let mut publisher = handle.clone();
        publisher.send("k", b"v").expect("send");
        publisher.flush().expect("flush");
        assert_eq!(handle.messages(), vec![("k".to_string(), b"v".to_vec())]);
        assert_eq!(handle.flushes(), 1);
    }
}
