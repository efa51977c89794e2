//! Spatial operations: coordinates, great-circle distances and straight-line routes.
//!
//! This module provides:
//!
//! - **Coordinate**: latitude/longitude value type shared by POIs, vehicles and payloads
//! - **Distance calculations**: Haversine distance between two coordinates
//! - **Route discretization**: uniform lat/lng interpolation between two coordinates
//! - **Heading**: compass bearing of a displacement, in degrees `[0, 360)`
//!
//! Routes are straight lines in lat/lng space, not map-matched paths.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Point at `fraction` of the way from `self` to `target` (linear in lat/lng).
    pub fn lerp(self, target: Coordinate, fraction: f64) -> Coordinate {
        Coordinate {
            latitude: self.latitude + fraction * (target.latitude - self.latitude),
            longitude: self.longitude + fraction * (target.longitude - self.longitude),
        }
    }

    /// Validates the coordinate through H3's lat/lng type and the usual degree ranges.
    pub fn is_valid(&self) -> bool {
        h3o::LatLng::new(self.latitude, self.longitude).is_ok()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Haversine distance in kilometres. Symmetric and never negative.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Discretizes the straight path `a -> b` into `steps + 1` points.
///
/// Point `i` sits at fraction `i / steps`; the first point is exactly `a` and the
/// last is exactly `b`. A `steps` of zero is treated as one.
pub fn interpolate_route(a: Coordinate, b: Coordinate, steps: usize) -> Vec<Coordinate> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            if i == steps {
                b
            } else {
                a.lerp(b, i as f64 / steps as f64)
            }
        })
        .collect()
}

/// Bearing of the displacement `from -> to` in degrees, normalized to `[0, 360)`.
/// 0 is north, 90 is east.
pub fn heading_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let delta_lat = to.latitude - from.latitude;
    let delta_lon = to.longitude - from.longitude;
    let degrees = delta_lon.atan2(delta_lat).to_degrees();
    (degrees + 360.0) % 360.0
}
