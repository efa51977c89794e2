//! Planned trip routes and piecewise-linear motion along them.
//!
//! A [`PlannedRoute`] is generated once per trip by straight-line interpolation
//! and then consumed tick by tick: each tick spends a travel budget in km,
//! snapping onto every route point it reaches and stopping partway along the
//! segment where the budget runs out.

use crate::spatial::{distance_km, interpolate_route, Coordinate};

/// Routes never have fewer than this many interpolation steps.
pub const MIN_ROUTE_STEPS: usize = 20;
/// Interpolation density: longer trips get finer-grained motion.
pub const ROUTE_STEPS_PER_KM: f64 = 100.0;

/// Step count for a trip of `distance_km`: `max(20, floor(distance * 100))`.
pub fn route_steps_for(distance_km: f64) -> usize {
    let density_steps = (distance_km.max(0.0) * ROUTE_STEPS_PER_KM).floor() as usize;
    density_steps.max(MIN_ROUTE_STEPS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    points: Vec<Coordinate>,
    index: usize,
}

impl PlannedRoute {
    /// Straight-line route from `origin` to `destination` with density-based step count.
    pub fn between(origin: Coordinate, destination: Coordinate) -> Self {
        let steps = route_steps_for(distance_km(origin, destination));
        Self {
            points: interpolate_route(origin, destination, steps),
            index: 0,
        }
    }

    /// Wraps pre-computed points. Returns `None` for an empty point list.
    pub fn from_points(points: Vec<Coordinate>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { points, index: 0 })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Index of the last route point reached; always within `[0, len - 1]`.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn destination(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn is_complete(&self) -> bool {
        self.index + 1 >= self.points.len()
    }

    /// Moves from `position` along the route by at most `budget_km` and returns the
    /// new position.
    ///
    /// Reached route points are snapped onto exactly. Once the last point has been
    /// reached the position stays on it.
    pub fn advance(&mut self, position: Coordinate, budget_km: f64) -> Coordinate {
        if self.is_complete() {
            return self.destination();
        }

        let mut position = position;
        let mut budget = budget_km.max(0.0);
        while let Some(&next) = self.points.get(self.index + 1) {
            let segment_km = distance_km(position, next);
            if segment_km <= budget {
                budget -= segment_km;
                position = next;
                self.index += 1;
                continue;
            }
            // segment_km > budget >= 0, so the ratio is well defined.
            position = position.lerp(next, budget / segment_km);
            break;
        }
        position
    }
}
