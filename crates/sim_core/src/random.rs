//! Injectable randomness for the vehicle lifecycle.
//!
//! Every probabilistic decision a vehicle makes goes through [`RandomSource`], so
//! runs can be reproduced from a seed and tests can script exact draw sequences.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::Uuid;

pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Fresh random identifier (trip and vehicle ids).
    fn random_id(&mut self) -> Uuid;

    /// Uniform draw in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }

    /// Uniform integer in `[low, high]`.
    fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high, "empty integer range");
        let span = (high - low) as f64 + 1.0;
        let offset = (self.unit() * span).floor() as u32;
        low + offset.min(high - low)
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty collection");
        let pick = (self.unit() * len as f64).floor() as usize;
        pick.min(len.saturating_sub(1))
    }
}

/// `StdRng`-backed source; seeded for reproducible runs, entropy otherwise.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 {
        self.rng.gen()
    }

    fn random_id(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        self.rng.gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// ECS resource holding the fleet's random source.
#[derive(Resource)]
pub struct SimRng(pub Box<dyn RandomSource>);

impl SimRng {
    pub fn seeded(seed: Option<u64>) -> Self {
        Self(Box::new(SeededRandom::new(seed)))
    }
}
