//! Random placement for new entities.

use crate::geometry::Arena;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Seeded source of spawn positions, masses and colors.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    arena: Arena,
    max_attempts: u32,
}

impl Spawner {
    pub fn new(seed: u64, arena: Arena, max_attempts: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            arena,
            max_attempts: max_attempts.max(1),
        }
    }

    #[inline]
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Uniform sample in `[lo, hi]`, or the midpoint when the range is empty.
    #[inline]
    fn coord(&mut self, lo: f32, hi: f32) -> f32 {
        if lo < hi {
            self.rng.random_range(lo..=hi)
        } else {
            (lo + hi) / 2.0
        }
    }

    /// Random position at least `margin` away from every arena edge.
    pub fn random_position(&mut self, margin: f32) -> Vec2 {
        let arena = self.arena;
        Vec2::new(
            self.coord(margin, arena.width - margin),
            self.coord(margin, arena.height - margin),
        )
    }

    /// Rejection-sample a position that `rejected` accepts.
    ///
    /// Gives up after the configured number of attempts and returns the last
    /// sample, so a saturated arena can never stall a frame.
    pub fn clear_position(&mut self, margin: f32, rejected: impl Fn(Vec2) -> bool) -> Vec2 {
        let mut position = self.random_position(margin);
        let mut attempts = 1;
        while rejected(position) {
            if attempts >= self.max_attempts {
                warn!(
                    "No clear spawn position after {} attempts, using ({:.1}, {:.1})",
                    attempts, position.x, position.y
                );
                break;
            }
            position = self.random_position(margin);
            attempts += 1;
        }
        position
    }

    /// Uniform sample in `[min, max)`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.random::<f32>() * (max - min) + min
    }
}
