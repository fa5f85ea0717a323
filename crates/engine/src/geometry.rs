//! Distance and arena-bounds math shared by cells and pellets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points.
#[inline]
pub fn distance(p1: Vec2, p2: Vec2) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Arena dimensions. The playfield spans `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> f32 {
    1821.0
}
fn default_height() -> f32 {
    925.0
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pull `position` back inside `[margin, dimension - margin]` on both axes.
    ///
    /// The far edge is checked first and the near edge last, so an entity
    /// wider than the arena ends up pinned at `margin`. Applying it twice
    /// gives the same result as applying it once.
    #[inline]
    pub fn clamp(&self, position: &mut Vec2, margin: f32) {
        if position.x + margin > self.width {
            position.x = self.width - margin;
        }
        if position.x - margin < 0.0 {
            position.x = margin;
        }
        if position.y + margin > self.height {
            position.y = self.height - margin;
        }
        if position.y - margin < 0.0 {
            position.y = margin;
        }
    }
}

/// Flip the components of `direction` whose axis has crossed an arena edge.
///
/// `near_margin` applies to the low (0) edge and `far_margin` to the high
/// (width/height) edge.
#[inline]
pub fn reflect_at_edges(position: Vec2, direction: &mut Vec2, arena: Arena, far_margin: f32, near_margin: f32) {
    if position.x + far_margin > arena.width || position.x - near_margin < 0.0 {
        direction.x = -direction.x;
    }
    if position.y + far_margin > arena.height || position.y - near_margin < 0.0 {
        direction.y = -direction.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Vec2::new(3.0, 4.0), Vec2::new(0.0, 0.0)), 5.0);
        assert_eq!(distance(Vec2::new(1.5, 1.5), Vec2::new(1.5, 1.5)), 0.0);
    }

    #[test]
    fn test_clamp_inside_is_untouched() {
        let arena = Arena::new(100.0, 50.0);
        let mut pos = Vec2::new(40.0, 20.0);
        arena.clamp(&mut pos, 10.0);
        assert_eq!(pos, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_clamp_pulls_back_from_each_edge() {
        let arena = Arena::new(100.0, 50.0);
        let mut pos = Vec2::new(-30.0, 95.0);
        arena.clamp(&mut pos, 10.0);
        assert_eq!(pos, Vec2::new(10.0, 40.0));

        let mut pos = Vec2::new(99.0, 1.0);
        arena.clamp(&mut pos, 5.0);
        assert_eq!(pos, Vec2::new(95.0, 5.0));
    }

    #[test]
    fn test_clamp_oversized_entity_pins_to_margin() {
        let arena = Arena::new(100.0, 50.0);
        let mut pos = Vec2::new(70.0, 30.0);
        arena.clamp(&mut pos, 60.0);
        assert_eq!(pos, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn test_reflect_uses_asymmetric_margins() {
        let arena = Arena::new(100.0, 100.0);
        // 2 * mass on the near edge: x = 15 with mass 10 is inside by `mass` but not by `2 * mass`.
        let mut dir = Vec2::new(-1.0, 0.5);
        reflect_at_edges(Vec2::new(15.0, 50.0), &mut dir, arena, 10.0, 20.0);
        assert_eq!(dir, Vec2::new(1.0, 0.5));

        let mut dir = Vec2::new(-1.0, 0.5);
        reflect_at_edges(Vec2::new(15.0, 50.0), &mut dir, arena, 10.0, 10.0);
        assert_eq!(dir, Vec2::new(-1.0, 0.5));

        let mut dir = Vec2::new(0.3, 1.0);
        reflect_at_edges(Vec2::new(50.0, 95.0), &mut dir, arena, 10.0, 10.0);
        assert_eq!(dir, Vec2::new(0.3, -1.0));
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            margin in 0.0f32..1000.0,
        ) {
            let arena = Arena::default();
            let mut once = Vec2::new(x, y);
            arena.clamp(&mut once, margin);
            let mut twice = once;
            arena.clamp(&mut twice, margin);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_clamp_keeps_small_entities_in_bounds(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            margin in 0.0f32..400.0,
        ) {
            let arena = Arena::default();
            let mut pos = Vec2::new(x, y);
            arena.clamp(&mut pos, margin);
            prop_assert!(pos.x >= margin && pos.x <= arena.width - margin);
            prop_assert!(pos.y >= margin && pos.y <= arena.height - margin);
        }

        #[test]
        fn prop_distance_is_symmetric_and_non_negative(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert!(distance(a, b) >= 0.0);
            prop_assert_eq!(distance(a, b), distance(b, a));
        }
    }
}
