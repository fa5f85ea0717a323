//! Pellets: ambient food and mass ejected by cells.

use super::cell::Cell;
use super::spawner::Spawner;
use crate::config::PelletConfig;
use crate::geometry::{Arena, distance, reflect_at_edges};
use crate::palette::{Color, Palette};
use glam::Vec2;

/// Pellet motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PelletMotion {
    Resting,
    /// Ejected pellet gliding away from its cell.
    Sliding { direction: Vec2, speed: f32 },
}

/// A pellet that cells eat to grow.
#[derive(Debug, Clone, PartialEq)]
pub struct Pellet {
    pub position: Vec2,
    pub mass: f32,
    pub color: Color,
    /// Ejected by a cell rather than spawned by the arena.
    pub large: bool,
    pub motion: PelletMotion,
}

impl Pellet {
    /// Create a resting ambient pellet.
    pub fn new(position: Vec2, mass: f32, color: Color) -> Self {
        Self {
            position,
            mass,
            color,
            large: false,
            motion: PelletMotion::Resting,
        }
    }

    /// Spawn an ambient pellet at a random position outside every cell.
    pub fn spawn_ambient(cells: &[Cell], config: &PelletConfig, palette: &Palette, spawner: &mut Spawner) -> Self {
        let position = spawner.clear_position(config.max_size, |pos| {
            cells.iter().any(|cell| distance(cell.position, pos) < cell.mass)
        });
        let color = palette.random_color(spawner.rng());
        let mass = spawner.range(config.min_size, config.max_size);
        Self::new(position, mass, color)
    }

    /// Eject a pellet from the edge of `source` along `direction`.
    pub fn spawn_ejected(source: &Cell, direction: Vec2, config: &PelletConfig) -> Self {
        Self {
            position: source.position + direction * source.mass,
            mass: config.mass_size,
            color: source.color,
            large: true,
            motion: PelletMotion::Sliding {
                direction,
                speed: config.start_speed,
            },
        }
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        matches!(self.motion, PelletMotion::Sliding { .. })
    }

    /// Advance an ejected pellet one frame along its slide.
    ///
    /// The pellet bounces off the arena edges: `mass` from the far edge,
    /// `2 * mass` from the near edge.
    pub fn advance_slide(&mut self, arena: Arena, config: &PelletConfig) {
        let PelletMotion::Sliding { mut direction, mut speed } = self.motion else {
            return;
        };

        self.position += direction * speed;
        speed *= config.friction;
        reflect_at_edges(self.position, &mut direction, arena, self.mass, self.mass * 2.0);

        self.motion = if speed < config.stop_speed {
            PelletMotion::Resting
        } else {
            PelletMotion::Sliding { direction, speed }
        };
    }

    /// Keep the pellet inside the arena.
    #[inline]
    pub fn clamp_to_bounds(&mut self, arena: Arena) {
        arena.clamp(&mut self.position, self.mass);
    }
}
