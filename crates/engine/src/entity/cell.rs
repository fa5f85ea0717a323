//! Player cells.

use super::spawner::Spawner;
use crate::config::{CellConfig, PlayerProfile};
use crate::geometry::{Arena, distance, reflect_at_edges};
use crate::host::DeviceId;
use crate::palette::{Color, Palette};
use glam::Vec2;
use std::cmp::Ordering;
use std::fmt;
use std::time::{Duration, Instant};

/// Unique cell identifier. Ids only ever increase, across resets too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Cell motion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellState {
    /// Steered by its owner's directional input.
    Stationary,
    /// Launched by a split; ignores input until `speed <= end_speed`.
    Sliding { direction: Vec2, speed: f32, end_speed: f32 },
}

/// A cell controlled by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub owner: DeviceId,
    /// Display name. Empty means "use the positional default".
    pub name: String,
    /// Image drawn instead of a plain circle.
    pub image: Option<String>,
    pub position: Vec2,
    pub mass: f32,
    pub color: Color,
    /// Last directional input applied while stationary.
    pub velocity: Vec2,
    pub last_did_action: Instant,
    pub state: CellState,
}

/// Order cells by mass, smallest first.
///
/// Frames process and draw cells in this order; the action translator walks
/// it in reverse.
pub fn by_mass_ascending(a: &Cell, b: &Cell) -> Ordering {
    a.mass.total_cmp(&b.mass)
}

impl Cell {
    /// Create a stationary cell.
    pub fn new(id: CellId, owner: DeviceId, position: Vec2, mass: f32, color: Color, now: Instant) -> Self {
        Self {
            id,
            owner,
            name: String::new(),
            image: None,
            position,
            mass,
            color,
            velocity: Vec2::ZERO,
            last_did_action: now,
            state: CellState::Stationary,
        }
    }

    /// Spawn a starting-size cell for a player, well clear of `cells`.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_fresh(
        id: CellId,
        owner: DeviceId,
        profile: PlayerProfile,
        cells: &[Cell],
        config: &CellConfig,
        palette: &Palette,
        spawner: &mut Spawner,
        now: Instant,
    ) -> Self {
        let separation = config.spawn_separation();
        let position = spawner.clear_position(config.starting_mass, |pos| {
            cells.iter().any(|cell| distance(cell.position, pos) < separation)
        });
        let color = palette.random_color(spawner.rng());

        let mut cell = Self::new(id, owner, position, config.starting_mass, color, now);
        cell.name = profile.name;
        cell.image = profile.image;
        cell
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        matches!(self.state, CellState::Sliding { .. })
    }

    /// Current direction of travel: the slide direction while sliding,
    /// otherwise the last steering input.
    #[inline]
    pub fn heading(&self) -> Vec2 {
        match self.state {
            CellState::Sliding { direction, .. } => direction,
            CellState::Stationary => self.velocity,
        }
    }

    /// Move the cell one frame.
    ///
    /// A stationary cell follows `input`, slower the heavier it is. A sliding
    /// cell ignores `input` and coasts along its split impulse instead,
    /// bouncing off the arena edges.
    pub fn apply_input(&mut self, input: Vec2, arena: Arena, config: &CellConfig) {
        match self.state {
            CellState::Stationary => {
                self.velocity = input;
                self.position += input * (config.move_factor / self.mass);
            }
            CellState::Sliding { mut direction, mut speed, end_speed } => {
                self.position += direction * speed;
                speed *= config.friction;
                reflect_at_edges(self.position, &mut direction, arena, self.mass, self.mass);

                self.state = if speed <= end_speed {
                    CellState::Stationary
                } else {
                    CellState::Sliding { direction, speed, end_speed }
                };
            }
        }
    }

    /// Keep the cell inside the arena.
    #[inline]
    pub fn clamp_to_bounds(&mut self, arena: Arena) {
        arena.clamp(&mut self.position, self.mass);
    }

    /// Scale the steering input (used to fan out a double split).
    #[inline]
    pub fn multiply_velocity(&mut self, factor: f32) {
        self.velocity *= factor;
    }

    /// Whether more than `cooldown` has passed since the last action.
    #[inline]
    pub fn action_ready(&self, now: Instant, cooldown: Duration) -> bool {
        now.saturating_duration_since(self.last_did_action) > cooldown
    }

    /// Halve this cell and return the launched half.
    ///
    /// The child appears one parent radius ahead along the heading and slides
    /// until its speed drops to `end_speed_factor / mass`. The caller adds it
    /// to the population.
    pub fn split(&mut self, child_id: CellId, config: &CellConfig, now: Instant) -> Cell {
        self.mass = (self.mass / 2.0).floor();
        let direction = self.heading();

        Cell {
            id: child_id,
            owner: self.owner,
            name: self.name.clone(),
            image: self.image.clone(),
            position: self.position + direction * self.mass,
            mass: self.mass,
            color: self.color,
            velocity: Vec2::ZERO,
            last_did_action: now,
            state: CellState::Sliding {
                direction,
                speed: config.start_speed,
                end_speed: config.end_speed_factor / self.mass,
            },
        }
    }

    /// Whether this cell may swallow `other` right now.
    ///
    /// A rival must be no heavier and lie entirely inside this cell. A cell
    /// of the same owner merges back regardless of size, with a tolerance of
    /// a tenth of its mass.
    pub fn can_eat(&self, other: &Cell) -> bool {
        let gap = distance(self.position, other.position);
        if self.owner == other.owner {
            gap <= self.mass - other.mass + other.mass / 10.0
        } else {
            other.mass <= self.mass && gap <= self.mass - other.mass
        }
    }

    /// Swallow `other` if allowed, gaining its mass.
    ///
    /// Returns false and leaves this cell untouched otherwise. Removing
    /// `other` from the population is up to the caller.
    pub fn attempt_eat(&mut self, other: &Cell, arena: Arena) -> bool {
        if !self.can_eat(other) {
            return false;
        }
        self.mass += other.mass;
        self.clamp_to_bounds(arena);
        true
    }
}
