//! Computer-driven controllers for the headless host.

use engine::{Cell, Controls, DeviceId, Pellet, World};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

/// How much bigger a bot must be before it chases a rival.
const PREY_RATIO: f32 = 1.3;
/// Rivals further than this many bot radii away are ignored.
const HUNT_RADIUS: f32 = 6.0;
/// Chance per decision of splitting onto prey in reach.
const SPLIT_CHANCE: f64 = 0.05;
/// Chance per decision of releasing mass.
const RELEASE_CHANCE: f64 = 0.005;
/// Buttons a bot pad reports.
const BUTTON_COUNT: usize = 12;

/// State of one virtual pad.
#[derive(Debug, Clone, Default)]
struct Brain {
    axes: Vec2,
    pressed: Vec<usize>,
    /// Frames until the next decision.
    decision_cooldown: u32,
}

/// Where a bot wants to go.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target<'a> {
    Prey { cell: &'a Cell, dist: f32 },
    Food(Vec2),
}

impl Target<'_> {
    fn position(&self) -> Vec2 {
        match self {
            Target::Prey { cell, .. } => cell.position,
            Target::Food(position) => *position,
        }
    }
}

/// Pick a target for `me`: the nearest rival it can swallow within reach,
/// otherwise the nearest pellet.
fn pick_target<'a>(me: &Cell, cells: &'a [Cell], pellets: &[Pellet]) -> Option<Target<'a>> {
    let prey = cells
        .iter()
        .filter(|other| other.owner != me.owner && me.mass > other.mass * PREY_RATIO)
        .map(|other| (other, me.position.distance(other.position)))
        .filter(|(_, dist)| *dist < me.mass * HUNT_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((cell, dist)) = prey {
        return Some(Target::Prey { cell, dist });
    }

    pellets
        .iter()
        .map(|pellet| pellet.position)
        .min_by(|a, b| me.position.distance(*a).total_cmp(&me.position.distance(*b)))
        .map(Target::Food)
}

fn largest_cell(cells: &[Cell], device: DeviceId) -> Option<&Cell> {
    cells
        .iter()
        .filter(|cell| cell.owner == device)
        .max_by(|a, b| a.mass.total_cmp(&b.mass))
}

/// A set of bot pads, one per device.
#[derive(Debug)]
pub struct BotPads {
    brains: BTreeMap<DeviceId, Brain>,
    rng: StdRng,
}

impl BotPads {
    pub fn new(devices: &[DeviceId], seed: u64) -> Self {
        Self {
            brains: devices.iter().map(|&device| (device, Brain::default())).collect(),
            rng: StdRng::seed_from_u64(seed ^ 0x5eed),
        }
    }

    /// Update every pad from the current world.
    ///
    /// Each bot steers its largest cell and re-decides every third frame.
    pub fn think(&mut self, world: &World) {
        let controls = &world.config().controls;

        for (&device, brain) in self.brains.iter_mut() {
            brain.pressed.clear();

            let Some(me) = largest_cell(world.cells(), device) else {
                brain.axes = Vec2::ZERO;
                continue;
            };

            if brain.decision_cooldown > 0 {
                brain.decision_cooldown -= 1;
                continue;
            }
            brain.decision_cooldown = 2;

            let target = pick_target(me, world.cells(), world.pellets());
            if let Some(Target::Prey { cell, dist }) = target {
                // Close enough that the launched half lands on it.
                if dist < me.mass * 2.0 && me.mass / 2.0 > cell.mass && self.rng.random_bool(SPLIT_CHANCE) {
                    debug!("{} splits onto {}", device, cell.id);
                    brain.pressed.push(controls.split);
                }
            }
            if self.rng.random_bool(RELEASE_CHANCE) {
                brain.pressed.push(controls.release_mass);
            }

            brain.axes = target
                .map(|target| (target.position() - me.position).normalize_or_zero())
                .unwrap_or(Vec2::ZERO);
        }
    }
}

impl Controls for BotPads {
    fn axes(&self, device: DeviceId) -> Vec2 {
        self.brains.get(&device).map(|brain| brain.axes).unwrap_or(Vec2::ZERO)
    }

    fn button_count(&self, _device: DeviceId) -> usize {
        BUTTON_COUNT
    }

    fn is_pressed(&self, device: DeviceId, button: usize) -> bool {
        self.brains
            .get(&device)
            .is_some_and(|brain| brain.pressed.contains(&button))
    }
}
