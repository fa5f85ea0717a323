//! Discrete controller actions: split, double split and mass release.
//!
//! Held buttons are checked once per frame. Each action is gated per cell by
//! a short cooldown, so holding a button repeats it at a fixed rate.

use crate::config::ControlAction;
use crate::entity::{Cell, CellId, Pellet, by_mass_ascending};
use crate::host::{Controls, DeviceId};
use crate::world::World;
use std::time::Instant;
use tracing::debug;

/// Action a player can trigger on their cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Split,
    /// Three chained splits fanned out along the steering axis.
    DoubleSplit,
    /// Eject a pellet of mass.
    ReleaseMass,
}

impl Action {
    /// The cell action behind a button binding. Host-owned controls map to
    /// `None`.
    pub fn from_control(control: ControlAction) -> Option<Self> {
        match control {
            ControlAction::Split => Some(Action::Split),
            ControlAction::DoubleSplit => Some(Action::DoubleSplit),
            ControlAction::ReleaseMass => Some(Action::ReleaseMass),
            ControlAction::Pause | ControlAction::DarkTheme | ControlAction::LightTheme => None,
        }
    }
}

/// Steering multipliers applied before each split of a double split.
/// Their product is 1, so the parent ends up steering as before.
const DOUBLE_SPLIT_FAN: [f32; 3] = [2.0, -0.5, -1.0];

impl World {
    /// Run the action bound to every held button of every device.
    ///
    /// Returns how many cell actions went through.
    pub fn process_actions(&mut self, controls: &impl Controls, now: Instant) -> usize {
        let mut performed = 0;
        let roster = self.roster.clone();
        for device in roster {
            for button in 0..controls.button_count(device) {
                if !controls.is_pressed(device, button) {
                    continue;
                }
                let Some(action) = self.config.controls.action_for(button).and_then(Action::from_control) else {
                    continue;
                };
                performed += self.do_action(device, action, now);
            }
        }
        performed
    }

    /// Apply `action` to each of `device`'s cells, heaviest first.
    ///
    /// The cell list is snapshotted up front: cells created by this action
    /// are not acted on again in the same call. Cells on cooldown or without
    /// enough mass are skipped silently.
    pub fn do_action(&mut self, device: DeviceId, action: Action, now: Instant) -> usize {
        let cooldown = self.config.actions.cooldown();

        let mut snapshot: Vec<&Cell> = self.cells.iter().filter(|cell| cell.owner == device).collect();
        snapshot.sort_by(|a, b| by_mass_ascending(a, b));
        let order: Vec<CellId> = snapshot.into_iter().rev().map(|cell| cell.id).collect();

        let mut performed = 0;
        for id in order {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            if !self.cells[index].action_ready(now, cooldown) {
                continue;
            }

            let done = match action {
                Action::Split => self.try_split(index, device, now),
                Action::DoubleSplit => self.try_double_split(index, device, now),
                Action::ReleaseMass => self.try_release_mass(index),
            };
            if done {
                self.cells[index].last_did_action = now;
                performed += 1;
            }
        }
        performed
    }

    fn can_split(&self, index: usize, device: DeviceId, min_mass: f32) -> bool {
        self.cells[index].mass >= min_mass && self.cell_count(device) <= self.config.actions.max_cells
    }

    /// Split the cell at `index` and add the child to the population.
    fn split_at(&mut self, index: usize, now: Instant) {
        let child_id = self.next_id();
        let child = self.cells[index].split(child_id, &self.config.cell, now);
        debug!(
            "{} split off {} (mass {:.1}) for {}",
            self.cells[index].id, child.id, child.mass, child.owner
        );
        self.cells.push(child);
    }

    fn try_split(&mut self, index: usize, device: DeviceId, now: Instant) -> bool {
        if !self.can_split(index, device, self.config.actions.split_min_mass) {
            return false;
        }
        self.split_at(index, now);
        true
    }

    fn try_double_split(&mut self, index: usize, device: DeviceId, now: Instant) -> bool {
        if !self.can_split(index, device, self.config.actions.double_split_min_mass) {
            return false;
        }
        for factor in DOUBLE_SPLIT_FAN {
            self.cells[index].multiply_velocity(factor);
            self.split_at(index, now);
        }
        true
    }

    /// Eject one pellet from the cell at `index`.
    ///
    /// The oldest pellet in the pool is retired first so the pool size stays
    /// the same.
    fn try_release_mass(&mut self, index: usize) -> bool {
        let pellet_config = &self.config.pellet;
        if self.cells[index].mass < self.config.actions.release_min_mass {
            return false;
        }

        if !self.pellets.is_empty() {
            self.pellets.remove(0);
        }
        let cell = &mut self.cells[index];
        cell.mass -= pellet_config.mass_size / pellet_config.gain_divisor;
        let pellet = Pellet::spawn_ejected(cell, cell.heading(), pellet_config);
        debug!(
            "{} released mass at ({:.1}, {:.1}), mass now {:.3}",
            cell.id, pellet.position.x, pellet.position.y, cell.mass
        );
        self.pellets.push(pellet);
        true
    }
}
