//! Game entities.
//!
//! This module defines the two kinds of things that live in the arena:
//! player cells and pellets.

mod cell;
mod pellet;
mod spawner;

pub use cell::{Cell, CellId, CellState, by_mass_ascending};
pub use pellet::{Pellet, PelletMotion};
pub use spawner::Spawner;
