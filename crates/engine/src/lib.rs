//! Cells simulation engine library.
//!
//! A local multiplayer arena where every connected controller drives a cell
//! that grows by eating pellets and rival cells. The host owns the window,
//! audio and input devices; it calls [`World::tick`] once per frame and
//! receives draw calls through the [`Renderer`] trait.

pub mod actions;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod host;
pub mod palette;
pub mod world;

// Re-export commonly used types
pub use actions::Action;
pub use config::{Config, ControlAction};
pub use entity::{Cell, CellId, CellState, Pellet, PelletMotion, by_mass_ascending};
pub use error::EngineError;
pub use host::{Controls, DeviceId, Renderer};
pub use palette::{Color, Palette};
pub use world::{TickReport, World};
