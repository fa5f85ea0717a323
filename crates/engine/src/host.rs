//! Seams between the engine and the host platform layer.
//!
//! The host owns input devices and drawing. The engine only ever sees a
//! [`DeviceId`] handle, a two-axis signal and raw button state, and hands
//! entities back to a [`Renderer`] as it advances them.

use crate::entity::{Cell, Pellet};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle for a connected control device (one player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Per-device input polled by the host.
pub trait Controls {
    /// Directional signal, each axis in `[-1, 1]`.
    fn axes(&self, device: DeviceId) -> Vec2;

    /// Number of buttons the device exposes.
    fn button_count(&self, device: DeviceId) -> usize;

    /// Whether `button` is currently held down.
    fn is_pressed(&self, device: DeviceId, button: usize) -> bool;
}

/// Draw hooks invoked while the world advances.
pub trait Renderer {
    fn draw_pellet(&mut self, pellet: &Pellet);

    fn draw_cell(&mut self, cell: &Cell);
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_pellet(&mut self, _pellet: &Pellet) {}

    fn draw_cell(&mut self, _cell: &Cell) {}
}
