//! Draw-call tallies for the headless host.

use engine::{Cell, Pellet, Renderer, TickReport};
use tracing::trace;

/// Renderer that counts what would have been drawn.
#[derive(Debug, Default)]
pub struct FrameStats {
    pub pellets_drawn: usize,
    pub cells_drawn: usize,
    /// Heaviest cell drawn this frame.
    pub heaviest: f32,
}

impl FrameStats {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Renderer for FrameStats {
    fn draw_pellet(&mut self, _pellet: &Pellet) {
        self.pellets_drawn += 1;
    }

    fn draw_cell(&mut self, cell: &Cell) {
        self.cells_drawn += 1;
        self.heaviest = self.heaviest.max(cell.mass);
        trace!("draw {} at ({:.1}, {:.1}) mass {:.2}", cell.id, cell.position.x, cell.position.y, cell.mass);
    }
}

/// Running totals over a whole session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionTotals {
    pub frames: u64,
    pub pellets_eaten: usize,
    pub cells_eaten: usize,
    pub actions: usize,
    pub resets: u32,
}

impl SessionTotals {
    pub fn record(&mut self, report: &TickReport) {
        self.frames += 1;
        self.pellets_eaten += report.pellets_eaten;
        self.cells_eaten += report.cells_eaten;
        self.actions += report.actions;
    }
}
