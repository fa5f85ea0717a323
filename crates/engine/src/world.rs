//! World state management.
//!
//! Owns every live cell and pellet and advances them one frame at a time.

use crate::config::Config;
use crate::entity::{Cell, CellId, Pellet, Spawner, by_mass_ascending};
use crate::error::EngineError;
use crate::geometry::distance;
use crate::host::{Controls, DeviceId, Renderer};
use crate::palette::Palette;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// The population of one game.
#[derive(Debug)]
pub struct World {
    pub(crate) config: Config,
    pub(crate) palette: Palette,
    pub(crate) spawner: Spawner,

    /// Next cell id to hand out. Never rewinds, not even on reset.
    next_cell_id: u64,

    /// Live cells in insertion order.
    pub(crate) cells: Vec<Cell>,
    /// Live pellets in insertion order.
    pub(crate) pellets: Vec<Pellet>,
    /// Devices still in the game, in connection order.
    pub(crate) roster: Vec<DeviceId>,
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub pellets_eaten: usize,
    pub cells_eaten: usize,
    /// Split, double-split and release actions that went through.
    pub actions: usize,
    /// Devices that lost their last cell this frame.
    pub retired: Vec<DeviceId>,
}

/// One line of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub device: DeviceId,
    pub name: String,
    pub score: u32,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'s Score: {}", self.name, self.score)
    }
}

impl World {
    /// Create an empty world. Call [`World::reset`] to start a game.
    pub fn new(config: Config, palette: Palette, seed: u64) -> Self {
        let spawner = Spawner::new(seed, config.arena, config.population.max_placement_attempts);
        Self {
            config,
            palette,
            spawner,
            next_cell_id: 0,
            cells: Vec::with_capacity(64),
            pellets: Vec::new(),
            roster: Vec::new(),
        }
    }

    /// Start a new game: one fresh cell per device plus a full pellet pool.
    pub fn reset(&mut self, devices: &[DeviceId], now: Instant) -> Result<(), EngineError> {
        if devices.is_empty() {
            return Err(EngineError::NoControllers);
        }

        self.cells.clear();
        self.pellets.clear();
        self.roster = devices.to_vec();

        for (slot, &device) in devices.iter().enumerate() {
            let id = self.next_id();
            let cell = Cell::spawn_fresh(
                id,
                device,
                self.config.profile(slot),
                &self.cells,
                &self.config.cell,
                &self.palette,
                &mut self.spawner,
                now,
            );
            self.cells.push(cell);
        }

        let pellet_count = self.config.population.pellet_count;
        self.pellets.reserve(pellet_count);
        for _ in 0..pellet_count {
            let pellet = Pellet::spawn_ambient(&self.cells, &self.config.pellet, &self.palette, &mut self.spawner);
            self.pellets.push(pellet);
        }

        info!(
            "Game reset: {} players, {} pellets",
            self.roster.len(),
            self.pellets.len()
        );
        Ok(())
    }

    /// Get the next cell ID.
    pub fn next_id(&mut self) -> CellId {
        let id = CellId(self.next_cell_id);
        self.next_cell_id += 1;
        id
    }

    /// Advance one frame.
    ///
    /// Pellets are drawn and slid first, then every cell is moved, fed and
    /// drawn from lightest to heaviest, and finally held buttons are turned
    /// into split/release actions.
    pub fn tick(&mut self, controls: &impl Controls, renderer: &mut impl Renderer, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        for index in 0..self.pellets.len() {
            self.tick_pellet(index, renderer);
        }

        for id in self.cells_by_mass() {
            self.tick_cell(id, controls, renderer, &mut report);
        }

        report.actions = self.process_actions(controls, now);
        report
    }

    /// Draw a pellet, then slide it and keep it on the board.
    pub fn tick_pellet(&mut self, index: usize, renderer: &mut impl Renderer) {
        let arena = self.config.arena;
        let Some(pellet) = self.pellets.get_mut(index) else {
            return;
        };
        renderer.draw_pellet(pellet);
        pellet.advance_slide(arena, &self.config.pellet);
        pellet.clamp_to_bounds(arena);
    }

    /// Move one cell and resolve everything it eats this frame.
    ///
    /// Cells eaten earlier in the frame are skipped. The eat scan walks the
    /// live cell list and stays on the same index after a removal, so every
    /// other cell is tested exactly once.
    ///
    /// Eaten pellets are replaced once the pellet scan is done, so a
    /// replacement is never tested against this cell in the same frame.
    pub fn tick_cell(&mut self, id: CellId, controls: &impl Controls, renderer: &mut impl Renderer, report: &mut TickReport) {
        let Some(mut eater) = self.index_of(id) else {
            return;
        };
        let arena = self.config.arena;

        let input = controls.axes(self.cells[eater].owner);
        let cell = &mut self.cells[eater];
        cell.apply_input(input, arena, &self.config.cell);
        cell.clamp_to_bounds(arena);

        let mut index = 0;
        while index < self.cells.len() {
            if index == eater {
                index += 1;
                continue;
            }
            let (cell, other) = pair_mut(&mut self.cells, eater, index);
            if !cell.attempt_eat(other, arena) {
                index += 1;
                continue;
            }

            let eaten = self.cells.remove(index);
            if index < eater {
                eater -= 1;
            }
            report.cells_eaten += 1;
            debug!(
                "{} ({}) ate {} ({}), mass now {:.2}",
                id, self.cells[eater].owner, eaten.id, eaten.owner, self.cells[eater].mass
            );
            self.retire_if_empty(eaten.owner, report);
        }

        let gain_divisor = self.config.pellet.gain_divisor;
        let mut consumed = 0;
        let mut index = 0;
        while index < self.pellets.len() {
            let cell = &self.cells[eater];
            let pellet = &self.pellets[index];
            if distance(cell.position, pellet.position) < cell.mass + pellet.mass {
                let pellet = self.pellets.remove(index);
                self.cells[eater].mass += pellet.mass / gain_divisor;
                consumed += 1;
            } else {
                index += 1;
            }
        }
        for _ in 0..consumed {
            let pellet = Pellet::spawn_ambient(&self.cells, &self.config.pellet, &self.palette, &mut self.spawner);
            self.pellets.push(pellet);
        }
        report.pellets_eaten += consumed;

        renderer.draw_cell(&self.cells[eater]);
    }

    /// Drop `device` from the roster once it has no cells left.
    fn retire_if_empty(&mut self, device: DeviceId, report: &mut TickReport) {
        if self.cell_count(device) > 0 {
            return;
        }
        if let Some(slot) = self.roster.iter().position(|&d| d == device) {
            self.roster.remove(slot);
            report.retired.push(device);
            info!("{} lost its last cell and is out of the game", device);
        }
    }

    /// Ids of all live cells, lightest first.
    pub fn cells_by_mass(&self) -> Vec<CellId> {
        let mut order: Vec<&Cell> = self.cells.iter().collect();
        order.sort_by(|a, b| by_mass_ascending(a, b));
        order.into_iter().map(|cell| cell.id).collect()
    }

    #[inline]
    pub(crate) fn index_of(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|cell| cell.id == id)
    }

    /// Get a cell by ID.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Add a cell to the population (e.g. the result of [`Cell::split`]).
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    /// Devices still in the game.
    #[inline]
    pub fn roster(&self) -> &[DeviceId] {
        &self.roster
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of live cells owned by `device`.
    pub fn cell_count(&self, device: DeviceId) -> usize {
        self.cells.iter().filter(|cell| cell.owner == device).count()
    }

    /// Total mass of `device` times ten, truncated.
    ///
    /// The mass is summed as a float first and truncated once, so 50.375
    /// total mass scores 503.
    pub fn score(&self, device: DeviceId) -> u32 {
        let total: f32 = self
            .cells
            .iter()
            .filter(|cell| cell.owner == device)
            .map(|cell| cell.mass)
            .sum();
        (total * 10.0) as u32
    }

    /// Name shown for `device`, or `None` once it has no cells.
    ///
    /// Unnamed players are called "Cell N" after their roster position.
    pub fn display_name(&self, device: DeviceId) -> Option<String> {
        let cell = self.cells.iter().find(|cell| cell.owner == device)?;
        if !cell.name.is_empty() {
            return Some(cell.name.clone());
        }
        let slot = self.roster.iter().position(|&d| d == device)?;
        Some(format!("Cell {}", slot + 1))
    }

    /// Score lines for every device still in the game.
    pub fn scoreboard(&self) -> Vec<ScoreLine> {
        self.roster
            .iter()
            .filter_map(|&device| {
                let name = self.display_name(device)?;
                Some(ScoreLine {
                    device,
                    name,
                    score: self.score(device),
                })
            })
            .collect()
    }
}

/// Borrow `cells[a]` mutably and `cells[b]` shared. `a` and `b` must differ.
fn pair_mut(cells: &mut [Cell], a: usize, b: usize) -> (&mut Cell, &Cell) {
    if a < b {
        let (left, right) = cells.split_at_mut(b);
        (&mut left[a], &right[0])
    } else {
        let (left, right) = cells.split_at_mut(a);
        (&mut right[0], &left[b])
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::host::NullRenderer;
    use glam::Vec2;
    use std::time::Duration;

    #[test]
    fn test_reset_requires_a_device() {
        let mut world = World::new(Config::default(), Palette::default(), 1);
        let err = world.reset(&[], Instant::now()).unwrap_err();
        assert!(matches!(err, EngineError::NoControllers));
    }

    #[test]
    fn test_reset_spawns_one_cell_per_device_and_full_pool() {
        let now = Instant::now();
        let mut config = Config::default();
        config.players.push(crate::config::PlayerProfile {
            name: "Ann".into(),
            image: Some("ann.png".into()),
        });
        let mut world = World::new(config, Palette::default(), 99);
        world.reset(&[A, B], now).unwrap();

        assert_eq!(world.cells().len(), 2);
        assert_eq!(world.pellets().len(), 300);
        assert_eq!(world.roster(), &[A, B]);
        assert_eq!(world.cell_count(A), 1);
        assert_eq!(world.cells()[0].mass, 50.0);
        assert_eq!(world.cells()[0].image.as_deref(), Some("ann.png"));
        assert!(distance(world.cells()[0].position, world.cells()[1].position) >= 130.0);

        assert_eq!(world.display_name(A).as_deref(), Some("Ann"));
        assert_eq!(world.display_name(B).as_deref(), Some("Cell 2"));
        assert_eq!(world.score(A), 500);

        for pellet in world.pellets() {
            for cell in world.cells() {
                assert!(distance(pellet.position, cell.position) >= cell.mass);
            }
        }
    }

    #[test]
    fn test_cell_ids_keep_increasing_across_resets() {
        let now = Instant::now();
        let mut world = World::new(Config::default(), Palette::default(), 5);
        world.reset(&[A, B], now).unwrap();
        let first: Vec<CellId> = world.cells().iter().map(|c| c.id).collect();
        world.reset(&[A, B], now).unwrap();
        let second: Vec<CellId> = world.cells().iter().map(|c| c.id).collect();
        assert!(second.iter().all(|id| first.iter().all(|old| id > old)));
    }

    #[test]
    fn test_cell_eats_covered_pellet() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let a = put(&mut world, A, 300.0, 300.0, 50.0, now);
        put(&mut world, B, 1500.0, 700.0, 50.0, now);
        world.pellets[0] = Pellet::new(Vec2::new(310.0, 300.0), 3.0, crate::Color::WHITE);

        let report = world.tick(&Pads::default(), &mut NullRenderer, now);

        assert_eq!(world.cell(a).unwrap().mass, 50.375);
        assert_eq!(world.pellets().len(), 300);
        assert_eq!(report.pellets_eaten, 1);
        assert_eq!(world.score(A), 503);
    }

    #[test]
    fn test_pellet_pool_stays_full_after_many_eaten() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let a = put(&mut world, A, 300.0, 300.0, 50.0, now);
        put(&mut world, B, 1500.0, 700.0, 50.0, now);
        for pellet in world.pellets.iter_mut().take(5) {
            *pellet = Pellet::new(Vec2::new(300.0, 300.0), 4.0, crate::Color::WHITE);
        }

        let report = world.tick(&Pads::default(), &mut NullRenderer, now);

        assert_eq!(report.pellets_eaten, 5);
        assert_eq!(world.pellets().len(), 300);
        assert_eq!(world.cell(a).unwrap().mass, 52.5);
    }

    #[test]
    fn test_bigger_rival_swallows_smaller_and_retires_its_owner() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let a = put(&mut world, A, 500.0, 500.0, 100.0, now);
        put(&mut world, B, 510.0, 500.0, 20.0, now);

        let report = world.tick(&Pads::default(), &mut NullRenderer, now);

        assert_eq!(report.cells_eaten, 1);
        assert_eq!(report.retired, vec![B]);
        assert_eq!(world.cell(a).unwrap().mass, 120.0);
        assert_eq!(world.cell_count(B), 0);
        assert_eq!(world.roster(), &[A]);
        assert_eq!(world.display_name(B), None);
        assert_eq!(world.score(B), 0);
        assert!(world.scoreboard().iter().all(|line| line.device != B));
    }

    #[test]
    fn test_consecutive_prey_are_all_eaten_in_one_scan() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let a = put(&mut world, A, 500.0, 500.0, 100.0, now);
        put(&mut world, B, 505.0, 500.0, 10.0, now);
        put(&mut world, B, 495.0, 500.0, 10.0, now);
        put(&mut world, B, 500.0, 520.0, 10.0, now);

        let report = world.tick(&Pads::default(), &mut NullRenderer, now);

        assert_eq!(report.cells_eaten, 3);
        assert_eq!(world.cells().len(), 1);
        assert_eq!(world.cell(a).unwrap().mass, 130.0);
        assert_eq!(report.retired, vec![B]);
    }

    #[test]
    fn test_device_keeps_roster_slot_while_a_cell_survives() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        put(&mut world, A, 500.0, 500.0, 100.0, now);
        put(&mut world, B, 510.0, 500.0, 20.0, now);
        put(&mut world, B, 1500.0, 500.0, 20.0, now);

        let report = world.tick(&Pads::default(), &mut NullRenderer, now);

        assert!(report.retired.is_empty());
        assert_eq!(world.cell_count(B), 1);
        assert_eq!(world.roster(), &[A, B]);
    }

    #[test]
    fn test_same_owner_cells_merge() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        put(&mut world, A, 500.0, 500.0, 40.0, now);
        put(&mut world, A, 515.0, 500.0, 25.0, now);
        put(&mut world, B, 1500.0, 500.0, 50.0, now);

        world.tick(&Pads::default(), &mut NullRenderer, now);

        assert_eq!(world.cell_count(A), 1);
        assert_eq!(world.score(A), 650);
        assert_eq!(world.roster(), &[A, B]);
    }

    #[test]
    fn test_cell_eaten_earlier_in_frame_is_not_ticked() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let light = put(&mut world, A, 500.0, 500.0, 30.0, now);
        let heavy = put(&mut world, A, 500.0, 500.0, 31.0, now);
        let rival = put(&mut world, B, 1500.0, 500.0, 50.0, now);
        let mut recorder = Recorder::default();

        // The lighter sibling goes first and swallows the heavier one.
        let report = world.tick(&Pads::default(), &mut recorder, now);

        assert_eq!(report.cells_eaten, 1);
        assert!(world.cell(heavy).is_none());
        assert_eq!(
            &recorder.drawn[300..],
            &[Drawn::Cell(light, 61.0), Drawn::Cell(rival, 50.0)]
        );
        assert!(report.retired.is_empty());
    }

    #[test]
    fn test_frame_draws_pellets_then_cells_lightest_first() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let heavy = put(&mut world, A, 300.0, 300.0, 80.0, now);
        let light = put(&mut world, B, 1500.0, 500.0, 30.0, now);
        let mut recorder = Recorder::default();

        world.tick(&Pads::default(), &mut recorder, now);

        let pellets = recorder.drawn.iter().take_while(|d| **d == Drawn::Pellet).count();
        assert_eq!(pellets, 300);
        assert_eq!(
            &recorder.drawn[300..],
            &[Drawn::Cell(light, 30.0), Drawn::Cell(heavy, 80.0)]
        );
    }

    #[test]
    fn test_input_moves_cells_and_keeps_them_in_bounds() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        let a = put(&mut world, A, 52.0, 400.0, 50.0, now);
        let b = put(&mut world, B, 900.0, 400.0, 50.0, now);
        let mut pads = Pads::default();
        pads.axes.insert(A, Vec2::new(-1.0, 0.0));
        pads.axes.insert(B, Vec2::new(0.5, 1.0));

        world.tick(&pads, &mut NullRenderer, now);

        assert_eq!(world.cell(a).unwrap().position, Vec2::new(50.0, 400.0));
        assert_eq!(world.cell(b).unwrap().position, Vec2::new(902.0, 404.0));
    }

    #[test]
    fn test_ejected_pellet_slides_each_frame() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        let mut pellet = Pellet::new(Vec2::new(900.0, 600.0), 15.0, crate::Color::WHITE);
        pellet.motion = crate::PelletMotion::Sliding { direction: Vec2::new(1.0, 0.0), speed: 30.0 };
        world.pellets[0] = pellet;

        world.tick_pellet(0, &mut NullRenderer);
        assert_eq!(world.pellets()[0].position, Vec2::new(930.0, 600.0));
    }

    #[test]
    fn test_scoreboard_lines() {
        let now = Instant::now();
        let mut world = two_player_world(now);
        clear_cells(&mut world);
        put(&mut world, A, 300.0, 300.0, 50.0, now);
        put(&mut world, A, 800.0, 300.0, 12.5, now);
        put(&mut world, B, 1500.0, 500.0, 50.0, now);

        let lines: Vec<String> = world.scoreboard().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["Cell 1's Score: 625", "Cell 2's Score: 500"]);
    }

    #[test]
    fn test_same_seed_same_game() {
        let now = Instant::now();
        let mut pads = Pads::default();
        pads.axes.insert(A, Vec2::new(0.7, -0.2));
        pads.axes.insert(B, Vec2::new(-0.4, 0.9));

        let mut first = World::new(Config::default(), Palette::default(), 77);
        let mut second = World::new(Config::default(), Palette::default(), 77);
        first.reset(&[A, B], now).unwrap();
        second.reset(&[A, B], now).unwrap();
        for frame in 0..120 {
            let at = now + Duration::from_millis(frame * 16);
            first.tick(&pads, &mut NullRenderer, at);
            second.tick(&pads, &mut NullRenderer, at);
        }
        assert_eq!(first.cells(), second.cells());
        assert_eq!(first.pellets(), second.pellets());
    }
}
