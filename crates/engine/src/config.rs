//! Game configuration.

use crate::geometry::Arena;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub arena: Arena,
    #[serde(default)]
    pub pellet: PelletConfig,
    #[serde(default)]
    pub cell: CellConfig,
    #[serde(default)]
    pub actions: ActionConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Per-slot player profiles; slot N is applied to the Nth device at reset.
    #[serde(default)]
    pub players: Vec<PlayerProfile>,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the file
    /// does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Profile for the device at roster position `slot`.
    pub fn profile(&self, slot: usize) -> PlayerProfile {
        self.players.get(slot).cloned().unwrap_or_default()
    }
}

/// Pellet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PelletConfig {
    /// Smallest ambient pellet mass.
    #[serde(default = "default_pellet_min_size")]
    pub min_size: f32,
    /// Largest ambient pellet mass, also the spawn margin from the arena edge.
    #[serde(default = "default_pellet_max_size")]
    pub max_size: f32,
    /// Mass of an ejected pellet.
    #[serde(default = "default_pellet_mass_size")]
    pub mass_size: f32,
    #[serde(default = "default_pellet_start_speed")]
    pub start_speed: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Sliding stops once speed falls below this.
    #[serde(default = "default_pellet_stop_speed")]
    pub stop_speed: f32,
    /// A cell gains `pellet.mass / gain_divisor` per pellet eaten.
    #[serde(default = "default_pellet_gain_divisor")]
    pub gain_divisor: f32,
}

impl Default for PelletConfig {
    fn default() -> Self {
        Self {
            min_size: default_pellet_min_size(),
            max_size: default_pellet_max_size(),
            mass_size: default_pellet_mass_size(),
            start_speed: default_pellet_start_speed(),
            friction: default_friction(),
            stop_speed: default_pellet_stop_speed(),
            gain_divisor: default_pellet_gain_divisor(),
        }
    }
}

fn default_pellet_min_size() -> f32 {
    2.0
}
fn default_pellet_max_size() -> f32 {
    5.0
}
fn default_pellet_mass_size() -> f32 {
    15.0
}
fn default_pellet_start_speed() -> f32 {
    30.0
}
fn default_friction() -> f32 {
    0.8
}
fn default_pellet_stop_speed() -> f32 {
    0.3
}
fn default_pellet_gain_divisor() -> f32 {
    8.0
}

/// Cell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CellConfig {
    #[serde(default = "default_cell_starting_mass")]
    pub starting_mass: f32,
    /// Launch speed of a freshly split cell.
    #[serde(default = "default_cell_start_speed")]
    pub start_speed: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Steering moves a cell by `input * move_factor / mass` per frame.
    #[serde(default = "default_cell_move_factor")]
    pub move_factor: f32,
    /// A split child stops sliding at `end_speed_factor / parent.mass`.
    #[serde(default = "default_cell_end_speed_factor")]
    pub end_speed_factor: f32,
    /// Extra clearance between fresh spawns on top of two starting radii.
    #[serde(default = "default_cell_spawn_spacing")]
    pub spawn_spacing: f32,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            starting_mass: default_cell_starting_mass(),
            start_speed: default_cell_start_speed(),
            friction: default_friction(),
            move_factor: default_cell_move_factor(),
            end_speed_factor: default_cell_end_speed_factor(),
            spawn_spacing: default_cell_spawn_spacing(),
        }
    }
}

impl CellConfig {
    /// Minimum distance between two fresh spawns.
    pub fn spawn_separation(&self) -> f32 {
        self.starting_mass * 2.0 + self.spawn_spacing
    }
}

fn default_cell_starting_mass() -> f32 {
    50.0
}
fn default_cell_start_speed() -> f32 {
    55.0
}
fn default_cell_move_factor() -> f32 {
    200.0
}
fn default_cell_end_speed_factor() -> f32 {
    70.0
}
fn default_cell_spawn_spacing() -> f32 {
    30.0
}

/// Discrete action gates.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionConfig {
    /// Per-cell pause between two actions.
    #[serde(default = "default_action_cooldown")]
    pub cooldown_secs: f64,
    #[serde(default = "default_split_min_mass")]
    pub split_min_mass: f32,
    #[serde(default = "default_double_split_min_mass")]
    pub double_split_min_mass: f32,
    #[serde(default = "default_release_min_mass")]
    pub release_min_mass: f32,
    /// A player may only split while owning at most this many cells.
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_action_cooldown(),
            split_min_mass: default_split_min_mass(),
            double_split_min_mass: default_double_split_min_mass(),
            release_min_mass: default_release_min_mass(),
            max_cells: default_max_cells(),
        }
    }
}

impl ActionConfig {
    /// Per-cell action cooldown. Values that do not fit a `Duration`
    /// fall back to the default.
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.cooldown_secs.max(0.0)).unwrap_or_else(|_| {
            warn!("Invalid action cooldown {}, using default", self.cooldown_secs);
            Duration::from_secs_f64(default_action_cooldown())
        })
    }
}

fn default_action_cooldown() -> f64 {
    0.2
}
fn default_split_min_mass() -> f32 {
    20.0
}
fn default_double_split_min_mass() -> f32 {
    40.0
}
fn default_release_min_mass() -> f32 {
    20.0
}
fn default_max_cells() -> usize {
    10
}

/// Population sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopulationConfig {
    #[serde(default = "default_pellet_count")]
    pub pellet_count: usize,
    /// Rejection-sampling budget for spawn placement. When it runs out the
    /// last sampled position is used.
    #[serde(default = "default_max_placement_attempts")]
    pub max_placement_attempts: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            pellet_count: default_pellet_count(),
            max_placement_attempts: default_max_placement_attempts(),
        }
    }
}

fn default_pellet_count() -> usize {
    300
}
fn default_max_placement_attempts() -> u32 {
    1000
}

/// What a controller button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Split,
    DoubleSplit,
    ReleaseMass,
    /// Host-owned: toggles pause, hold to reset.
    Pause,
    /// Host-owned.
    DarkTheme,
    /// Host-owned.
    LightTheme,
}

/// Button bindings (raw joystick button indices).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlsConfig {
    #[serde(default = "default_split_button")]
    pub split: usize,
    #[serde(default = "default_double_split_button")]
    pub double_split: usize,
    #[serde(default = "default_release_mass_button")]
    pub release_mass: usize,
    #[serde(default = "default_pause_button")]
    pub pause: usize,
    #[serde(default = "default_dark_theme_button")]
    pub dark_theme: usize,
    #[serde(default = "default_light_theme_button")]
    pub light_theme: usize,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            split: default_split_button(),
            double_split: default_double_split_button(),
            release_mass: default_release_mass_button(),
            pause: default_pause_button(),
            dark_theme: default_dark_theme_button(),
            light_theme: default_light_theme_button(),
        }
    }
}

impl ControlsConfig {
    /// Action bound to `button`, if any.
    pub fn action_for(&self, button: usize) -> Option<ControlAction> {
        [
            (self.split, ControlAction::Split),
            (self.double_split, ControlAction::DoubleSplit),
            (self.release_mass, ControlAction::ReleaseMass),
            (self.pause, ControlAction::Pause),
            (self.dark_theme, ControlAction::DarkTheme),
            (self.light_theme, ControlAction::LightTheme),
        ]
        .into_iter()
        .find_map(|(bound, action)| (bound == button).then_some(action))
    }

}

fn default_split_button() -> usize {
    6
}
fn default_double_split_button() -> usize {
    8
}
fn default_release_mass_button() -> usize {
    7
}
fn default_pause_button() -> usize {
    9
}
fn default_dark_theme_button() -> usize {
    4
}
fn default_light_theme_button() -> usize {
    5
}

/// Host session settings: frame pacing, pause/reset hold timers and bots.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Holding pause this long while paused shows the reset countdown.
    #[serde(default = "default_countdown_after")]
    pub countdown_after_secs: f32,
    /// Holding pause this long while paused restarts the game.
    #[serde(default = "default_reset_after")]
    pub reset_after_secs: f32,
    /// Computer-driven pads registered by the headless host.
    #[serde(default = "default_bots")]
    pub bots: usize,
    /// Stop after this many seconds (runs until Ctrl-C when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_for_secs: Option<f32>,
    /// World RNG seed (random when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            countdown_after_secs: default_countdown_after(),
            reset_after_secs: default_reset_after(),
            bots: default_bots(),
            run_for_secs: None,
            seed: None,
        }
    }
}

fn default_frame_rate() -> u32 {
    60
}
fn default_countdown_after() -> f32 {
    1.0
}
fn default_reset_after() -> f32 {
    4.0
}
fn default_bots() -> usize {
    2
}

/// Name and optional image shown for one player slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerProfile {
    /// Empty means "use the positional default".
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
