//! Host-owned controls: pause, reset hold and theme.

use engine::{Config, Controls, DeviceId};
use std::time::Instant;
use tracing::info;

/// What the host should do after polling the session buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    /// Pause is being held while paused; seconds left until the reset.
    Countdown(u32),
    /// Pause was held long enough: start a new game.
    Reset,
}

/// Pause, theme and reset-hold state for one game session.
#[derive(Debug)]
pub struct Session {
    countdown_after: f32,
    reset_after: f32,
    pause_button: usize,
    dark_button: usize,
    light_button: usize,

    paused: bool,
    dark: bool,
    /// Pause button state last poll, for edge detection.
    pause_was_down: bool,
    /// When the current pause hold started.
    held_since: Option<Instant>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            countdown_after: config.session.countdown_after_secs,
            reset_after: config.session.reset_after_secs,
            pause_button: config.controls.pause,
            dark_button: config.controls.dark_theme,
            light_button: config.controls.light_theme,
            paused: false,
            dark: false,
            pause_was_down: false,
            held_since: None,
        }
    }

    #[inline]
    pub fn paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn dark(&self) -> bool {
        self.dark
    }

    /// Poll the host buttons of every device.
    ///
    /// Pressing pause toggles it. Holding pause while paused shows a
    /// countdown and, once the hold is long enough, resets the game and
    /// resumes play.
    pub fn poll(&mut self, controls: &impl Controls, devices: &[DeviceId], now: Instant) -> SessionEvent {
        let any_pressed = |button: usize| devices.iter().any(|&device| controls.is_pressed(device, button));

        if any_pressed(self.dark_button) && !self.dark {
            self.dark = true;
            info!("Theme: dark");
        }
        if any_pressed(self.light_button) && self.dark {
            self.dark = false;
            info!("Theme: light");
        }

        let pause_down = any_pressed(self.pause_button);
        let pressed_now = pause_down && !self.pause_was_down;
        self.pause_was_down = pause_down;

        if !pause_down {
            self.held_since = None;
            return SessionEvent::None;
        }

        if pressed_now {
            self.paused = !self.paused;
            self.held_since = Some(now);
            info!("{}", if self.paused { "Paused" } else { "Resumed" });
            return SessionEvent::None;
        }

        let Some(since) = self.held_since else {
            return SessionEvent::None;
        };
        if !self.paused {
            return SessionEvent::None;
        }

        let held = now.saturating_duration_since(since).as_secs_f32();
        if held >= self.reset_after {
            self.paused = false;
            self.held_since = None;
            info!("Reset requested");
            SessionEvent::Reset
        } else if held >= self.countdown_after {
            SessionEvent::Countdown((self.reset_after - held.floor()) as u32)
        } else {
            SessionEvent::None
        }
    }
}
