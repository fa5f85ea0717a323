//! Cells - headless host that runs the arena with bot-driven pads.

use anyhow::Context;
use engine::{Config, DeviceId, Palette, World};
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod bot;
mod session;
mod stats;

use bot::BotPads;
use session::{Session, SessionEvent};
use stats::{FrameStats, SessionTotals};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Cells v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load("config.toml")?;
    info!("Loaded configuration");
    info!("  Arena: {}x{}", config.arena.width, config.arena.height);
    info!("  Pellets: {}", config.population.pellet_count);
    info!("  Bots: {}", config.session.bots);

    let palette = Palette::load("colors.json")?;
    let seed = config.session.seed.unwrap_or_else(|| rand::rng().random());
    info!("  Seed: {}", seed);

    let devices: Vec<DeviceId> = (0..config.session.bots as u32).map(DeviceId).collect();
    let mut world = World::new(config.clone(), palette, seed);
    world
        .reset(&devices, Instant::now())
        .context("Add at least one bot under [session] in config.toml")?;

    let totals = run(&config, &mut world, &devices, seed).await?;

    info!(
        "Session over after {} frames: {} pellets and {} cells eaten, {} actions, {} resets",
        totals.frames, totals.pellets_eaten, totals.cells_eaten, totals.actions, totals.resets
    );
    for line in world.scoreboard() {
        info!("  {}", line);
    }

    Ok(())
}

/// Drive the world at the configured frame rate until Ctrl-C or the
/// configured run time elapses.
async fn run(config: &Config, world: &mut World, devices: &[DeviceId], seed: u64) -> anyhow::Result<SessionTotals> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(config.session.frame_rate.max(1)));
    let mut ticker = interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = config
        .session
        .run_for_secs
        .and_then(run_time)
        .map(|run_for| tokio::time::Instant::now() + run_for);
    let stop = async move {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(stop);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut pads = BotPads::new(devices, seed);
    let mut session = Session::new(config);
    let mut frame_stats = FrameStats::default();
    let mut totals = SessionTotals::default();
    let mut last_scoreboard = Instant::now();
    let mut announced_winner = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted");
                break;
            }
            _ = &mut stop => {
                info!("Run time elapsed");
                break;
            }
        }

        let now = Instant::now();
        pads.think(world);

        match session.poll(&pads, devices, now) {
            SessionEvent::None => {}
            SessionEvent::Countdown(secs) => info!("Reset in {}", secs),
            SessionEvent::Reset => {
                world.reset(devices, now)?;
                totals.resets += 1;
                announced_winner = false;
            }
        }
        if session.paused() {
            continue;
        }

        frame_stats.clear();
        let report = world.tick(&pads, &mut frame_stats, now);
        totals.record(&report);

        if !announced_winner && devices.len() > 1 && world.roster().len() == 1 {
            announced_winner = true;
            let winner = world.roster()[0];
            let name = world.display_name(winner).unwrap_or_else(|| winner.to_string());
            info!("{} is the last one standing", name);
        }

        if now.saturating_duration_since(last_scoreboard) >= Duration::from_secs(1) {
            last_scoreboard = now;
            let background = world.palette().background(session.dark());
            info!(
                "Frame {}: {} cells, {} pellets, heaviest {:.1}, background {:?}",
                totals.frames,
                frame_stats.cells_drawn,
                frame_stats.pellets_drawn,
                frame_stats.heaviest,
                background
            );
            for line in world.scoreboard() {
                info!("  {}", line);
            }
        }
    }

    Ok(totals)
}

/// How long to run for, or `None` to run until Ctrl-C when `secs` does not
/// fit a `Duration`.
fn run_time(secs: f32) -> Option<Duration> {
    match Duration::try_from_secs_f32(secs.max(0.0)) {
        Ok(run_for) => Some(run_for),
        Err(_) => {
            warn!("Invalid run_for_secs {}, running until interrupted", secs);
            None
        }
    }
}
