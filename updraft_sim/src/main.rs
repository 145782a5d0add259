//! Headless Updraft flight simulation
//!
//! Launches the player every in-game day, lets gravity and contacts decide
//! how high they get, and logs what the lifecycle core does along the way.
//!
//! Usage: `updraft_sim [config.toml|config.ron] [days]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use updraft_core::config::ConfigError;
use updraft_core::foundation::logging;
use updraft_core::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FLIGHT_SECONDS: f32 = 90.0;
const LAUNCH_SPEED: f32 = 900.0;
const GRAVITY: f32 = 220.0;
const GROUND_Y: f32 = 0.0;

/// Simulation errors
#[derive(Error, Debug)]
enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

struct SimArgs {
    config: LifecycleConfig,
    days: u32,
}

impl SimArgs {
    fn parse() -> Result<Self, SimError> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => {
                log::info!("Loading configuration from {path}");
                LifecycleConfig::load_from_file(&path)?
            }
            None => LifecycleConfig::default(),
        };
        let days = match args.next() {
            Some(days) => days
                .parse()
                .map_err(|_| SimError::Argument(format!("'{days}' is not a day count")))?,
            None => 7,
        };
        Ok(Self { config, days })
    }
}

/// Logs every lifecycle event at a level matching how often it happens
struct EventLog;

impl LifecycleEventHandler for EventLog {
    fn on_event(&mut self, event: &LifecycleEvent) -> bool {
        match event {
            LifecycleEvent::EntityConsumed { variant, .. } => log::debug!("Consumed {variant}"),
            LifecycleEvent::ZoneChanged { from, to } => log::info!("Zone {from:?} -> {to}"),
            other => log::info!("{other:?}"),
        }
        false
    }
}

/// Outcome of one day's flight
#[derive(Debug, Default)]
struct Flight {
    peak_altitude: f32,
    contacts: usize,
    seconds: f32,
}

fn fly(manager: &mut LifecycleManager, state: &mut SessionState, rng: &mut StdRng) -> Flight {
    let mut flight = Flight::default();
    state.player.velocity = Vec2::new(rng.gen_range(-120.0..120.0), -LAUNCH_SPEED);

    while flight.seconds < MAX_FLIGHT_SECONDS {
        // Small random steering once a second
        if (flight.seconds % 1.0) < FRAME_TIME {
            state.player.velocity.x += rng.gen_range(-60.0..60.0);
        }

        let report = manager.update(state, FRAME_TIME);
        flight.contacts += report.consumed.len();
        flight.seconds += FRAME_TIME;
        flight.peak_altitude = flight.peak_altitude.max(state.player_altitude());
        manager.drain_events();

        if state.player_altitude() <= 0.0 && state.player.velocity.y >= 0.0 && flight.seconds > 1.0 {
            break;
        }
    }
    flight
}

fn run() -> Result<(), SimError> {
    let SimArgs { config, days } = SimArgs::parse()?;
    let screen_width = config.spawn.screen_width;
    let ceiling = config.zones.zones.last().map_or(0.0, |zone| zone.max_altitude);
    let seed = config.spawn.rng_seed.unwrap_or(0);

    let bounds = WorldBounds::new(0.0, screen_width, GROUND_Y - ceiling, GROUND_Y);
    let physics = ArcadePhysics::new(bounds)
        .with_gravity(GRAVITY)
        .with_wrap_margin(80.0);
    let mut manager = LifecycleManager::new(config, Box::new(physics), Box::new(MotionTimeline::new()))?;
    manager.register_handler(LifecycleEventKind::ZoneChanged, Box::new(EventLog));
    manager.register_handler(LifecycleEventKind::EntityConsumed, Box::new(EventLog));
    manager.register_handler(LifecycleEventKind::AssetsPurged, Box::new(EventLog));
    manager.register_handler(LifecycleEventKind::PoolReplenished, Box::new(EventLog));
    manager.register_handler(LifecycleEventKind::DayStarted, Box::new(EventLog));

    let mut state = SessionState::new(GROUND_Y, screen_width * 0.5, 18.0);
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..days {
        let flight = fly(&mut manager, &mut state, &mut rng);
        let stats = manager.stats();
        log::info!(
            "Day {}: peak altitude {:.0} in {:.1}s, {} contacts, {} active, {} coins, {:.0} fuel",
            state.day,
            flight.peak_altitude,
            flight.seconds,
            flight.contacts,
            stats.active.total(),
            state.coins,
            state.fuel
        );
        state.next_day();
    }

    let stats = manager.stats();
    log::info!(
        "Pool after {days} days: {} allocated, {} reused, {} destroyed, {} pooled",
        stats.pool.allocated,
        stats.pool.reused,
        stats.pool.destroyed,
        stats.pooled.total()
    );
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);
    log::info!("Starting Updraft simulation");

    if let Err(e) = run() {
        log::error!("Simulation failed: {e}");
        std::process::exit(1);
    }
}
