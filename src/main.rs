//! Rockstorm headless runner
//!
//! Sets up a level, sprays a few projectiles from a stationary craft and runs
//! the field for a while, logging what happened. Set `RUST_LOG` for detail.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use rockstorm::consts::*;
use rockstorm::sim::{
    Craft, GameEvent, Projectile, Pulse, RockField, RockKind, SessionRole, TickInput,
    setup_level, tick, total_reward,
};
use rockstorm::{EngineConfig, unit_from_angle};

const PLAYER: u32 = 1;
const BULLET_SPEED: f32 = 600.0;
const BULLET_DAMAGE: f32 = 15.0;
const BULLET_LIFETIME: f32 = 1.5;
/// Delay between a pulse request and its detonation
const PULSE_FUSE: f32 = 0.1;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "rockstorm")]
#[command(about = "Run the asteroid interaction core headless and log the outcome")]
struct Args {
    /// JSON engine config (missing keys keep their defaults)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// RNG seed for level setup and fragmentation
    #[arg(short, long, default_value_t = 0x5eed)]
    seed: u64,

    /// Point budget for the level
    #[arg(short, long, default_value_t = 60)]
    budget: i32,

    /// Number of ticks to run (50 per second)
    #[arg(short, long, default_value_t = 50 * 30)]
    ticks: usize,

    /// Projectiles fired per volley, one volley per second
    #[arg(short, long, default_value_t = 12)]
    volley: usize,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Rockstorm (headless) starting with {:?}", args);

    let config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut field = match RockField::new(config) {
        Ok(field) => field,
        Err(e) => {
            log::error!("Invalid engine config: {}", e);
            std::process::exit(1);
        }
    };
    field.role = SessionRole::Host;

    run(&mut field, &args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is a library on the web; there is no headless runner
}

#[cfg(not(target_arch = "wasm32"))]
fn run(field: &mut RockField, args: &Args) {
    let mut rng = Pcg32::seed_from_u64(args.seed);
    let spawned = setup_level(field, &RockKind::ALL, args.budget, &mut rng);
    let starting_size = field.total_size();

    let center = Vec2::new(field.torus.width, field.torus.height) * 0.5;
    let mut crafts = vec![Craft::new(field.next_entity_id(), PLAYER, center)];
    crafts[0].is_local = true;

    let mut projectiles: Vec<Projectile> = Vec::new();
    let mut pulses: Vec<Pulse> = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();
    let mut reward = 0;

    for step in 0..args.ticks {
        // A full circle of bullets once a second
        if step % 50 == 0 && !crafts[0].dead && args.volley > 0 {
            for i in 0..args.volley {
                let theta = std::f32::consts::TAU * i as f32 / args.volley as f32;
                let dir = unit_from_angle(theta);
                let id = field.next_entity_id();
                let mut bullet = Projectile::new(
                    id,
                    PLAYER,
                    center + dir * crafts[0].radius() * 2.0,
                    dir * BULLET_SPEED,
                    BULLET_DAMAGE,
                    BULLET_LIFETIME,
                );
                bullet.shrapnel = 3;
                projectiles.push(bullet);
            }
        }

        events.clear();
        let input = TickInput {
            crafts: Some(crafts.as_mut_slice()),
            projectiles: Some(&mut projectiles),
            pulses: Some(&mut pulses),
        };
        tick(field, input, SIM_DT, &mut rng, &mut events);

        // The host turns pulse requests into live pulses for the next tick
        for event in &events {
            if let GameEvent::Pulse { pos, size, owner } = *event {
                let pulse = field.make_pulse(pos, size, PULSE_FUSE, owner);
                pulses.push(pulse);
            }
        }
        reward += total_reward(&events, PLAYER);

        let local_died = events
            .iter()
            .any(|e| matches!(e, GameEvent::LocalCraftDied { .. }));
        if local_died {
            log::info!("Player craft destroyed at tick {}", step);
        }
        if field.rocks.is_empty() {
            log::info!("Field cleared at tick {}", step);
            break;
        }
    }

    log::info!(
        "Spawned {} rocks (total size {}); {} rocks left (total size {})",
        spawned,
        starting_size,
        field.rocks.len(),
        field.total_size()
    );
    log::info!(
        "Player energy {:.1}/{:.1}, reward {}",
        crafts[0].energy,
        crafts[0].max_energy,
        reward
    );
}
