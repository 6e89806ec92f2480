//! Rockstorm - toroidal asteroid arena interaction core
//!
//! Core modules:
//! - `sim`: Simulation core (spatial grid, collisions, lifecycle, tick)
//! - `config`: Runtime tunables loaded from JSON
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::EngineConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Engine constants
pub mod consts {
    /// Nominal simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Default world dimensions (multiples of `CELL_SIZE`)
    pub const WORLD_WIDTH: f32 = 2560.0;
    pub const WORLD_HEIGHT: f32 = 1920.0;

    /// Grid cell edge: twice the bounding size of the largest rock (5 * 16)
    pub const CELL_SIZE: f32 = 160.0;

    /// Largest size class a rock can reach (through merging)
    pub const MAX_ROCK_SIZE: u8 = 5;
    /// Rock radius per size class
    pub const RADIUS_PER_SIZE: f32 = 16.0;
    /// Rock mass per size class
    pub const MASS_PER_SIZE: f32 = 300.0;
    /// Field influence radius per size class
    pub const INFLUENCE_PER_SIZE: f32 = 64.0;
    /// Field falloff reach per size class (force ~ reach - r)
    pub const FIELD_REACH_PER_SIZE: f32 = 96.0;

    /// Phase at or above this value is solid
    pub const PHASE_SOLID: f32 = 100.0;
    /// Fully solid phase
    pub const PHASE_MAX: f32 = 255.0;

    /// Craft bounding radius per size class
    pub const CRAFT_RADIUS_PER_SIZE: f32 = 12.0;
    /// Craft mass per size class
    pub const CRAFT_MASS_PER_SIZE: f32 = 200.0;
    /// Seconds the shield flash stays lit after a hit
    pub const SHIELD_FLASH_SECS: f32 = 0.25;
    /// Size of the pulse left behind by a destroyed craft
    pub const CRAFT_DEATH_PULSE_SIZE: u8 = 2;
}

/// Wrap a scalar into [0, extent)
#[inline]
pub fn wrap_scalar(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Check that both components of a vector are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
