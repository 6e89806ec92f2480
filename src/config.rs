//! Engine configuration
//!
//! Runtime tunables for the interaction core. Every field defaults to the
//! matching compile-time value, so a JSON file only needs to name the values it
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === World ===
    /// World width (multiple of `cell_size`)
    pub world_width: f32,
    /// World height (multiple of `cell_size`)
    pub world_height: f32,
    /// Spatial grid cell edge
    pub cell_size: f32,

    // === Fields ===
    /// Repulser/Gravitic force per unit of falloff
    pub field_strength: f32,
    /// Magnetic pull per unit of falloff
    pub magnet_strength: f32,

    // === Craft ===
    /// Energy lost per unit of absorbed velocity change
    pub collision_damage: f32,
    /// Damage reduction per hardness level
    pub hardness_step: f32,
    /// Velocity-change reduction per inertial dampening level
    pub dampening_step: f32,

    // === Fragments ===
    /// Outward impulse given to fragments
    pub fragment_impulse: f32,
    /// Outward impulse given to Zippy fragments
    pub zippy_fragment_impulse: f32,

    // === Pulses ===
    /// Damage dealt per pulse size
    pub pulse_damage_per_size: f32,
    /// Blast radius per pulse size
    pub pulse_radius_per_size: f32,

    // === Phasing ===
    /// Phase units per second
    pub phase_rate: f32,

    // === Level setup ===
    /// Smallest size class for spawned rocks
    pub spawn_min_size: u8,
    /// Largest size class for spawned rocks
    pub spawn_max_size: u8,
    /// Width of the spawn band along each world edge, as a fraction of the dimension
    pub spawn_edge_band: f32,
    /// Spawn speed range (units/sec)
    pub spawn_min_speed: f32,
    pub spawn_max_speed: f32,

    // === Projectiles ===
    /// Lifetime of shrapnel children (seconds)
    pub shrapnel_lifetime: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            cell_size: CELL_SIZE,

            field_strength: 2.0,
            magnet_strength: 1.5,

            collision_damage: 0.1,
            hardness_step: 0.5,
            dampening_step: 0.25,

            fragment_impulse: 75.0,
            zippy_fragment_impulse: 275.0,

            pulse_damage_per_size: 100.0,
            pulse_radius_per_size: 48.0,

            phase_rate: 128.0,

            spawn_min_size: 1,
            spawn_max_size: 4,
            spawn_edge_band: 0.15,
            spawn_min_speed: 20.0,
            spawn_max_speed: 60.0,

            shrapnel_lifetime: 0.3,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text (missing keys keep their defaults)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Number of grid columns
    pub fn grid_cols(&self) -> usize {
        (self.world_width / self.cell_size).round() as usize
    }

    /// Number of grid rows
    pub fn grid_rows(&self) -> usize {
        (self.world_height / self.cell_size).round() as usize
    }

    /// Check every value against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        multiple_of_cell("world_width", self.world_width, self.cell_size)?;
        multiple_of_cell("world_height", self.world_height, self.cell_size)?;

        // Smaller grids alias a 3x3 neighborhood onto itself
        if self.grid_cols() < 3 {
            return Err(ConfigError::Invalid {
                name: "world_width",
                value: self.world_width,
                reason: "must span at least 3 cells",
            });
        }
        if self.grid_rows() < 3 {
            return Err(ConfigError::Invalid {
                name: "world_height",
                value: self.world_height,
                reason: "must span at least 3 cells",
            });
        }

        non_negative("field_strength", self.field_strength)?;
        non_negative("magnet_strength", self.magnet_strength)?;
        non_negative("collision_damage", self.collision_damage)?;
        non_negative("hardness_step", self.hardness_step)?;
        non_negative("dampening_step", self.dampening_step)?;
        non_negative("fragment_impulse", self.fragment_impulse)?;
        non_negative("zippy_fragment_impulse", self.zippy_fragment_impulse)?;
        non_negative("pulse_damage_per_size", self.pulse_damage_per_size)?;
        positive("pulse_radius_per_size", self.pulse_radius_per_size)?;
        positive("phase_rate", self.phase_rate)?;
        positive("shrapnel_lifetime", self.shrapnel_lifetime)?;

        if self.spawn_min_size == 0
            || self.spawn_min_size > self.spawn_max_size
            || self.spawn_max_size > MAX_ROCK_SIZE
        {
            return Err(ConfigError::Invalid {
                name: "spawn_max_size",
                value: self.spawn_max_size as f32,
                reason: "spawn sizes must satisfy 1 <= min <= max <= 5",
            });
        }
        if !(0.0..=0.5).contains(&self.spawn_edge_band) {
            return Err(ConfigError::Invalid {
                name: "spawn_edge_band",
                value: self.spawn_edge_band,
                reason: "must be within [0, 0.5]",
            });
        }
        non_negative("spawn_min_speed", self.spawn_min_speed)?;
        if self.spawn_max_speed < self.spawn_min_speed {
            return Err(ConfigError::Invalid {
                name: "spawn_max_speed",
                value: self.spawn_max_speed,
                reason: "must not be below spawn_min_speed",
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            value,
            reason: "must be positive",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

fn multiple_of_cell(name: &'static str, value: f32, cell: f32) -> Result<(), ConfigError> {
    let cells = value / cell;
    if (cells - cells.round()).abs() < 1e-4 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            value,
            reason: "must be a multiple of cell_size",
        })
    }
}
