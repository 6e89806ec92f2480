//! Body model and engine state
//!
//! All bodies are plain values held in flat, insertion-ordered collections.
//! Rocks are owned by [`RockField`]; crafts, projectiles and pulses are owned by
//! the caller and lent to the engine for the duration of one tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::SpatialGrid;
use super::kind::RockKind;
use super::torus::Torus;
use crate::config::EngineConfig;
use crate::consts::*;
use crate::error::ConfigError;
use crate::is_finite_vec;

/// Identity of a player for reward attribution
pub type OwnerId = u32;

/// Direction the phase value is currently moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseCycle {
    /// Phase decreasing toward 0 (going intangible)
    Fading,
    /// Phase increasing toward 255 (becoming solid)
    Solidifying,
}

/// Solid/intangible cycle of a rock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// 0..=255, solid at or above `PHASE_SOLID`
    pub value: f32,
    pub cycle: PhaseCycle,
}

impl Phase {
    /// Fully solid, about to start fading
    pub fn solid() -> Self {
        Self {
            value: PHASE_MAX,
            cycle: PhaseCycle::Fading,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.value >= PHASE_SOLID
    }

    /// Move the phase by `amount` units, flipping direction at either extreme
    pub fn advance(&mut self, amount: f32) {
        match self.cycle {
            PhaseCycle::Fading => {
                self.value -= amount;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.cycle = PhaseCycle::Solidifying;
                }
            }
            PhaseCycle::Solidifying => {
                self.value += amount;
                if self.value >= PHASE_MAX {
                    self.value = PHASE_MAX;
                    self.cycle = PhaseCycle::Fading;
                }
            }
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::solid()
    }
}

/// An asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub id: u32,
    pub kind: RockKind,
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub angle: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub hp: f32,
    pub mass: f32,
    pub radius: f32,
    /// Size class, 1..=5
    pub size: u8,
    pub phase: Phase,
    /// Projectiles that already dealt damage to this rock
    #[serde(default)]
    pub credited: Vec<u32>,
    /// Flagged for removal at the end of the tick
    #[serde(default)]
    pub removed: bool,
}

impl Rock {
    /// Build a rock with every type-dependent field derived from `kind` and `size`
    pub fn new(id: u32, kind: RockKind, size: u8, pos: Vec2, vel: Vec2) -> Self {
        let traits = kind.traits();
        let size = size.clamp(1, MAX_ROCK_SIZE);
        Self {
            id,
            kind,
            pos,
            vel,
            angle: 0.0,
            rotation_speed: 0.0,
            hp: traits.hp_per_size * size as f32,
            mass: MASS_PER_SIZE * size as f32 * traits.mass_scale,
            radius: RADIUS_PER_SIZE * size as f32,
            size,
            phase: Phase::solid(),
            credited: Vec::new(),
            removed: false,
        }
    }

    /// Intangible (phase below the solid threshold)
    #[inline]
    pub fn is_phased(&self) -> bool {
        !self.phase.is_solid()
    }

    /// Out of hit points
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// Position or velocity went non-finite
    #[inline]
    pub fn is_corrupt(&self) -> bool {
        !is_finite_vec(self.pos) || !is_finite_vec(self.vel)
    }

    /// Range inside which this rock's field acts
    #[inline]
    pub fn influence_radius(&self) -> f32 {
        INFLUENCE_PER_SIZE * self.size as f32
    }

    /// Distance at which this rock's field strength falls to zero
    #[inline]
    pub fn field_reach(&self) -> f32 {
        FIELD_REACH_PER_SIZE * self.size as f32
    }

    pub fn is_credited(&self, projectile_id: u32) -> bool {
        self.credited.contains(&projectile_id)
    }

    pub fn credit(&mut self, projectile_id: u32) {
        if !self.is_credited(projectile_id) {
            self.credited.push(projectile_id);
        }
    }

    /// Advance position, rotation and phase by `dt`
    pub fn advance(&mut self, dt: f32, torus: &Torus, phase_rate: f32) {
        self.pos = torus.wrap(self.pos + self.vel * dt);
        self.angle = (self.angle + self.rotation_speed * dt).rem_euclid(std::f32::consts::TAU);
        if self.kind.traits().phases {
            self.phase.advance(phase_rate * dt);
        }
    }
}

/// Upgrade levels of a craft (0 = stock)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub thrust: u8,
    pub turning: u8,
    pub hardness: u8,
    pub dampening: u8,
}

/// Stock craft acceleration (units/sec²)
pub const CRAFT_BASE_ACCEL: f32 = 200.0;
/// Stock craft turn rate (radians/sec)
pub const CRAFT_BASE_TURN: f32 = 3.5;
/// Stock craft energy
pub const CRAFT_BASE_ENERGY: f32 = 100.0;

/// A player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub id: u32,
    pub owner: OwnerId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub energy: f32,
    pub max_energy: f32,
    /// Size class, drives radius and mass
    pub size: u8,
    pub upgrades: Upgrades,
    /// Controlled by this participant
    pub is_local: bool,
    pub dead: bool,
    /// Died this tick, death effects not yet emitted
    #[serde(skip)]
    pub pending_death: bool,
    /// Seconds left on the shield flash
    #[serde(default)]
    pub shield_flash: f32,
}

impl Craft {
    pub fn new(id: u32, owner: OwnerId, pos: Vec2) -> Self {
        Self {
            id,
            owner,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            energy: CRAFT_BASE_ENERGY,
            max_energy: CRAFT_BASE_ENERGY,
            size: 1,
            upgrades: Upgrades::default(),
            is_local: false,
            dead: false,
            pending_death: false,
            shield_flash: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        CRAFT_RADIUS_PER_SIZE * self.size as f32
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        CRAFT_MASS_PER_SIZE * self.size as f32
    }

    pub fn acceleration(&self) -> f32 {
        CRAFT_BASE_ACCEL * (1.0 + 0.2 * self.upgrades.thrust as f32)
    }

    pub fn turn_rate(&self) -> f32 {
        CRAFT_BASE_TURN * (1.0 + 0.2 * self.upgrades.turning as f32)
    }

    /// Multiplier on incoming damage
    #[inline]
    pub fn hardness_scale(&self, step: f32) -> f32 {
        1.0 / (1.0 + self.upgrades.hardness as f32 * step)
    }

    /// Multiplier on velocity change taken from impacts
    #[inline]
    pub fn dampening_scale(&self, step: f32) -> f32 {
        1.0 / (1.0 + self.upgrades.dampening as f32 * step)
    }

    /// Accelerate along the facing direction
    pub fn thrust(&mut self, dt: f32) {
        self.vel += crate::unit_from_angle(self.angle) * self.acceleration() * dt;
    }

    /// Rotate; `direction` in [-1, 1]
    pub fn turn(&mut self, direction: f32, dt: f32) {
        self.angle += direction.clamp(-1.0, 1.0) * self.turn_rate() * dt;
    }

    /// Drain energy; returns true on the single alive-to-dead transition
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.shield_flash = SHIELD_FLASH_SECS;
        if self.energy - amount < 0.0 {
            self.energy = 0.0;
            self.dead = true;
            self.pending_death = true;
            true
        } else {
            self.energy -= amount;
            false
        }
    }

    pub fn advance(&mut self, dt: f32, torus: &Torus) {
        self.pos = torus.wrap(self.pos + self.vel * dt);
        self.shield_flash = (self.shield_flash - dt).max(0.0);
    }
}

/// A bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: OwnerId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Damage left to deal
    pub damage: f32,
    pub scale: f32,
    /// Higher levels keep more damage after each impact
    pub penetration: u8,
    /// Children spawned on natural expiry
    pub shrapnel: u8,
    /// Seconds left
    pub lifetime: f32,
}

impl Projectile {
    pub fn new(id: u32, owner: OwnerId, pos: Vec2, vel: Vec2, damage: f32, lifetime: f32) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            damage,
            scale: 1.0,
            penetration: 0,
            shrapnel: 0,
            lifetime,
        }
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.damage <= 0.0
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Lose damage after dealing `applied` to a target
    pub fn absorb_impact(&mut self, applied: f32) {
        self.damage -= applied / (1.0 + self.penetration as f32);
    }

    pub fn advance(&mut self, dt: f32, torus: &Torus) {
        self.pos = torus.wrap(self.pos + self.vel * dt);
        self.lifetime -= dt;
    }
}

/// A delayed area blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub id: u32,
    pub pos: Vec2,
    pub size: u8,
    pub radius: f32,
    /// Seconds until detonation
    pub countdown: f32,
    /// None for ambient (death) pulses
    pub owner: Option<OwnerId>,
}

impl Pulse {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.countdown <= 0.0
    }

    pub fn advance(&mut self, dt: f32) {
        self.countdown = (self.countdown - dt).max(0.0);
    }
}

/// Which side of a networked session this engine runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionRole {
    /// Single player, no network
    #[default]
    Offline,
    /// Authoritative participant
    Host,
    /// Mirrors the host; never mutates the rock population itself
    Client,
}

impl SessionRole {
    #[inline]
    pub fn is_authoritative(self) -> bool {
        self != SessionRole::Client
    }
}

/// The rock population plus the machinery to run it
#[derive(Debug, Clone)]
pub struct RockField {
    pub config: EngineConfig,
    pub torus: Torus,
    pub role: SessionRole,
    /// Live rocks in insertion order
    pub rocks: Vec<Rock>,
    pub(crate) grid: SpatialGrid,
    next_id: u32,
}

impl RockField {
    /// Create an empty field from a validated config
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: EngineConfig) -> Self {
        Self {
            torus: Torus::new(config.world_width, config.world_height),
            grid: SpatialGrid::new(config.grid_cols(), config.grid_rows(), config.cell_size),
            config,
            role: SessionRole::Offline,
            rocks: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (shared by rocks, projectiles and pulses)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a rock and return its id
    pub fn spawn_rock(&mut self, kind: RockKind, size: u8, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        let pos = self.torus.wrap(pos);
        self.rocks.push(Rock::new(id, kind, size, pos, vel));
        id
    }

    /// Build a pulse with its radius derived from `size`
    pub fn make_pulse(
        &mut self,
        pos: Vec2,
        size: u8,
        countdown: f32,
        owner: Option<OwnerId>,
    ) -> Pulse {
        Pulse {
            id: self.next_entity_id(),
            pos,
            size,
            radius: size as f32 * self.config.pulse_radius_per_size,
            countdown,
            owner,
        }
    }

    pub fn rock(&self, id: u32) -> Option<&Rock> {
        self.rocks.iter().find(|r| r.id == id)
    }

    /// Sum of size classes over all live rocks
    pub fn total_size(&self) -> u32 {
        self.rocks
            .iter()
            .filter(|r| !r.removed)
            .map(|r| r.size as u32)
            .sum()
    }
}

impl Default for RockField {
    fn default() -> Self {
        Self::from_valid(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rock_fields_from_kind() {
        let rock = Rock::new(1, RockKind::Dense, 4, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(rock.hp, 200.0);
        assert_eq!(rock.radius, 64.0);
        assert_eq!(rock.mass, 4.0 * MASS_PER_SIZE * 3.0);
        assert!(!rock.is_phased());

        let clumpy = Rock::new(2, RockKind::Clumpy, 2, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(clumpy.mass, 600.0);
        assert_eq!(clumpy.influence_radius(), 128.0);
        assert_eq!(clumpy.field_reach(), 192.0);
    }

    #[test]
    fn test_phase_cycle_flips_at_extremes() {
        let mut phase = Phase::solid();
        phase.advance(200.0);
        assert_eq!(phase.cycle, PhaseCycle::Fading);
        assert!(!phase.is_solid());
        phase.advance(100.0);
        assert_eq!(phase.value, 0.0);
        assert_eq!(phase.cycle, PhaseCycle::Solidifying);
        phase.advance(300.0);
        assert_eq!(phase.value, PHASE_MAX);
        assert_eq!(phase.cycle, PhaseCycle::Fading);
    }

    #[test]
    fn test_only_phasing_rocks_cycle() {
        let torus = Torus::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut generic = Rock::new(1, RockKind::Generic, 1, Vec2::ZERO, Vec2::ZERO);
        let mut phasing = Rock::new(2, RockKind::Phasing, 1, Vec2::ZERO, Vec2::ZERO);
        generic.advance(1.0, &torus, 128.0);
        phasing.advance(1.0, &torus, 128.0);
        assert_eq!(generic.phase.value, PHASE_MAX);
        assert_eq!(phasing.phase.value, PHASE_MAX - 128.0);
    }

    #[test]
    fn test_rock_wraps_on_advance() {
        let torus = Torus::new(WORLD_WIDTH, WORLD_HEIGHT);
        let mut rock =
            Rock::new(1, RockKind::Generic, 1, Vec2::new(5.0, 5.0), Vec2::new(-10.0, 0.0));
        rock.advance(1.0, &torus, 0.0);
        assert_eq!(rock.pos, Vec2::new(WORLD_WIDTH - 5.0, 5.0));
    }

    #[test]
    fn test_craft_dies_exactly_once() {
        let mut craft = Craft::new(1, 7, Vec2::ZERO);
        assert!(!craft.take_damage(60.0));
        assert_eq!(craft.energy, 40.0);
        assert!(craft.take_damage(50.0));
        assert!(craft.dead);
        assert_eq!(craft.energy, 0.0);
        assert!(!craft.take_damage(50.0));
        assert_eq!(craft.energy, 0.0);
    }

    #[test]
    fn test_craft_upgrades_scale() {
        let mut craft = Craft::new(1, 7, Vec2::ZERO);
        craft.upgrades.hardness = 2;
        craft.upgrades.dampening = 4;
        assert_eq!(craft.hardness_scale(0.5), 0.5);
        assert_eq!(craft.dampening_scale(0.25), 0.5);

        craft.upgrades.thrust = 5;
        craft.thrust(0.5);
        assert!((craft.vel.x - CRAFT_BASE_ACCEL).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_penetration_keeps_damage() {
        let mut bullet = Projectile::new(1, 7, Vec2::ZERO, Vec2::ZERO, 10.0, 1.0);
        bullet.penetration = 1;
        bullet.absorb_impact(4.0);
        assert_eq!(bullet.damage, 8.0);
        bullet.penetration = 0;
        bullet.absorb_impact(8.0);
        assert!(bullet.is_spent());
    }

    #[test]
    fn test_pulse_countdown_clamps() {
        let mut field = RockField::default();
        let mut pulse = field.make_pulse(Vec2::ZERO, 2, 0.05, None);
        assert_eq!(pulse.radius, 96.0);
        assert!(!pulse.is_active());
        pulse.advance(0.1);
        assert_eq!(pulse.countdown, 0.0);
        assert!(pulse.is_active());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut field = RockField::default();
        let a = field.spawn_rock(RockKind::Generic, 1, Vec2::ZERO, Vec2::ZERO);
        let b = field.next_entity_id();
        assert_ne!(a, b);
        assert!(field.rock(a).is_some());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EngineConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(RockField::new(config).is_err());
    }
}
