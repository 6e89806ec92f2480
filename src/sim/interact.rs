//! Pairwise interaction passes
//!
//! Rock pairs are resolved as rocks are inserted into the grid. Crafts,
//! projectiles and pulses are never inserted; each one queries the rocks
//! resident in its own 3x3 neighborhood. A rock shows up once per shared cell,
//! so field forces compound for bodies near cell boundaries. A collision is
//! applied again only while the pair is still closing after the previous
//! application, which happens for heavily dampened crafts.

use glam::Vec2;

use super::collision::{Approach, elastic_impulse, field_impulse, weighted_blend};
use super::events::EventSink;
use super::kind::{FieldKind, reward_for};
use super::state::{Craft, Projectile, Pulse, Rock, RockField};
use super::torus::Torus;
use crate::config::EngineConfig;
use crate::consts::*;
use crate::is_finite_vec;

/// Shared per-tick context for the pair resolvers
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub torus: &'a Torus,
    pub config: &'a EngineConfig,
    pub dt: f32,
}

impl Resolver<'_> {
    /// Rock `resident` (already in the cell) against rock `newcomer`
    pub fn resolve_rock_pair(&self, resident: &mut Rock, newcomer: &mut Rock) {
        if resident.removed || newcomer.removed {
            return;
        }
        // Solid and intangible rocks pass through each other
        if resident.is_phased() != newcomer.is_phased() {
            return;
        }

        let approach = Approach::measure(
            self.torus,
            resident.pos,
            resident.vel,
            newcomer.pos,
            newcomer.vel,
            self.dt,
        );

        if approach.collides(resident.radius + newcomer.radius) {
            let both_clump = resident.kind.traits().merges && newcomer.kind.traits().merges;
            if both_clump && resident.size + newcomer.size <= MAX_ROCK_SIZE {
                if newcomer.size > resident.size {
                    merge_rocks(self.torus, newcomer, resident);
                } else {
                    merge_rocks(self.torus, resident, newcomer);
                }
                return;
            }

            let (dv_a, dv_b) = elastic_impulse(
                resident.vel,
                resident.mass,
                newcomer.vel,
                newcomer.mass,
                approach.normal(),
            );
            resident.vel += dv_a;
            newcomer.vel += dv_b;
        }

        let strength =
            self.field_strength(resident, &approach) + self.field_strength(newcomer, &approach);
        if strength != 0.0 {
            let (dv_a, dv_b) =
                field_impulse(strength, resident.mass, newcomer.mass, approach.normal());
            resident.vel += dv_a;
            newcomer.vel += dv_b;
        }
    }

    /// Signed Repulser/Gravitic contribution of `rock` for this pair (0 if out of range)
    fn field_strength(&self, rock: &Rock, approach: &Approach) -> f32 {
        let sign = match rock.kind.traits().field {
            FieldKind::Repel => 1.0,
            FieldKind::Attract => -1.0,
            FieldKind::None | FieldKind::Magnetic => return 0.0,
        };
        if approach.current > rock.influence_radius() {
            return 0.0;
        }
        sign * (rock.field_reach() - approach.projected) * self.config.field_strength * self.dt
    }

    /// Craft against a rock from its neighborhood
    pub fn resolve_craft_rock(&self, craft: &mut Craft, rock: &mut Rock) {
        if craft.dead || rock.removed || rock.is_phased() {
            return;
        }

        let approach = Approach::measure(
            self.torus, rock.pos, rock.vel, craft.pos, craft.vel, self.dt,
        );

        if approach.collides(rock.radius + craft.radius()) {
            let (dv_rock, dv_craft) = elastic_impulse(
                rock.vel,
                rock.mass,
                craft.vel,
                craft.mass(),
                approach.normal(),
            );
            rock.vel += dv_rock;
            self.jolt_craft(craft, dv_craft);
        }

        match rock.kind.traits().field {
            FieldKind::Magnetic => {
                if approach.current <= rock.influence_radius() {
                    let pull = (rock.field_reach() - approach.projected)
                        * self.config.magnet_strength
                        * self.dt;
                    rock.vel += approach.normal() * pull;
                }
            }
            FieldKind::Repel | FieldKind::Attract => {
                let strength = self.field_strength(rock, &approach);
                if strength != 0.0 {
                    let (dv_rock, dv_craft) =
                        field_impulse(strength, rock.mass, craft.mass(), approach.normal());
                    rock.vel += dv_rock;
                    craft.vel += dv_craft;
                }
            }
            FieldKind::None => {}
        }
    }

    /// Two crafts bumping into each other
    pub fn resolve_craft_pair(&self, a: &mut Craft, b: &mut Craft) {
        if a.dead || b.dead {
            return;
        }
        let approach = Approach::measure(self.torus, a.pos, a.vel, b.pos, b.vel, self.dt);
        if !approach.collides(a.radius() + b.radius()) {
            return;
        }
        let (dv_a, dv_b) = elastic_impulse(a.vel, a.mass(), b.vel, b.mass(), approach.normal());
        self.jolt_craft(a, dv_a);
        self.jolt_craft(b, dv_b);
    }

    /// Apply an impact velocity change to a craft, dampened, and charge energy for it
    fn jolt_craft(&self, craft: &mut Craft, dv: Vec2) {
        let dv = dv * craft.dampening_scale(self.config.dampening_step);
        craft.vel += dv;
        let damage = dv.length()
            * self.config.collision_damage
            * craft.hardness_scale(self.config.hardness_step);
        if craft.take_damage(damage) {
            log::debug!("Craft {} destroyed by impact", craft.id);
        }
    }

    /// Bullet against a rock; returns true on impact
    pub fn resolve_projectile_rock<S: EventSink + ?Sized>(
        &self,
        bullet: &mut Projectile,
        rock: &mut Rock,
        sink: &mut S,
    ) -> bool {
        if bullet.is_spent() || bullet.is_expired() {
            return false;
        }
        if rock.removed || rock.is_depleted() || rock.is_credited(bullet.id) {
            return false;
        }
        if rock.is_phased() {
            return false;
        }

        let approach = Approach::measure(
            self.torus, rock.pos, rock.vel, bullet.pos, bullet.vel, self.dt,
        );
        if approach.projected >= rock.radius {
            return false;
        }

        let hp_before = rock.hp;
        rock.hp -= bullet.damage;
        let applied = bullet.damage.min(hp_before);
        rock.credit(bullet.id);
        bullet.absorb_impact(applied);
        sink.visual_effect(bullet.pos, rock.vel, 1);

        if rock.is_depleted() {
            sink.reward(bullet.owner, reward_for(rock.kind, rock.size));
        }
        true
    }

    /// Detonated pulse against a rock; returns true when the rock was caught
    pub fn resolve_pulse_rock<S: EventSink + ?Sized>(
        &self,
        pulse: &Pulse,
        rock: &mut Rock,
        sink: &mut S,
    ) -> bool {
        if !pulse.is_active() || rock.removed {
            return false;
        }
        let next = rock.pos + rock.vel * self.dt;
        if self.torus.distance(pulse.pos, next) > pulse.radius {
            return false;
        }

        let was_alive = !rock.is_depleted();
        rock.hp -= pulse.size as f32 * self.config.pulse_damage_per_size;
        if was_alive && rock.is_depleted() {
            if let Some(owner) = pulse.owner {
                sink.reward(owner, reward_for(rock.kind, rock.size));
            }
        }
        true
    }

    /// Detonated pulse against a craft
    pub fn resolve_pulse_craft(&self, pulse: &Pulse, craft: &mut Craft) {
        if !pulse.is_active() || craft.dead {
            return;
        }
        let next = craft.pos + craft.vel * self.dt;
        if self.torus.distance(pulse.pos, next) > pulse.radius {
            return;
        }
        let damage = pulse.size as f32
            * self.config.pulse_damage_per_size
            * craft.hardness_scale(self.config.hardness_step);
        if craft.take_damage(damage) {
            log::debug!("Craft {} destroyed by pulse {}", craft.id, pulse.id);
        }
    }
}

/// Fold `absorbed` into `absorber`: sizes add, position and velocity become
/// the size-weighted average. Hit points stay with the absorber.
pub fn merge_rocks(torus: &Torus, absorber: &mut Rock, absorbed: &mut Rock) {
    let w_a = absorber.size as f32;
    let w_b = absorbed.size as f32;
    let other_pos = torus.nearest_image(absorber.pos, absorbed.pos);

    absorber.pos = torus.wrap(weighted_blend(absorber.pos, w_a, other_pos, w_b));
    absorber.vel = weighted_blend(absorber.vel, w_a, absorbed.vel, w_b);
    absorber.size += absorbed.size;
    absorber.radius = RADIUS_PER_SIZE * absorber.size as f32;
    absorber.mass = MASS_PER_SIZE * absorber.size as f32;
    absorbed.removed = true;
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Insert every live rock into the (already cleared) grid, resolving each
/// against the rocks that reached a shared cell before it
pub(crate) fn insert_rocks(field: &mut RockField, dt: f32) {
    let RockField {
        config,
        torus,
        rocks,
        grid,
        ..
    } = field;
    let resolver = Resolver { torus, config, dt };

    for idx in 0..rocks.len() {
        if rocks[idx].removed {
            continue;
        }
        if rocks[idx].is_corrupt() {
            log::warn!("Rock {} has a non-finite position or velocity, culling", rocks[idx].id);
            rocks[idx].removed = true;
            continue;
        }
        let pos = rocks[idx].pos;
        grid.insert_with(idx, pos, |newcomer, resident| {
            let (resident, newcomer) = pair_mut(rocks, resident, newcomer);
            resolver.resolve_rock_pair(resident, newcomer);
        });
    }
}

/// Crafts against nearby rocks, then against each other
pub(crate) fn resolve_crafts(field: &mut RockField, crafts: &mut [Craft], dt: f32) {
    let RockField {
        config,
        torus,
        rocks,
        grid,
        ..
    } = field;
    let resolver = Resolver { torus, config, dt };

    for craft in crafts.iter_mut() {
        if craft.dead {
            continue;
        }
        if !is_finite_vec(craft.pos) || !is_finite_vec(craft.vel) {
            log::warn!("Craft {} has a non-finite position or velocity, skipping", craft.id);
            continue;
        }
        for idx in grid.query(craft.pos) {
            resolver.resolve_craft_rock(craft, &mut rocks[idx]);
        }
    }

    for i in 0..crafts.len() {
        for j in (i + 1)..crafts.len() {
            let (a, b) = pair_mut(crafts, i, j);
            resolver.resolve_craft_pair(a, b);
        }
    }
}

/// Projectiles against nearby rocks
pub(crate) fn resolve_projectiles<S: EventSink + ?Sized>(
    field: &mut RockField,
    projectiles: &mut [Projectile],
    dt: f32,
    sink: &mut S,
) {
    let RockField {
        config,
        torus,
        rocks,
        grid,
        ..
    } = field;
    let resolver = Resolver { torus, config, dt };

    for bullet in projectiles.iter_mut() {
        // Expired bullets wait for the lifecycle stage; they no longer hit
        if bullet.is_spent() || bullet.is_expired() || !is_finite_vec(bullet.pos) {
            continue;
        }
        for idx in grid.query(bullet.pos) {
            resolver.resolve_projectile_rock(bullet, &mut rocks[idx], sink);
            if bullet.is_spent() {
                break;
            }
        }
    }
}

/// Detonated pulses against nearby rocks and all crafts. Each pulse damages a
/// given rock at most once even though the rock sits in several queried cells.
pub(crate) fn resolve_pulses<S: EventSink + ?Sized>(
    field: &mut RockField,
    pulses: &[Pulse],
    mut crafts: Option<&mut [Craft]>,
    dt: f32,
    sink: &mut S,
) {
    let RockField {
        config,
        torus,
        rocks,
        grid,
        ..
    } = field;
    let resolver = Resolver { torus, config, dt };
    let mut caught: Vec<usize> = Vec::new();

    for pulse in pulses.iter().filter(|p| p.is_active()) {
        caught.clear();
        for idx in grid.query(pulse.pos) {
            if caught.contains(&idx) {
                continue;
            }
            if resolver.resolve_pulse_rock(pulse, &mut rocks[idx], sink) {
                caught.push(idx);
            }
        }
        if let Some(crafts) = crafts.as_deref_mut() {
            for craft in crafts.iter_mut() {
                resolver.resolve_pulse_craft(pulse, craft);
            }
        }
    }
}
