//! End-of-tick lifecycle
//!
//! Runs once per tick after every interaction pass. Depleted rocks are turned
//! into fragments or detonations, dead crafts announce themselves, spent
//! projectiles and detonated pulses are dropped. Removals happen here and
//! nowhere else, so no pass ever iterates a collection that is being mutated.

use rand::Rng;

use super::events::EventSink;
use super::kind::DeathKind;
use super::state::{Craft, Projectile, Pulse, Rock, RockField};
use crate::consts::*;
use crate::unit_from_angle;

/// Sizes of the pieces a rock of `size` breaks into
///
/// Each piece is drawn uniformly from `[1, remaining - 1]` until the parent's
/// size is used up; a size-1 rock yields nothing.
pub fn fragment_sizes<R: Rng>(size: u8, rng: &mut R) -> Vec<u8> {
    let mut sizes = Vec::new();
    if size <= 1 {
        return sizes;
    }
    let mut remaining = size;
    while remaining > 0 {
        let piece = if remaining == 1 {
            1
        } else {
            rng.random_range(1..remaining)
        };
        sizes.push(piece);
        remaining -= piece;
    }
    sizes
}

/// Resolve every depleted rock, then drop all flagged rocks
pub(crate) fn cull_rocks<R: Rng, S: EventSink + ?Sized>(
    field: &mut RockField,
    rng: &mut R,
    sink: &mut S,
) {
    let mut spawned: Vec<Rock> = Vec::new();

    for idx in 0..field.rocks.len() {
        let rock = &mut field.rocks[idx];
        if rock.removed || !rock.is_depleted() {
            continue;
        }
        rock.removed = true;
        let parent = rock.clone();

        match parent.kind.traits().death {
            DeathKind::Detonate => {
                log::debug!("Rock {} detonated (size {})", parent.id, parent.size);
                sink.pulse(parent.pos, parent.size, None);
                sink.visual_effect(parent.pos, parent.vel, parent.size.saturating_mul(2));
            }
            DeathKind::Fragment => {
                if parent.size > 1 && field.role.is_authoritative() {
                    let pieces = fragment_sizes(parent.size, rng);
                    log::debug!(
                        "Rock {} (size {}) split into {} fragments",
                        parent.id,
                        parent.size,
                        pieces.len()
                    );
                    for piece in pieces {
                        let fragment = spawn_fragment(field, &parent, piece, rng);
                        spawned.push(fragment);
                    }
                }
            }
        }
    }

    field.rocks.extend(spawned);
    field.rocks.retain(|r| !r.removed);
}

/// One child of `parent`, flung outward at a random angle
fn spawn_fragment<R: Rng>(field: &mut RockField, parent: &Rock, size: u8, rng: &mut R) -> Rock {
    let impulse = if parent.kind.traits().zippy_fragments {
        field.config.zippy_fragment_impulse
    } else {
        field.config.fragment_impulse
    };
    let heading = rng.random_range(0.0..std::f32::consts::TAU);
    let vel = parent.vel + unit_from_angle(heading) * impulse;

    let mut fragment = Rock::new(field.next_entity_id(), parent.kind, size, parent.pos, vel);
    fragment.angle = rng.random_range(0.0..std::f32::consts::TAU);
    fragment.rotation_speed = rng.random_range(-2.0..2.0);
    fragment.phase = parent.phase;
    fragment
}

/// Emit death effects for crafts that died this tick
pub(crate) fn settle_crafts<S: EventSink + ?Sized>(crafts: &mut [Craft], sink: &mut S) {
    for craft in crafts.iter_mut().filter(|c| c.pending_death) {
        craft.pending_death = false;
        log::debug!("Craft {} died at {:?}", craft.id, craft.pos);
        sink.pulse(craft.pos, CRAFT_DEATH_PULSE_SIZE, None);
        if craft.is_local {
            sink.local_craft_died(craft.id);
        }
    }
}

/// Drop spent and expired projectiles; expired ones with damage left burst
/// into shrapnel
pub(crate) fn cull_projectiles(field: &mut RockField, projectiles: &mut Vec<Projectile>) {
    let mut shards: Vec<Projectile> = Vec::new();

    for bullet in projectiles.iter() {
        if bullet.is_spent() || !bullet.is_expired() || bullet.shrapnel == 0 {
            continue;
        }
        let speed = bullet.vel.length();
        let heading = bullet.vel.y.atan2(bullet.vel.x);
        let step = std::f32::consts::TAU / bullet.shrapnel as f32;
        for i in 0..bullet.shrapnel {
            let dir = unit_from_angle(heading + step * i as f32);
            shards.push(Projectile {
                id: field.next_entity_id(),
                owner: bullet.owner,
                pos: bullet.pos,
                vel: dir * speed,
                damage: bullet.damage * 0.5,
                scale: bullet.scale * 0.5,
                penetration: bullet.penetration,
                shrapnel: 0,
                lifetime: field.config.shrapnel_lifetime,
            });
        }
    }

    projectiles.retain(|b| !b.is_spent() && !b.is_expired());
    projectiles.extend(shards);
}

/// Pulses that went off this tick are gone
pub(crate) fn cull_pulses(pulses: &mut Vec<Pulse>) {
    pulses.retain(|p| !p.is_active());
}
