//! Fixed timestep simulation tick
//!
//! One call advances the field by exactly one step. Stages run in a fixed
//! order and never re-enter; removals happen only in the lifecycle stage and
//! motion is integrated last, so a snapshot taken after `tick` returns is
//! consistent.

use rand::Rng;

use super::events::EventSink;
use super::interact::{insert_rocks, resolve_crafts, resolve_pulses, resolve_projectiles};
use super::lifecycle::{cull_projectiles, cull_pulses, cull_rocks, settle_crafts};
use super::state::{Craft, Projectile, Pulse, RockField};

/// Bodies owned by the caller that take part in one tick
///
/// Any collection may be absent (menu background, spectating); the matching
/// interaction pass is then skipped.
#[derive(Debug, Default)]
pub struct TickInput<'a> {
    pub crafts: Option<&'a mut [Craft]>,
    pub projectiles: Option<&'a mut Vec<Projectile>>,
    pub pulses: Option<&'a mut Vec<Pulse>>,
}

/// Stages of a tick, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    ResetGrid,
    InsertRocks,
    ResolveCrafts,
    ResolveProjectiles,
    ResolvePulses,
    ApplyLifecycle,
    IntegrateMotion,
}

impl TickStage {
    pub const ORDER: [TickStage; 7] = [
        TickStage::ResetGrid,
        TickStage::InsertRocks,
        TickStage::ResolveCrafts,
        TickStage::ResolveProjectiles,
        TickStage::ResolvePulses,
        TickStage::ApplyLifecycle,
        TickStage::IntegrateMotion,
    ];
}

/// Advance the field and the caller's bodies by one timestep
pub fn tick<R: Rng, S: EventSink + ?Sized>(
    field: &mut RockField,
    mut input: TickInput<'_>,
    dt: f32,
    rng: &mut R,
    sink: &mut S,
) {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring tick with invalid dt {}", dt);
        return;
    }

    for stage in TickStage::ORDER {
        run_stage(stage, field, &mut input, dt, rng, sink);
    }
}

fn run_stage<R: Rng, S: EventSink + ?Sized>(
    stage: TickStage,
    field: &mut RockField,
    input: &mut TickInput<'_>,
    dt: f32,
    rng: &mut R,
    sink: &mut S,
) {
    match stage {
        TickStage::ResetGrid => field.grid.clear(),
        TickStage::InsertRocks => insert_rocks(field, dt),
        TickStage::ResolveCrafts => {
            if let Some(crafts) = input.crafts.as_deref_mut() {
                resolve_crafts(field, crafts, dt);
            }
        }
        TickStage::ResolveProjectiles => {
            if let Some(projectiles) = input.projectiles.as_deref_mut() {
                resolve_projectiles(field, projectiles, dt, sink);
            }
        }
        TickStage::ResolvePulses => {
            if let Some(pulses) = input.pulses.as_deref() {
                resolve_pulses(field, pulses, input.crafts.as_deref_mut(), dt, sink);
            }
        }
        TickStage::ApplyLifecycle => {
            cull_rocks(field, rng, sink);
            if let Some(crafts) = input.crafts.as_deref_mut() {
                settle_crafts(crafts, sink);
            }
            if let Some(projectiles) = input.projectiles.as_deref_mut() {
                cull_projectiles(field, projectiles);
            }
            if let Some(pulses) = input.pulses.as_deref_mut() {
                cull_pulses(pulses);
            }
        }
        TickStage::IntegrateMotion => advance_motion(field, input, dt),
    }
}

/// Move every surviving body by its velocity, with no interactions
///
/// Rocks also spin and cycle their phase; crafts decay their shield flash;
/// projectiles age; pulses count down.
pub fn advance_motion(field: &mut RockField, input: &mut TickInput<'_>, dt: f32) {
    let torus = field.torus;
    let phase_rate = field.config.phase_rate;

    for rock in field.rocks.iter_mut().filter(|r| !r.removed) {
        rock.advance(dt, &torus, phase_rate);
    }
    if let Some(crafts) = input.crafts.as_deref_mut() {
        for craft in crafts.iter_mut().filter(|c| !c.dead) {
            craft.advance(dt, &torus);
        }
    }
    if let Some(projectiles) = input.projectiles.as_deref_mut() {
        for bullet in projectiles.iter_mut() {
            bullet.advance(dt, &torus);
        }
    }
    if let Some(pulses) = input.pulses.as_deref_mut() {
        for pulse in pulses.iter_mut() {
            pulse.advance(dt);
        }
    }
}
