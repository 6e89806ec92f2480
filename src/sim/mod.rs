//! Deterministic simulation module
//!
//! All interaction logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the rock collection)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod grid;
pub mod interact;
pub mod kind;
pub mod level;
pub mod lifecycle;
pub mod state;
pub mod tick;
pub mod torus;

pub use collision::{Approach, elastic_impulse, field_impulse};
pub use events::{EventSink, GameEvent, NullSink, total_reward};
pub use grid::SpatialGrid;
pub use interact::{Resolver, merge_rocks};
pub use kind::{DeathKind, FieldKind, KindTraits, RockKind, reward_for};
pub use level::{point_cost, setup_level};
pub use lifecycle::fragment_sizes;
pub use state::{
    Craft, OwnerId, Phase, PhaseCycle, Projectile, Pulse, Rock, RockField, SessionRole, Upgrades,
};
pub use tick::{TickInput, TickStage, advance_motion, tick};
pub use torus::Torus;
