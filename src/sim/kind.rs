//! Rock types and their per-type parameters
//!
//! Every behaviour that depends on a rock's type is read from a single
//! [`KindTraits`] row, looked up once per body.

use serde::{Deserialize, Serialize};

/// Closed set of rock types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RockKind {
    #[default]
    Generic,
    Clumpy,
    Magnetic,
    Explosive,
    Black,
    Dense,
    Gravitic,
    Zippy,
    Repulser,
    Phasing,
    Gold,
}

impl RockKind {
    /// All kinds, in declaration order
    pub const ALL: [RockKind; 11] = [
        RockKind::Generic,
        RockKind::Clumpy,
        RockKind::Magnetic,
        RockKind::Explosive,
        RockKind::Black,
        RockKind::Dense,
        RockKind::Gravitic,
        RockKind::Zippy,
        RockKind::Repulser,
        RockKind::Phasing,
        RockKind::Gold,
    ];

    /// Parameter row for this kind
    pub fn traits(self) -> &'static KindTraits {
        match self {
            RockKind::Generic => &GENERIC,
            RockKind::Clumpy => &CLUMPY,
            RockKind::Magnetic => &MAGNETIC,
            RockKind::Explosive => &EXPLOSIVE,
            RockKind::Black => &BLACK,
            RockKind::Dense => &DENSE,
            RockKind::Gravitic => &GRAVITIC,
            RockKind::Zippy => &ZIPPY,
            RockKind::Repulser => &REPULSER,
            RockKind::Phasing => &PHASING,
            RockKind::Gold => &GOLD,
        }
    }
}

/// Long-range field a rock projects onto its neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    None,
    /// Pulls itself toward craft only (one-sided)
    Magnetic,
    /// Pushes both bodies apart
    Repel,
    /// Pulls both bodies together
    Attract,
}

/// What happens to a rock once its hit points are gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathKind {
    /// Splits into smaller rocks of the same kind
    Fragment,
    /// Requests a pulse and vanishes
    Detonate,
}

/// Per-kind parameter row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindTraits {
    pub field: FieldKind,
    pub death: DeathKind,
    /// Clumpy rocks merge on contact instead of bouncing
    pub merges: bool,
    /// Phasing rocks cycle between solid and intangible
    pub phases: bool,
    /// Reward per size class when destroyed
    pub base_reward: u32,
    /// Hit points per size class
    pub hp_per_size: f32,
    /// Mass multiplier on top of the per-size mass
    pub mass_scale: f32,
    /// Spawn speed multiplier
    pub speed_scale: f32,
    /// Level-setup cost per size class
    pub cost_per_size: u32,
    /// Fragments receive the boosted impulse
    pub zippy_fragments: bool,
}

const BASE: KindTraits = KindTraits {
    field: FieldKind::None,
    death: DeathKind::Fragment,
    merges: false,
    phases: false,
    base_reward: 50,
    hp_per_size: 20.0,
    mass_scale: 1.0,
    speed_scale: 1.0,
    cost_per_size: 1,
    zippy_fragments: false,
};

const GENERIC: KindTraits = KindTraits {
    base_reward: 15,
    hp_per_size: 5.0,
    ..BASE
};
const CLUMPY: KindTraits = KindTraits {
    merges: true,
    base_reward: 10,
    hp_per_size: 10.0,
    ..BASE
};
const MAGNETIC: KindTraits = KindTraits {
    field: FieldKind::Magnetic,
    hp_per_size: 10.0,
    cost_per_size: 2,
    ..BASE
};
const EXPLOSIVE: KindTraits = KindTraits {
    death: DeathKind::Detonate,
    base_reward: 40,
    cost_per_size: 2,
    ..BASE
};
const BLACK: KindTraits = KindTraits {
    base_reward: 30,
    hp_per_size: 5.0,
    ..BASE
};
const DENSE: KindTraits = KindTraits {
    base_reward: 30,
    hp_per_size: 50.0,
    mass_scale: 3.0,
    speed_scale: 0.6,
    cost_per_size: 2,
    ..BASE
};
const GRAVITIC: KindTraits = KindTraits {
    field: FieldKind::Attract,
    base_reward: 40,
    hp_per_size: 10.0,
    cost_per_size: 2,
    ..BASE
};
const ZIPPY: KindTraits = KindTraits {
    base_reward: 15,
    hp_per_size: 5.0,
    speed_scale: 3.0,
    zippy_fragments: true,
    ..BASE
};
const REPULSER: KindTraits = KindTraits {
    field: FieldKind::Repel,
    base_reward: 30,
    hp_per_size: 10.0,
    cost_per_size: 2,
    ..BASE
};
const PHASING: KindTraits = KindTraits {
    phases: true,
    cost_per_size: 2,
    ..BASE
};
const GOLD: KindTraits = KindTraits {
    base_reward: 200,
    hp_per_size: 40.0,
    cost_per_size: 4,
    ..BASE
};

/// Reward for destroying a rock of `kind` and `size`
pub fn reward_for(kind: RockKind, size: u8) -> u32 {
    kind.traits().base_reward * size as u32
}
