//! Outbound notifications
//!
//! The engine never owns effects, pulses or the economy. It reports through an
//! [`EventSink`] supplied per tick; calls are synchronous and fire-and-forget.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::OwnerId;

/// Receiver for everything the engine asks the outside world to do
pub trait EventSink {
    /// Spawn a visual effect (debris, sparks)
    fn visual_effect(&mut self, pos: Vec2, vel: Vec2, size: u8);

    /// Create a pulse at `pos`
    fn pulse(&mut self, pos: Vec2, size: u8, owner: Option<OwnerId>);

    /// Credit `amount` to `owner`; unknown owners are the receiver's problem
    fn reward(&mut self, owner: OwnerId, amount: u32);

    /// The locally controlled craft just died
    fn local_craft_died(&mut self, _craft_id: u32) {}
}

/// Recorded engine notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    VisualEffect { pos: Vec2, vel: Vec2, size: u8 },
    Pulse { pos: Vec2, size: u8, owner: Option<OwnerId> },
    Reward { owner: OwnerId, amount: u32 },
    LocalCraftDied { craft_id: u32 },
}

/// A plain list works as a sink: events are appended in emission order
impl EventSink for Vec<GameEvent> {
    fn visual_effect(&mut self, pos: Vec2, vel: Vec2, size: u8) {
        self.push(GameEvent::VisualEffect { pos, vel, size });
    }

    fn pulse(&mut self, pos: Vec2, size: u8, owner: Option<OwnerId>) {
        self.push(GameEvent::Pulse { pos, size, owner });
    }

    fn reward(&mut self, owner: OwnerId, amount: u32) {
        self.push(GameEvent::Reward { owner, amount });
    }

    fn local_craft_died(&mut self, craft_id: u32) {
        self.push(GameEvent::LocalCraftDied { craft_id });
    }
}

/// Sink that drops everything (menu background, headless replays)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn visual_effect(&mut self, _pos: Vec2, _vel: Vec2, _size: u8) {}
    fn pulse(&mut self, _pos: Vec2, _size: u8, _owner: Option<OwnerId>) {}
    fn reward(&mut self, _owner: OwnerId, _amount: u32) {}
}

/// Total reward reported to `owner` in a recorded event list
pub fn total_reward(events: &[GameEvent], owner: OwnerId) -> u32 {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Reward { owner: o, amount } if *o == owner => Some(*amount),
            _ => None,
        })
        .sum()
}
