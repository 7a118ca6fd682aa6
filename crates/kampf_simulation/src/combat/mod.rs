//! Combat rules: attack slots, profiles, cooldowns, hit geometry
//!
//! Ответственность:
//! - AttackProfile: damage / cooldown / hit frame ratio per slot
//! - Cooldowns: три независимых таймера (fixed array, не HashMap)
//! - Hit geometry: reach по collision half-width + buffer
//! - Events: CombatEvent (AttackStarted, Hit, Whiffed, KnockedOut)
//!
//! Сам lifecycle атаки (start → hit frame → recovery) живёт в `fighter`,
//! здесь только данные и чистые функции.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::ControlAction;

pub mod attack;
pub mod events;
pub mod hit;

pub use attack::{AttackOverride, AttackProfile, AttackTable, Cooldowns};
pub use events::CombatEvent;
pub use hit::{hit_reach, in_hit_range, invincibility_ticks};

/// Attack identifier. Order = initiation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum AttackSlot {
    Primary,
    Secondary,
    Special,
}

impl AttackSlot {
    pub const ALL: [AttackSlot; 3] = [AttackSlot::Primary, AttackSlot::Secondary, AttackSlot::Special];

    pub fn index(self) -> usize {
        match self {
            AttackSlot::Primary => 0,
            AttackSlot::Secondary => 1,
            AttackSlot::Special => 2,
        }
    }

    /// Control that triggers this slot.
    pub fn control(self) -> ControlAction {
        match self {
            AttackSlot::Primary => ControlAction::Punch,
            AttackSlot::Secondary => ControlAction::Kick,
            AttackSlot::Special => ControlAction::Special,
        }
    }
}
