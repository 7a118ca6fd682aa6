//! Combat events (emitted by fighters, forwarded to Bevy by `advance_match`)

use bevy::prelude::*;

use super::AttackSlot;
use crate::input::PlayerSlot;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    /// Атака стартовала (cooldown запущен)
    AttackStarted { fighter: PlayerSlot, slot: AttackSlot },
    /// Hit frame достигнут, но цель вне досягаемости
    Whiffed { attacker: PlayerSlot, slot: AttackSlot },
    /// Урон применён
    Hit {
        defender: PlayerSlot,
        damage: i32,
        health_after: i32,
    },
    /// Landing или hit прервал атаку
    AttackCancelled { fighter: PlayerSlot, slot: AttackSlot },
    KnockedOut { fighter: PlayerSlot },
}
