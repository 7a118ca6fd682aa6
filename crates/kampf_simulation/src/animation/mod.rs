//! Animation state machine: закрытый enum состояний + таблица переходов
//!
//! Строковые состояния ("idle", "attack1", ...) заменены на `FighterState`,
//! а поведение на конце клипа задаётся `FighterState::on_clip_end`:
//! - Death → Hold (держим последний кадр)
//! - Attack / TakeHit → ReturnToIdle
//! - остальные → Loop

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AttackSlot;

pub mod clip;

pub use clip::{AnimationClip, AnimationClock, ClipTable, ClockStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum FighterState {
    Idle,
    Run,
    Jump,
    Fall,
    Attack(AttackSlot),
    TakeHit,
    Death,
}

/// What happens when a clip runs past its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEnd {
    Loop,
    Hold,
    ReturnToIdle,
}

impl FighterState {
    pub const COUNT: usize = 9;

    pub const ALL: [FighterState; Self::COUNT] = [
        FighterState::Idle,
        FighterState::Run,
        FighterState::Jump,
        FighterState::Fall,
        FighterState::Attack(AttackSlot::Primary),
        FighterState::Attack(AttackSlot::Secondary),
        FighterState::Attack(AttackSlot::Special),
        FighterState::TakeHit,
        FighterState::Death,
    ];

    pub fn index(self) -> usize {
        match self {
            FighterState::Idle => 0,
            FighterState::Run => 1,
            FighterState::Jump => 2,
            FighterState::Fall => 3,
            FighterState::Attack(slot) => 4 + slot.index(),
            FighterState::TakeHit => 7,
            FighterState::Death => 8,
        }
    }

    pub fn is_attack(self) -> bool {
        matches!(self, FighterState::Attack(_))
    }

    pub fn attack_slot(self) -> Option<AttackSlot> {
        match self {
            FighterState::Attack(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn on_clip_end(self) -> ClipEnd {
        match self {
            FighterState::Death => ClipEnd::Hold,
            FighterState::Attack(_) | FighterState::TakeHit => ClipEnd::ReturnToIdle,
            FighterState::Idle | FighterState::Run | FighterState::Jump | FighterState::Fall => {
                ClipEnd::Loop
            }
        }
    }

    /// Stock sheet file name inside a fighter's sprite directory.
    pub fn default_sheet(self) -> &'static str {
        match self {
            FighterState::Idle => "Idle.png",
            FighterState::Run => "Run.png",
            FighterState::Jump => "Jump.png",
            FighterState::Fall => "Fall.png",
            FighterState::Attack(AttackSlot::Primary) => "Attack1.png",
            FighterState::Attack(AttackSlot::Secondary) => "Attack2.png",
            FighterState::Attack(AttackSlot::Special) => "Attack3.png",
            FighterState::TakeHit => "Take hit.png",
            FighterState::Death => "Death.png",
        }
    }
}

/// Horizontal facing (+1 right, -1 left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Facing {
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing from `from_x` toward `to_x`; equal positions face left.
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if from_x < to_x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_indices_are_dense() {
        for (expected, state) in FighterState::ALL.iter().enumerate() {
            assert_eq!(state.index(), expected);
        }
    }

    #[test]
    fn test_clip_end_table() {
        assert_eq!(FighterState::Death.on_clip_end(), ClipEnd::Hold);
        assert_eq!(FighterState::TakeHit.on_clip_end(), ClipEnd::ReturnToIdle);
        assert_eq!(
            FighterState::Attack(AttackSlot::Special).on_clip_end(),
            ClipEnd::ReturnToIdle
        );
        assert_eq!(FighterState::Run.on_clip_end(), ClipEnd::Loop);
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::toward(400.0, 900.0), Facing::Right);
        assert_eq!(Facing::toward(900.0, 400.0), Facing::Left);
        assert_eq!(Facing::toward(500.0, 500.0), Facing::Left);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
