//! Input layer: per-tick key snapshot и раскладки управления
//!
//! Хост сэмплирует сырые клавиши один раз за тик в `InputSnapshot`.
//! Оба бойца читают один и тот же snapshot через свои `ControlBindings`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod bindings;
pub mod bot;

pub use bindings::ControlBindings;
pub use bot::{BotControl, SparringBot};

/// Opaque key code produced by the host's input backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputCode(pub u32);

/// Key codes used by the default bindings (ASCII letters, X11-style arrows).
pub mod keys {
    use super::InputCode;

    pub const A: InputCode = InputCode(b'A' as u32);
    pub const D: InputCode = InputCode(b'D' as u32);
    pub const F: InputCode = InputCode(b'F' as u32);
    pub const G: InputCode = InputCode(b'G' as u32);
    pub const H: InputCode = InputCode(b'H' as u32);
    pub const K: InputCode = InputCode(b'K' as u32);
    pub const L: InputCode = InputCode(b'L' as u32);
    pub const O: InputCode = InputCode(b'O' as u32);
    pub const W: InputCode = InputCode(b'W' as u32);
    pub const LEFT: InputCode = InputCode(0xff51);
    pub const UP: InputCode = InputCode(0xff52);
    pub const RIGHT: InputCode = InputCode(0xff53);
}

/// Player slot. Slot One is always updated first within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Default spawn x in the 1280-wide arena.
    pub fn spawn_x(self) -> f32 {
        match self {
            PlayerSlot::One => 400.0,
            PlayerSlot::Two => 900.0,
        }
    }

    /// Catalog key picked when settings name no fighter for this slot.
    pub fn default_fighter(self) -> &'static str {
        match self {
            PlayerSlot::One => "tutankhamun",
            PlayerSlot::Two => "charlemagne",
        }
    }
}

/// Logical control actions, in normalisation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Left,
    Right,
    Jump,
    Punch,
    Kick,
    Special,
}

impl ControlAction {
    pub const ALL: [ControlAction; 6] = [
        ControlAction::Left,
        ControlAction::Right,
        ControlAction::Jump,
        ControlAction::Punch,
        ControlAction::Kick,
        ControlAction::Special,
    ];

    pub fn index(self) -> usize {
        match self {
            ControlAction::Left => 0,
            ControlAction::Right => 1,
            ControlAction::Jump => 2,
            ControlAction::Punch => 3,
            ControlAction::Kick => 4,
            ControlAction::Special => 5,
        }
    }
}

/// Which input codes are held during the current tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pressed: HashSet<InputCode>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pressed(codes: impl IntoIterator<Item = InputCode>) -> Self {
        Self {
            pressed: codes.into_iter().collect(),
        }
    }

    pub fn set(&mut self, code: InputCode, pressed: bool) {
        if pressed {
            self.pressed.insert(code);
        } else {
            self.pressed.remove(&code);
        }
    }

    pub fn press(&mut self, code: InputCode) {
        self.set(code, true);
    }

    pub fn release(&mut self, code: InputCode) {
        self.set(code, false);
    }

    pub fn is_pressed(&self, code: InputCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }
}
