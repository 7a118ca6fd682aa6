//! Tuning constants и конфигурация матча
//!
//! Все величины per-tick при FPS = 60, если не указано иное.
//! Координаты: x вправо, y вверх, позиция бойца = центр его бокса.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::{ControlAction, InputCode, PlayerSlot};

// === Arena ===
pub const WIDTH: f32 = 1280.0;
pub const HEIGHT: f32 = 720.0;
pub const GROUND_Y: f32 = 150.0;

// === Clock ===
pub const FPS: u32 = 60;

// === Physics ===
pub const PLAYER_SPEED: f32 = 6.0;
pub const JUMP_SPEED: f32 = 15.0;
pub const GRAVITY: f32 = 0.9;
pub const MAX_JUMPS: u8 = 2;

// === Body sizing ===
pub const FRAME_SIZE: u32 = 162;
pub const FIGHTER_WIDTH: f32 = 200.0;
pub const FIGHTER_HEIGHT: f32 = 300.0;
pub const MIN_FIGHTER_SCALE: f32 = 0.9;
pub const MAX_FIGHTER_SCALE: f32 = 1.4;
pub const COLLISION_MIN_WIDTH: f32 = 60.0;
pub const COLLISION_SCALE: f32 = 0.45;
pub const COLLISION_MIN_HALF_WIDTH: f32 = 8.0;

// === Combat geometry ===
pub const MIN_PLAYER_DISTANCE: f32 = 80.0;
pub const HIT_HORIZONTAL_BUFFER: f32 = 40.0;
pub const HIT_VERTICAL_TOLERANCE: f32 = 120.0;
pub const VERTICAL_SEPARATION_THRESHOLD: f32 = 100.0;
pub const TOUCH_TOLERANCE: f32 = 1.0;

// === Combat timing ===
pub const MAX_HEALTH: i32 = 100;
pub const HIT_FLASH_DURATION: u32 = 10;
pub const FALLBACK_INVINCIBILITY_TICKS: u32 = 20;
pub const MIN_INVINCIBILITY_TICKS: u32 = 6;
pub const MAX_INVINCIBILITY_TICKS: u32 = 30;

// === Animation ===
pub const DEFAULT_FRAME_INTERVAL: f32 = 6.0;

// === Effects ===
pub const EFFECT_GAP: f32 = 8.0;
pub const SPECIAL_EFFECT_WIDTH_FACTOR: f32 = 2.5;
pub const EFFECT_HEIGHT_FACTOR: f32 = 0.1;

// === Match rules (defaults) ===
pub const WINS_TO_MATCH: u32 = 3;
pub const ROUND_TIME_LIMIT_SECS: u32 = 99;
pub const ROUND_RESTART_DELAY_SECS: u32 = 3;
pub const MATCH_RESTART_DELAY_SECS: u32 = 4;

/// Converts seconds into simulation ticks.
pub const fn secs_to_ticks(secs: u32) -> u32 {
    secs * FPS
}

/// Horizontal clamp range for a fighter of the given visual width.
pub fn arena_x_range(width: f32) -> (f32, f32) {
    let half = width / 2.0;
    (half, WIDTH - half)
}

/// Правила матча (best-of-N)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Побед в раундах до победы в матче
    pub wins_to_match: u32,
    /// Длительность раунда (секунды)
    pub round_time_limit_secs: u32,
    /// Пауза после раунда до автостарта следующего (секунды)
    pub round_restart_delay_secs: u32,
    /// Пауза после матча до возврата в меню (секунды)
    pub match_restart_delay_secs: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            wins_to_match: WINS_TO_MATCH,
            round_time_limit_secs: ROUND_TIME_LIMIT_SECS,
            round_restart_delay_secs: ROUND_RESTART_DELAY_SECS,
            match_restart_delay_secs: MATCH_RESTART_DELAY_SECS,
        }
    }
}

impl MatchRules {
    pub fn round_time_limit_ticks(&self) -> u32 {
        secs_to_ticks(self.round_time_limit_secs)
    }

    pub fn round_restart_ticks(&self) -> u32 {
        secs_to_ticks(self.round_restart_delay_secs)
    }

    pub fn match_restart_ticks(&self) -> u32 {
        secs_to_ticks(self.match_restart_delay_secs)
    }

    /// Clamps out-of-range values instead of rejecting them.
    pub fn sanitized(self) -> Self {
        let clamped = Self {
            wins_to_match: self.wins_to_match.clamp(1, 99),
            round_time_limit_secs: self.round_time_limit_secs.clamp(1, 999),
            round_restart_delay_secs: self.round_restart_delay_secs.min(60),
            match_restart_delay_secs: self.match_restart_delay_secs.min(60),
        };
        if clamped != self {
            crate::logger::log_warning(&format!(
                "⚙️ MatchRules clamped: {:?} → {:?}",
                self, clamped
            ));
        }
        clamped
    }
}

/// Player-facing configuration the host shell may load from disk.
///
/// Every field is optional in the serialized form; missing fields take the
/// defaults. Call [`GameSettings::sanitized`] before use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub rules: MatchRules,
    /// Per-player control overrides (action → input code)
    pub player1_controls: Vec<(ControlAction, InputCode)>,
    pub player2_controls: Vec<(ControlAction, InputCode)>,
    /// Fighter catalog keys
    pub player1_fighter: Option<String>,
    pub player2_fighter: Option<String>,
}

impl GameSettings {
    pub fn sanitized(mut self) -> Self {
        self.rules = self.rules.sanitized();
        self
    }

    pub fn controls_for(&self, slot: PlayerSlot) -> &[(ControlAction, InputCode)] {
        match slot {
            PlayerSlot::One => &self.player1_controls,
            PlayerSlot::Two => &self.player2_controls,
        }
    }

    pub fn fighter_for(&self, slot: PlayerSlot) -> Option<&str> {
        match slot {
            PlayerSlot::One => self.player1_fighter.as_deref(),
            PlayerSlot::Two => self.player2_fighter.as_deref(),
        }
    }
}
