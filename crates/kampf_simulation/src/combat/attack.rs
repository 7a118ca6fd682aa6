//! Attack profiles и per-slot cooldowns

use serde::{Deserialize, Serialize};

use super::AttackSlot;
use crate::settings::{FPS, MAX_INVINCIBILITY_TICKS, MIN_INVINCIBILITY_TICKS};

/// Базовые профили: (damage, cooldown secs, hit frame ratio)
const BASE_PROFILES: [(i32, f32, f32); 3] = [(20, 0.5, 0.5), (25, 0.75, 0.55), (35, 1.2, 0.6)];

/// Resolved attack profile (ticks, not seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub damage: i32,
    /// Минимум тиков между двумя стартами этого слота; также длина анимации
    pub cooldown_ticks: u32,
    /// Позиция hit frame внутри клипа (0..=1)
    pub hit_frame_ratio: f32,
}

impl AttackProfile {
    pub fn from_secs(damage: i32, cooldown_secs: f32, hit_frame_ratio: f32) -> Self {
        let ticks = (cooldown_secs * FPS as f32).round_ties_even();
        let ratio = if hit_frame_ratio.is_finite() {
            hit_frame_ratio.clamp(0.0, 1.0)
        } else {
            0.5
        };
        Self {
            damage,
            // NaN.max(1.0) == 1.0, `as u32` насыщается
            cooldown_ticks: ticks.max(1.0) as u32,
            hit_frame_ratio: ratio,
        }
    }

    /// Frame index at which the hit is evaluated for a clip of `frame_count` frames.
    pub fn hit_frame(&self, frame_count: usize) -> usize {
        let last = frame_count.saturating_sub(1);
        let index = (last as f32 * self.hit_frame_ratio).round_ties_even();
        (index.max(0.0) as usize).min(last)
    }

    /// Ticks per animation frame so that the swing spans the whole cooldown.
    pub fn frame_interval(&self, frame_count: usize) -> f32 {
        (self.cooldown_ticks as f32 / frame_count.max(1) as f32).max(1.0)
    }

    /// Invincibility granted to the defender hit by this profile.
    pub fn invincibility_ticks(&self) -> u32 {
        let half = match self.cooldown_ticks / 2 {
            0 => MIN_INVINCIBILITY_TICKS,
            half => half,
        };
        half.clamp(MIN_INVINCIBILITY_TICKS, MAX_INVINCIBILITY_TICKS)
    }
}

/// Field-wise override of a base profile (fighter catalog).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackOverride {
    pub damage: Option<i32>,
    pub cooldown_secs: Option<f32>,
    pub hit_frame_ratio: Option<f32>,
}

/// Three resolved profiles, indexed by `AttackSlot::index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTable {
    profiles: [AttackProfile; 3],
}

impl Default for AttackTable {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl AttackTable {
    /// Merges overrides onto the base profiles; later overrides win per field.
    pub fn new(overrides: &[(AttackSlot, AttackOverride)]) -> Self {
        let profiles = AttackSlot::ALL.map(|slot| {
            let (mut damage, mut cooldown, mut ratio) = BASE_PROFILES[slot.index()];
            for (_, custom) in overrides.iter().filter(|(target, _)| *target == slot) {
                damage = custom.damage.unwrap_or(damage);
                cooldown = custom.cooldown_secs.unwrap_or(cooldown);
                ratio = custom.hit_frame_ratio.unwrap_or(ratio);
            }
            AttackProfile::from_secs(damage, cooldown, ratio)
        });
        Self { profiles }
    }

    pub fn get(&self, slot: AttackSlot) -> &AttackProfile {
        &self.profiles[slot.index()]
    }
}

/// Remaining cooldown ticks per slot. All three tick down every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    remaining: [u32; 3],
}

impl Cooldowns {
    pub fn tick(&mut self) {
        for remaining in self.remaining.iter_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_ready(&self, slot: AttackSlot) -> bool {
        self.remaining[slot.index()] == 0
    }

    pub fn start(&mut self, slot: AttackSlot, ticks: u32) {
        self.remaining[slot.index()] = ticks;
    }

    pub fn remaining(&self, slot: AttackSlot) -> u32 {
        self.remaining[slot.index()]
    }

    pub fn reset(&mut self) {
        self.remaining = [0; 3];
    }
}
