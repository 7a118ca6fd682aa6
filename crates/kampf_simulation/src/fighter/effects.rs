//! Active visual effects (attack flashes, projectiles-as-sprites)
//!
//! Эффект живёт на своём собственном clock, независимо от основной анимации
//! бойца, и удаляется когда кадры закончились.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::animation::Facing;
use crate::assets::{AssetProvider, DirectionalFrames, FrameId};
use crate::combat::{AttackProfile, AttackSlot};
use crate::settings::{EFFECT_GAP, SPECIAL_EFFECT_WIDTH_FACTOR};

use super::BodyDimensions;

/// How an effect follows its owner's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectAnchor {
    /// Разворачивается вместе с бойцом
    #[default]
    Front,
    /// Facing заморожен на момент спавна
    Fixed,
}

/// Loaded effect sheet + precomputed size for one attack slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTemplate {
    pub slot: AttackSlot,
    pub frames: DirectionalFrames,
    pub interval: f32,
    pub width: f32,
    pub height: f32,
    /// Center distance from the fighter, beyond its collision edge
    pub offset: f32,
    pub anchor: EffectAnchor,
}

impl EffectTemplate {
    /// Loads an effect strip; any failure disables the effect.
    pub fn load(
        assets: &dyn AssetProvider,
        path: &Path,
        slot: AttackSlot,
        anchor: EffectAnchor,
        profile: &AttackProfile,
        body: &BodyDimensions,
    ) -> Option<Self> {
        let sheet = match assets.load_sheet(path, None) {
            Ok(sheet) => sheet,
            Err(err) => {
                crate::logger::log_warning(&format!("✨ Effect disabled ({:?}): {}", slot, err));
                return None;
            }
        };
        if sheet.frames.right.is_empty() && sheet.frames.left.is_empty() {
            return None;
        }

        let width_factor = if slot == AttackSlot::Special {
            SPECIAL_EFFECT_WIDTH_FACTOR
        } else {
            1.0
        };
        let width = (sheet.metrics.max_visible_width * body.scale * width_factor).max(1.0);
        let height = (sheet.metrics.max_visible_height * body.scale).max(1.0);
        let interval = profile.frame_interval(sheet.frames.frame_count());

        Some(Self {
            slot,
            frames: sheet.frames,
            interval,
            width,
            height,
            offset: body.collision_half_width + width / 2.0 + EFFECT_GAP,
            anchor,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub slot: AttackSlot,
    /// Кадры выбираются по facing в момент спавна
    pub frames: Vec<FrameId>,
    pub interval: f32,
    pub width: f32,
    pub height: f32,
    pub offset: f32,
    pub facing: Facing,
    pub anchor: EffectAnchor,
    pub x: f32,
    pub y: f32,
    pub frame_index: usize,
    pub timer: f32,
}

impl ActiveEffect {
    /// `None` when the template has no frames for either side.
    pub fn spawn(template: &EffectTemplate, facing: Facing, owner_x: f32, base_y: f32) -> Option<Self> {
        let frames = template.frames.for_facing_or_any(facing);
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            slot: template.slot,
            frames: frames.to_vec(),
            interval: template.interval,
            width: template.width,
            height: template.height,
            offset: template.offset,
            facing,
            anchor: template.anchor,
            x: owner_x + facing.sign() * template.offset,
            y: base_y,
            frame_index: 0,
            timer: 0.0,
        })
    }

    /// Advances one tick. Returns `false` once the last frame has been shown.
    pub fn advance(&mut self, owner_x: f32, owner_facing: Facing, base_y: f32) -> bool {
        self.timer += 1.0;
        if self.timer >= self.interval {
            self.timer -= self.interval;
            self.frame_index += 1;
            if self.frame_index >= self.frames.len() {
                return false;
            }
        }

        if self.anchor == EffectAnchor::Front {
            self.facing = owner_facing;
        }
        self.x = owner_x + self.facing.sign() * self.offset;
        self.y = base_y;
        true
    }

    pub fn current_frame(&self) -> FrameId {
        self.frames
            .get(self.frame_index.min(self.frames.len().saturating_sub(1)))
            .copied()
            .unwrap_or(FrameId::PLACEHOLDER)
    }
}
