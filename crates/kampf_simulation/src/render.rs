//! Render boundary: read-only views для внешнего renderer
//!
//! Ядро только описывает *что* рисовать (frame handle + бокс в arena coords).

use serde::Serialize;

use crate::assets::FrameId;
use crate::input::PlayerSlot;

/// Fighter draw request. `x`/`y` = box center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FighterView {
    pub slot: PlayerSlot,
    pub frame: FrameId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Cosmetic hit flash still running
    pub flashing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectView {
    pub owner: PlayerSlot,
    pub frame: FrameId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub trait Renderer {
    fn draw_fighter(&mut self, view: &FighterView);
    fn draw_effect(&mut self, view: &EffectView);
}

/// Collects draw calls in order (tests, headless frame dumps).
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub fighters: Vec<FighterView>,
    pub effects: Vec<EffectView>,
}

impl Renderer for DrawList {
    fn draw_fighter(&mut self, view: &FighterView) {
        self.fighters.push(*view);
    }

    fn draw_effect(&mut self, view: &EffectView) {
        self.effects.push(*view);
    }
}
