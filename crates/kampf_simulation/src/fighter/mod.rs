//! Fighter entity: физика, attack lifecycle и animation state одного бойца
//!
//! Архитектура:
//! - `loadout`: clips/attacks/body/effects (грузится один раз на выбор)
//! - `update`: per-tick контракт (13 шагов, строгий порядок)
//! - `actions`: start_attack / try_hit / take_hit / die / cancel_attack
//! - `effects`: активные визуальные эффекты на своём clock
//!
//! Fighter не знает про Bevy: оркестратор (`match_flow`) владеет двумя
//! бойцами и прокидывает input + opponent + `TickContext`.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationClock, ClipTable, Facing, FighterState};
use crate::assets::{AssetProvider, FighterDefinition, FrameId};
use crate::audio::AudioSink;
use crate::combat::{AttackProfile, AttackSlot, AttackTable, CombatEvent, Cooldowns};
use crate::input::{ControlBindings, PlayerSlot};
use crate::render::{EffectView, FighterView, Renderer};
use crate::settings::{arena_x_range, MAX_HEALTH, MAX_JUMPS, WIDTH};

pub mod actions;
pub mod body;
pub mod effects;
pub mod loadout;
pub mod update;

#[cfg(test)]
mod update_tests;

pub use body::{BodyDimensions, MetricsAccumulator};
pub use effects::{ActiveEffect, EffectAnchor, EffectTemplate};
pub use loadout::FighterLoadout;

/// Collaborators a fighter may call during its update.
pub struct TickContext<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub events: &'a mut Vec<CombatEvent>,
}

/// Attack currently in flight (at most one per fighter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAttack {
    pub slot: AttackSlot,
    pub profile: AttackProfile,
    pub hit_frame: usize,
    /// Hit frame already evaluated for this swing
    pub hit_resolved: bool,
}

#[derive(Debug, Clone)]
pub struct Fighter {
    // === Identity ===
    slot: PlayerSlot,
    name: String,
    controls: ControlBindings,
    spawn_x: f32,

    // === Loadout ===
    body: BodyDimensions,
    clips: ClipTable,
    attacks: AttackTable,
    effect_templates: [Option<EffectTemplate>; 3],

    // === Spatial ===
    pub x: f32,
    pub y: f32,
    pub vel_y: f32,
    pub facing: Facing,
    pub on_ground: bool,
    pub jumps_remaining: u8,
    was_jump_pressed: bool,

    // === Combat ===
    /// Может уйти ниже 0; HUD и timeout используют `display_health`
    pub health: i32,
    pub is_dead: bool,
    pub invincible_timer: u32,
    pub hit_flash_timer: u32,

    // === Action / animation ===
    pub state: FighterState,
    pub clock: AnimationClock,
    current_attack: Option<ActiveAttack>,
    cooldowns: Cooldowns,
    effects: Vec<ActiveEffect>,
}

impl Fighter {
    pub fn new(slot: PlayerSlot, controls: ControlBindings, loadout: FighterLoadout) -> Self {
        let mut fighter = Self {
            slot,
            name: loadout.name,
            controls,
            spawn_x: slot.spawn_x(),
            body: loadout.body,
            clips: loadout.clips,
            attacks: loadout.attacks,
            effect_templates: loadout.effects,
            x: 0.0,
            y: 0.0,
            vel_y: 0.0,
            facing: Facing::Right,
            on_ground: true,
            jumps_remaining: MAX_JUMPS,
            was_jump_pressed: false,
            health: MAX_HEALTH,
            is_dead: false,
            invincible_timer: 0,
            hit_flash_timer: 0,
            state: FighterState::Idle,
            clock: AnimationClock::default(),
            current_attack: None,
            cooldowns: Cooldowns::default(),
            effects: Vec::new(),
        };
        fighter.reset();
        fighter
    }

    pub fn from_definition(
        slot: PlayerSlot,
        controls: ControlBindings,
        definition: &FighterDefinition,
        assets: &dyn AssetProvider,
    ) -> Self {
        Self::new(slot, controls, FighterLoadout::load(definition, assets))
    }

    /// Full per-round reset. Loadout stays untouched.
    pub fn reset(&mut self) {
        self.x = self.spawn_x;
        self.y = self.body.ground_y;
        self.vel_y = 0.0;
        self.on_ground = true;
        self.jumps_remaining = MAX_JUMPS;
        self.facing = if self.spawn_x < WIDTH / 2.0 {
            Facing::Right
        } else {
            Facing::Left
        };
        self.was_jump_pressed = false;

        self.health = MAX_HEALTH;
        self.is_dead = false;
        self.invincible_timer = 0;
        self.hit_flash_timer = 0;

        self.state = FighterState::Idle;
        self.clock.reset();
        self.current_attack = None;
        self.cooldowns.reset();
        self.effects.clear();
    }

    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &ControlBindings {
        &self.controls
    }

    pub fn body(&self) -> &BodyDimensions {
        &self.body
    }

    pub fn width(&self) -> f32 {
        self.body.width
    }

    pub fn height(&self) -> f32 {
        self.body.height
    }

    pub fn collision_half_width(&self) -> f32 {
        self.body.collision_half_width
    }

    pub fn ground_y(&self) -> f32 {
        self.body.ground_y
    }

    pub fn attacks(&self) -> &AttackTable {
        &self.attacks
    }

    pub fn clips(&self) -> &ClipTable {
        &self.clips
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn current_attack(&self) -> Option<&ActiveAttack> {
        self.current_attack.as_ref()
    }

    pub fn is_attacking(&self) -> bool {
        self.current_attack.is_some()
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Health clamped at zero, as shown on the HUD.
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }

    /// Dead and the death clip is sitting on its last frame.
    pub fn death_animation_complete(&self) -> bool {
        if !self.is_dead || self.state != FighterState::Death {
            return false;
        }
        let last = self.clips.get(FighterState::Death).frame_count() - 1;
        self.clock.frame_index >= last
    }

    pub fn current_frame(&self) -> FrameId {
        self.clips.get(self.state).frame(self.facing, self.clock.frame_index)
    }

    /// Clamps x into the arena for the current box width.
    pub fn clamp_to_arena(&mut self) {
        let (min_x, max_x) = arena_x_range(self.body.width);
        self.x = self.x.max(min_x).min(max_x);
    }

    pub fn view(&self) -> FighterView {
        FighterView {
            slot: self.slot,
            frame: self.current_frame(),
            x: self.x,
            y: self.y,
            width: self.body.width,
            height: self.body.height,
            flashing: self.hit_flash_timer > 0,
        }
    }

    /// Effects first, then the fighter on top.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        for effect in &self.effects {
            renderer.draw_effect(&EffectView {
                owner: self.slot,
                frame: effect.current_frame(),
                x: effect.x,
                y: effect.y,
                width: effect.width,
                height: effect.height,
            });
        }
        renderer.draw_fighter(&self.view());
    }

    pub fn snapshot(&self) -> FighterSnapshot {
        FighterSnapshot {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            vel_y: self.vel_y,
            facing: self.facing,
            on_ground: self.on_ground,
            jumps_remaining: self.jumps_remaining,
            health: self.health,
            is_dead: self.is_dead,
            invincible_timer: self.invincible_timer,
            state: self.state,
            frame_index: self.clock.frame_index,
            attacking: self.current_attack.map(|attack| attack.slot),
            effects: self.effects.len(),
        }
    }
}

/// Serializable read model of a fighter (determinism checks, debugging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub vel_y: f32,
    pub facing: Facing,
    pub on_ground: bool,
    pub jumps_remaining: u8,
    pub health: i32,
    pub is_dead: bool,
    pub invincible_timer: u32,
    pub state: FighterState,
    pub frame_index: usize,
    pub attacking: Option<AttackSlot>,
    pub effects: usize,
}
