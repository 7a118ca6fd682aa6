//! Attack lifecycle: start → hit frame → recovery, плюс take_hit / die

use crate::animation::FighterState;
use crate::audio::{play_sound, SoundKey};
use crate::combat::{in_hit_range, invincibility_ticks, AttackProfile, AttackSlot, CombatEvent};
use crate::settings::{EFFECT_HEIGHT_FACTOR, HIT_FLASH_DURATION};

use super::{ActiveAttack, ActiveEffect, Fighter, TickContext};

impl Fighter {
    /// Starts `slot` unconditionally (callers check cooldown and attacking).
    pub fn start_attack(&mut self, slot: AttackSlot, ctx: &mut TickContext) {
        let state = FighterState::Attack(slot);
        let profile = *self.attacks.get(slot);
        let hit_frame = self
            .clips
            .get(state)
            .hit_frame()
            .unwrap_or_else(|| profile.hit_frame(self.clips.get(state).frame_count()));

        self.state = state;
        self.clock.reset();
        self.current_attack = Some(ActiveAttack {
            slot,
            profile,
            hit_frame,
            hit_resolved: false,
        });
        self.cooldowns.start(slot, profile.cooldown_ticks);

        self.spawn_attack_effect(slot);
        if slot == AttackSlot::Special {
            play_sound(ctx.audio, SoundKey::Special);
        }

        ctx.events.push(CombatEvent::AttackStarted {
            fighter: self.slot,
            slot,
        });
        crate::logger::log(&format!(
            "⚔️ {:?} '{}' starts {:?} (dmg {}, cd {} ticks, hit frame {})",
            self.slot, self.name, slot, profile.damage, profile.cooldown_ticks, hit_frame
        ));
    }

    /// Hit test against `opponent`; on success the opponent's `take_hit` runs.
    ///
    /// Returns `true` when the opponent was in reach, even if the hit was
    /// then ignored because of invincibility.
    pub fn try_hit(
        &self,
        opponent: &mut Fighter,
        damage: i32,
        profile: Option<&AttackProfile>,
        ctx: &mut TickContext,
    ) -> bool {
        let in_range = in_hit_range(
            self.x - opponent.x,
            self.y - opponent.y,
            self.body.collision_half_width,
            opponent.body.collision_half_width,
        );
        if in_range {
            opponent.take_hit(damage, profile, ctx);
        }
        in_range
    }

    /// Applies damage. No-op (returns `false`) while dead or invincible.
    pub fn take_hit(&mut self, damage: i32, profile: Option<&AttackProfile>, ctx: &mut TickContext) -> bool {
        if self.is_dead || self.invincible_timer > 0 {
            return false;
        }

        self.cancel_attack(ctx);
        self.health -= damage.max(0);
        self.state = FighterState::TakeHit;
        self.clock.reset();
        self.hit_flash_timer = HIT_FLASH_DURATION;
        self.invincible_timer = invincibility_ticks(profile);
        play_sound(ctx.audio, SoundKey::Hit);

        ctx.events.push(CombatEvent::Hit {
            defender: self.slot,
            damage: damage.max(0),
            health_after: self.health,
        });
        crate::logger::log(&format!(
            "💥 {:?} '{}' takes {} damage → health {} (invincible {} ticks)",
            self.slot, self.name, damage, self.health, self.invincible_timer
        ));

        // KO сразу, не на следующем тике
        if self.health <= 0 {
            self.die(ctx);
        }
        true
    }

    pub fn die(&mut self, ctx: &mut TickContext) {
        self.cancel_attack(ctx);
        self.state = FighterState::Death;
        self.is_dead = true;
        self.clock.timer = 0.0;
        play_sound(ctx.audio, SoundKey::Ko);

        ctx.events.push(CombatEvent::KnockedOut { fighter: self.slot });
        crate::logger::log_info(&format!("☠️ {:?} '{}' knocked out", self.slot, self.name));
    }

    /// Drops the in-flight attack (if any) and rewinds the clip.
    pub fn cancel_attack(&mut self, ctx: &mut TickContext) {
        if let Some(attack) = self.current_attack.take() {
            if self.state.is_attack() {
                self.state = FighterState::Idle;
            }
            ctx.events.push(CombatEvent::AttackCancelled {
                fighter: self.slot,
                slot: attack.slot,
            });
        }
        self.clock.reset();
    }

    pub(crate) fn effect_base_y(&self) -> f32 {
        self.y + self.body.height * EFFECT_HEIGHT_FACTOR
    }

    fn spawn_attack_effect(&mut self, slot: AttackSlot) {
        let Some(template) = self.effect_templates[slot.index()].as_ref() else {
            return;
        };
        if let Some(effect) = ActiveEffect::spawn(template, self.facing, self.x, self.effect_base_y()) {
            self.effects.push(effect);
        }
    }
}
