//! Per-tick update контракт бойца
//!
//! Порядок шагов фиксирован и влияет на исход (кто попал первым, когда
//! landing отменяет атаку), поэтому каждый шаг вынесен в отдельный метод,
//! а `update` только вызывает их по очереди.

use crate::animation::{ClipEnd, ClockStep, Facing, FighterState};
use crate::combat::{AttackSlot, CombatEvent};
use crate::input::{ControlAction, InputSnapshot};
use crate::settings::{GRAVITY, JUMP_SPEED, MAX_JUMPS, PLAYER_SPEED};

use super::{Fighter, TickContext};

impl Fighter {
    /// Advances this fighter by one tick against `opponent`.
    pub fn update(&mut self, input: &InputSnapshot, opponent: &mut Fighter, ctx: &mut TickContext) {
        // 1. Мёртвый боец только доигрывает death clip
        if self.is_dead {
            self.advance_animation();
            self.update_effects();
            return;
        }

        // 2. Cooldowns всех трёх слотов
        self.cooldowns.tick();

        // 3. Horizontal movement
        let was_airborne = !self.on_ground;
        let moving = self.apply_horizontal_input(input);

        // 4. Facing + locomotion state
        if !self.is_attacking() {
            self.facing = Facing::toward(self.x, opponent.x);
            if self.on_ground {
                self.state = if moving {
                    FighterState::Run
                } else {
                    FighterState::Idle
                };
            }
        }

        // 5. Jump (rising edge)
        self.handle_jump(input);

        // 6. Gravity + landing
        self.integrate_vertical(was_airborne, ctx);

        // 7. Attack initiation
        if !self.is_attacking() {
            self.try_start_attack(input, ctx);
        }

        // 8. Animation
        self.advance_animation();

        // 9. Hit frame
        self.resolve_attack_hit(opponent, ctx);

        // 10. Effects
        self.update_effects();

        // 11. Knockout
        if self.health <= 0 && !self.is_dead {
            self.die(ctx);
        }

        // 12. Timers
        self.hit_flash_timer = self.hit_flash_timer.saturating_sub(1);
        self.invincible_timer = self.invincible_timer.saturating_sub(1);

        // 13. Arena bounds
        self.clamp_to_arena();
    }

    fn apply_horizontal_input(&mut self, input: &InputSnapshot) -> bool {
        let mut moving = false;
        if self.controls.is_pressed(ControlAction::Left, input) {
            self.x -= PLAYER_SPEED;
            moving = true;
        }
        if self.controls.is_pressed(ControlAction::Right, input) {
            self.x += PLAYER_SPEED;
            moving = true;
        }
        moving
    }

    fn handle_jump(&mut self, input: &InputSnapshot) {
        let jump_pressed = self.controls.is_pressed(ControlAction::Jump, input);
        if jump_pressed && !self.was_jump_pressed && self.jumps_remaining > 0 {
            self.vel_y = JUMP_SPEED;
            self.on_ground = false;
            self.state = FighterState::Jump;
            self.jumps_remaining -= 1;
        }
        self.was_jump_pressed = jump_pressed;
    }

    fn integrate_vertical(&mut self, was_airborne: bool, ctx: &mut TickContext) {
        self.vel_y -= GRAVITY;
        self.y += self.vel_y;

        let ground_y = self.body.ground_y;
        if self.y <= ground_y {
            self.y = ground_y;
            self.vel_y = 0.0;
            self.on_ground = true;
            self.jumps_remaining = MAX_JUMPS;
            if matches!(self.state, FighterState::Jump | FighterState::Fall) {
                self.state = FighterState::Idle;
            }
            // Landing прерывает атаку
            if was_airborne {
                self.cancel_attack(ctx);
            }
        } else if self.vel_y < 0.0
            && !self.is_attacking()
            && !matches!(self.state, FighterState::TakeHit | FighterState::Death)
        {
            self.state = FighterState::Fall;
        }
    }

    fn try_start_attack(&mut self, input: &InputSnapshot, ctx: &mut TickContext) {
        let ready = AttackSlot::ALL.into_iter().find(|slot| {
            self.controls.is_pressed(slot.control(), input) && self.cooldowns.is_ready(*slot)
        });
        if let Some(slot) = ready {
            self.start_attack(slot, ctx);
        }
    }

    /// Steps the main clip and applies its end-of-clip transition.
    pub(crate) fn advance_animation(&mut self) {
        let clip = self.clips.get(self.state);
        let end = self.state.on_clip_end();
        let step = self.clock.tick(clip.interval(), clip.frame_count(), end);

        if step == ClockStep::Wrapped && end == ClipEnd::ReturnToIdle {
            // Атака доиграла: bookkeeping сбрасывается вместе с состоянием
            self.current_attack = None;
            self.state = FighterState::Idle;
        }
    }

    fn resolve_attack_hit(&mut self, opponent: &mut Fighter, ctx: &mut TickContext) {
        let Some(attack) = self.current_attack.as_mut() else {
            return;
        };
        if attack.hit_resolved || self.clock.frame_index < attack.hit_frame {
            return;
        }

        // Помечаем до проверки: swing бьёт максимум один раз, даже мимо
        attack.hit_resolved = true;
        let profile = attack.profile;
        let slot = attack.slot;

        if !self.try_hit(opponent, profile.damage, Some(&profile), ctx) {
            ctx.events.push(CombatEvent::Whiffed {
                attacker: self.slot,
                slot,
            });
        }
    }

    pub(crate) fn update_effects(&mut self) {
        if self.effects.is_empty() {
            return;
        }
        let base_y = self.effect_base_y();
        let (owner_x, owner_facing) = (self.x, self.facing);
        self.effects
            .retain_mut(|effect| effect.advance(owner_x, owner_facing, base_y));
    }
}
