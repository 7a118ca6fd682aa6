//! Tests for the per-tick fighter update and the attack lifecycle.

#[cfg(test)]
mod tests {
    use crate::animation::FighterState;
    use crate::assets::{FighterCatalog, GeneratedSheets};
    use crate::audio::{RecordingAudio, SoundKey};
    use crate::combat::{AttackSlot, CombatEvent};
    use crate::fighter::{Fighter, TickContext};
    use crate::input::{keys, ControlBindings, InputSnapshot, PlayerSlot};
    use crate::settings::MAX_JUMPS;

    /// Two fighters without an orchestrator (no separation, no round logic).
    struct Duel {
        a: Fighter,
        b: Fighter,
        audio: RecordingAudio,
        events: Vec<CombatEvent>,
    }

    impl Duel {
        fn new(key: &str) -> Self {
            let assets = GeneratedSheets::default()
                .with_frames("Death.png", 4)
                .with_frames("Arrow.png", 4);
            let catalog = FighterCatalog::default();
            let definition = catalog.resolve(Some(key));
            Self {
                a: Fighter::from_definition(
                    PlayerSlot::One,
                    ControlBindings::defaults(PlayerSlot::One),
                    definition,
                    &assets,
                ),
                b: Fighter::from_definition(
                    PlayerSlot::Two,
                    ControlBindings::defaults(PlayerSlot::Two),
                    definition,
                    &assets,
                ),
                audio: RecordingAudio::default(),
                events: Vec::new(),
            }
        }

        fn tick(&mut self, input: &InputSnapshot) {
            let mut ctx = TickContext {
                audio: &mut self.audio,
                events: &mut self.events,
            };
            self.a.update(input, &mut self.b, &mut ctx);
            self.b.update(input, &mut self.a, &mut ctx);
        }

        fn run(&mut self, input: &InputSnapshot, ticks: usize) {
            for _ in 0..ticks {
                self.tick(input);
            }
        }

        fn hits_on(&self, defender: PlayerSlot) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, CombatEvent::Hit { defender: d, .. } if *d == defender))
                .count()
        }
    }

    fn pressed(codes: &[crate::input::InputCode]) -> InputSnapshot {
        InputSnapshot::from_pressed(codes.iter().copied())
    }

    // === Jump ===

    #[test]
    fn test_double_jump_budget() {
        let mut duel = Duel::new("tutankhamun");
        let jump = pressed(&[keys::W]);
        let idle = InputSnapshot::new();

        duel.tick(&jump);
        assert_eq!(duel.a.jumps_remaining, MAX_JUMPS - 1);
        assert!(!duel.a.on_ground);
        assert_eq!(duel.a.state, FighterState::Jump);

        duel.tick(&idle);
        duel.tick(&jump);
        assert_eq!(duel.a.jumps_remaining, 0);
        // Второй прыжок снова выставил скорость: 15 - 0.9
        assert!((duel.a.vel_y - 14.1).abs() < 1e-4);

        duel.tick(&idle);
        duel.tick(&jump);
        // Третий rising edge отклонён, скорость продолжает падать
        assert_eq!(duel.a.jumps_remaining, 0);
        assert!((duel.a.vel_y - 12.3).abs() < 1e-4);

        for _ in 0..200 {
            if duel.a.on_ground {
                break;
            }
            duel.tick(&idle);
        }
        assert!(duel.a.on_ground);
        assert_eq!(duel.a.jumps_remaining, MAX_JUMPS);
        assert_eq!(duel.a.y, duel.a.ground_y());
        assert_eq!(duel.a.state, FighterState::Idle);
    }

    #[test]
    fn test_held_jump_does_not_retrigger() {
        let mut duel = Duel::new("tutankhamun");
        duel.run(&pressed(&[keys::W]), 5);
        assert_eq!(duel.a.jumps_remaining, MAX_JUMPS - 1);
    }

    #[test]
    fn test_fall_state_after_apex() {
        let mut duel = Duel::new("tutankhamun");
        duel.tick(&pressed(&[keys::W]));
        duel.run(&InputSnapshot::new(), 20);
        assert!(duel.a.vel_y < 0.0);
        assert_eq!(duel.a.state, FighterState::Fall);
    }

    // === Landing ===

    #[test]
    fn test_landing_cancels_attack() {
        let mut duel = Duel::new("tutankhamun");
        let idle = InputSnapshot::new();

        duel.tick(&pressed(&[keys::W]));
        duel.run(&idle, 18);
        assert!(!duel.a.on_ground);

        duel.tick(&pressed(&[keys::F]));
        assert!(duel.a.is_attacking());
        assert_eq!(duel.a.state, FighterState::Attack(AttackSlot::Primary));

        for _ in 0..30 {
            if duel.a.on_ground {
                break;
            }
            duel.tick(&idle);
        }

        assert!(duel.a.on_ground);
        assert!(!duel.a.is_attacking());
        assert_ne!(duel.a.state, FighterState::Attack(AttackSlot::Primary));
        assert_eq!(duel.a.clock.frame_index, 0);
        assert!(duel.events.iter().any(|event| matches!(
            event,
            CombatEvent::AttackCancelled {
                fighter: PlayerSlot::One,
                slot: AttackSlot::Primary
            }
        )));
    }

    // === Attacks ===

    #[test]
    fn test_approach_and_punch_scenario() {
        let mut duel = Duel::new("tutankhamun");
        assert_eq!(duel.a.x, 400.0);
        assert_eq!(duel.b.x, 900.0);

        // 64 * 6 = 384 → dx = 116 ≤ reach 120
        duel.run(&pressed(&[keys::D]), 64);
        assert_eq!(duel.a.x, 784.0);
        assert_eq!(duel.b.health, 100);

        duel.tick(&pressed(&[keys::F]));
        let idle = InputSnapshot::new();
        duel.run(&idle, 4);
        assert_eq!(duel.b.health, 100, "hit must wait for the hit frame");

        duel.run(&idle, 8);
        assert_eq!(duel.b.health, 80);
        assert!(duel.b.invincible_timer > 0);
        assert_eq!(duel.hits_on(PlayerSlot::Two), 1);
    }

    #[test]
    fn test_hit_resolves_once_per_swing() {
        let mut duel = Duel::new("tutankhamun");
        duel.run(&pressed(&[keys::D]), 64);
        duel.tick(&pressed(&[keys::F]));

        // Весь swing (30 тиков), invincibility истекает на середине
        duel.run(&InputSnapshot::new(), 28);
        assert_eq!(duel.b.invincible_timer, 0);
        assert_eq!(duel.b.health, 80);
        assert_eq!(duel.hits_on(PlayerSlot::Two), 1);
        assert!(duel.a.is_attacking(), "swing still running");
        assert!(duel.a.current_attack().is_some_and(|attack| attack.hit_resolved));
    }

    #[test]
    fn test_out_of_range_swing_whiffs() {
        let mut duel = Duel::new("tutankhamun");
        duel.tick(&pressed(&[keys::F]));
        duel.run(&InputSnapshot::new(), 12);

        assert_eq!(duel.b.health, 100);
        assert!(duel
            .events
            .iter()
            .any(|event| matches!(event, CombatEvent::Whiffed { attacker: PlayerSlot::One, .. })));
    }

    #[test]
    fn test_attack_returns_to_idle_after_clip() {
        let mut duel = Duel::new("tutankhamun");
        duel.tick(&pressed(&[keys::F]));
        // 6 кадров * 5 тиков
        duel.run(&InputSnapshot::new(), 29);
        assert!(!duel.a.is_attacking());
        assert_eq!(duel.a.state, FighterState::Idle);
    }

    #[test]
    fn test_priority_and_single_start_per_tick() {
        let mut duel = Duel::new("tutankhamun");
        duel.tick(&pressed(&[keys::F, keys::G, keys::H]));

        assert_eq!(duel.a.state, FighterState::Attack(AttackSlot::Primary));
        assert_eq!(duel.a.cooldowns().remaining(AttackSlot::Primary), 30);
        assert_eq!(duel.a.cooldowns().remaining(AttackSlot::Secondary), 0);
        assert_eq!(duel.a.cooldowns().remaining(AttackSlot::Special), 0);
    }

    #[test]
    fn test_cooldown_blocks_restart() {
        let mut duel = Duel::new("tutankhamun");
        let punch = pressed(&[keys::F]);

        duel.tick(&punch);
        // Клип доигрывает за 30 тиков, cooldown ещё не истёк на 29-м
        duel.run(&InputSnapshot::new(), 29);
        assert!(!duel.a.is_attacking());
        assert_eq!(duel.a.cooldowns().remaining(AttackSlot::Primary), 1);

        // Следующий тик: cooldown → 0 на шаге 2, атака стартует снова
        duel.tick(&punch);
        assert!(duel.a.is_attacking());
        let started = duel
            .events
            .iter()
            .filter(|event| matches!(event, CombatEvent::AttackStarted { fighter: PlayerSlot::One, .. }))
            .count();
        assert_eq!(started, 2);
    }

    #[test]
    fn test_special_plays_sound_and_spawns_effect() {
        let mut duel = Duel::new("samurai_archer");
        duel.tick(&pressed(&[keys::H]));

        assert_eq!(duel.a.state, FighterState::Attack(AttackSlot::Special));
        assert!(duel.audio.played.contains(&SoundKey::Special));
        assert_eq!(duel.a.effects().len(), 1);

        let effect = &duel.a.effects()[0];
        assert!(effect.x > duel.a.x, "effect spawns in front of a right-facing fighter");

        // 4 кадра * 18 тиков
        duel.run(&InputSnapshot::new(), 80);
        assert!(duel.a.effects().is_empty());
    }

    // === Damage ===

    #[test]
    fn test_invincibility_blocks_damage() {
        let mut duel = Duel::new("tutankhamun");
        let mut ctx = TickContext {
            audio: &mut duel.audio,
            events: &mut duel.events,
        };

        assert!(duel.b.take_hit(10, None, &mut ctx));
        assert_eq!(duel.b.health, 90);
        assert_eq!(duel.b.invincible_timer, 20);

        assert!(!duel.b.take_hit(10, None, &mut ctx));
        assert_eq!(duel.b.health, 90);
        assert_eq!(duel.b.hit_flash_timer, 10);
    }

    #[test]
    fn test_take_hit_cancels_defender_attack() {
        let mut duel = Duel::new("tutankhamun");
        duel.tick(&pressed(&[keys::K]));
        assert!(duel.b.is_attacking());

        let mut ctx = TickContext {
            audio: &mut duel.audio,
            events: &mut duel.events,
        };
        duel.b.take_hit(5, None, &mut ctx);

        assert!(!duel.b.is_attacking());
        assert_eq!(duel.b.state, FighterState::TakeHit);
        assert_eq!(duel.b.clock.frame_index, 0);
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut duel = Duel::new("tutankhamun");
        let mut ctx = TickContext {
            audio: &mut duel.audio,
            events: &mut duel.events,
        };
        duel.b.take_hit(-50, None, &mut ctx);
        assert_eq!(duel.b.health, 100);
    }

    // === Death ===

    #[test]
    fn test_lethal_hit_kills_immediately_and_death_holds() {
        let mut duel = Duel::new("tutankhamun");
        {
            let mut ctx = TickContext {
                audio: &mut duel.audio,
                events: &mut duel.events,
            };
            assert!(duel.b.take_hit(200, None, &mut ctx));
        }

        assert!(duel.b.is_dead);
        assert_eq!(duel.b.state, FighterState::Death);
        assert_eq!(duel.b.health, -100);
        assert_eq!(duel.b.display_health(), 0);
        assert_eq!(duel.audio.played, vec![SoundKey::Hit, SoundKey::Ko]);
        assert!(!duel.b.death_animation_complete());

        // Мёртвый боец игнорирует input
        let x_before = duel.b.x;
        let mut last_frame = 0;
        for _ in 0..40 {
            duel.tick(&pressed(&[keys::LEFT]));
            assert!(duel.b.clock.frame_index >= last_frame);
            last_frame = duel.b.clock.frame_index;
        }
        assert_eq!(duel.b.x, x_before);
        assert_eq!(duel.b.clock.frame_index, 3);
        assert!(duel.b.death_animation_complete());

        // Дальше кадр не двигается
        duel.run(&InputSnapshot::new(), 30);
        assert_eq!(duel.b.clock.frame_index, 3);

        let knockouts = duel
            .events
            .iter()
            .filter(|event| matches!(event, CombatEvent::KnockedOut { .. }))
            .count();
        assert_eq!(knockouts, 1);
    }

    #[test]
    fn test_dead_fighter_ignores_hits() {
        let mut duel = Duel::new("tutankhamun");
        let mut ctx = TickContext {
            audio: &mut duel.audio,
            events: &mut duel.events,
        };
        duel.b.take_hit(100, None, &mut ctx);
        duel.b.invincible_timer = 0;
        assert!(!duel.b.take_hit(10, None, &mut ctx));
        assert_eq!(duel.b.health, 0);
    }

    // === Arena / reset ===

    #[test]
    fn test_position_clamped_to_arena() {
        let mut duel = Duel::new("tutankhamun");
        duel.run(&pressed(&[keys::A]), 200);
        assert_eq!(duel.a.x, duel.a.width() / 2.0);
    }

    #[test]
    fn test_reset_restores_round_start() {
        let mut duel = Duel::new("samurai_archer");
        duel.run(&pressed(&[keys::D, keys::W, keys::H]), 10);
        {
            let mut ctx = TickContext {
                audio: &mut duel.audio,
                events: &mut duel.events,
            };
            duel.a.take_hit(30, None, &mut ctx);
        }

        duel.a.reset();
        assert_eq!(duel.a.x, 400.0);
        assert_eq!(duel.a.y, duel.a.ground_y());
        assert_eq!(duel.a.health, 100);
        assert_eq!(duel.a.state, FighterState::Idle);
        assert_eq!(duel.a.jumps_remaining, MAX_JUMPS);
        assert_eq!(duel.a.invincible_timer, 0);
        assert!(duel.a.effects().is_empty());
        assert!(!duel.a.is_attacking());
        assert!(duel.a.cooldowns().is_ready(AttackSlot::Special));

        duel.b.reset();
        assert_eq!(duel.b.facing, crate::animation::Facing::Left);
    }
}
