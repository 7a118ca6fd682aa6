//! Sparring bot: простой FSM-оппонент, пишущий в общий InputSnapshot
//!
//! Approach → Engage → (иногда) Retreat → Approach
//!
//! Бот нажимает только клавиши своего бойца, поэтому два бота (или бот и
//! человек) делят один snapshot без конфликтов. Вся случайность идёт через
//! переданный RNG, так что seeded матч воспроизводим.

use bevy::prelude::*;
use rand::Rng;

use super::{ControlAction, InputSnapshot, PlayerSlot};
use crate::combat::{hit_reach, AttackSlot};
use crate::fighter::Fighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Идём к оппоненту
    Approach,
    /// В досягаемости: атакуем
    Engage,
    /// Отходим N тиков
    Retreat { ticks: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparringBot {
    pub state: BotState,
    /// Per-tick chance to swing while in reach
    pub aggression: f64,
    pub jump_chance: f64,
    pub retreat_chance: f64,
}

impl Default for SparringBot {
    fn default() -> Self {
        Self {
            state: BotState::Approach,
            aggression: 0.35,
            jump_chance: 0.01,
            retreat_chance: 0.03,
        }
    }
}

impl SparringBot {
    /// Rewrites `me`'s controls in `input` for this tick.
    pub fn decide(&mut self, rng: &mut impl Rng, me: &Fighter, opponent: &Fighter, input: &mut InputSnapshot) {
        let controls = *me.controls();
        for action in ControlAction::ALL {
            input.release(controls.code(action));
        }

        if me.is_dead || opponent.is_dead {
            self.state = BotState::Approach;
            return;
        }

        let gap = (opponent.x - me.x).abs();
        let reach = hit_reach(me.collision_half_width(), opponent.collision_half_width());
        let (toward, away) = if opponent.x > me.x {
            (ControlAction::Right, ControlAction::Left)
        } else {
            (ControlAction::Left, ControlAction::Right)
        };

        self.state = match self.state {
            BotState::Retreat { ticks } if ticks > 0 => BotState::Retreat { ticks: ticks - 1 },
            _ if gap > reach * 0.9 => BotState::Approach,
            _ => BotState::Engage,
        };

        match self.state {
            BotState::Approach => input.press(controls.code(toward)),
            BotState::Retreat { .. } => input.press(controls.code(away)),
            BotState::Engage => {
                if !me.is_attacking() && rng.gen_bool(self.aggression.clamp(0.0, 1.0)) {
                    let roll: f64 = rng.gen();
                    let slot = if roll < 0.55 {
                        AttackSlot::Primary
                    } else if roll < 0.85 {
                        AttackSlot::Secondary
                    } else {
                        AttackSlot::Special
                    };
                    input.press(controls.code(slot.control()));
                } else if rng.gen_bool(self.retreat_chance.clamp(0.0, 1.0)) {
                    self.state = BotState::Retreat {
                        ticks: rng.gen_range(10..30),
                    };
                }
            }
        }

        if me.on_ground && rng.gen_bool(self.jump_chance.clamp(0.0, 1.0)) {
            input.press(controls.code(ControlAction::Jump));
        }
    }
}

/// Which slots are driven by a sparring bot.
#[derive(Resource, Debug, Clone, Default)]
pub struct BotControl {
    bots: [Option<SparringBot>; 2],
}

impl BotControl {
    pub fn enable(&mut self, slot: PlayerSlot, bot: SparringBot) {
        self.bots[slot.index()] = Some(bot);
    }

    pub fn bot_mut(&mut self, slot: PlayerSlot) -> Option<&mut SparringBot> {
        self.bots[slot.index()].as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FighterCatalog, GeneratedSheets};
    use crate::input::ControlBindings;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(slot: PlayerSlot) -> Fighter {
        let catalog = FighterCatalog::default();
        Fighter::from_definition(
            slot,
            ControlBindings::defaults(slot),
            catalog.resolve(None),
            &GeneratedSheets::default(),
        )
    }

    #[test]
    fn test_far_bot_walks_toward_opponent() {
        let me = fighter(PlayerSlot::Two);
        let opponent = fighter(PlayerSlot::One);
        let mut bot = SparringBot {
            jump_chance: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut input = InputSnapshot::new();

        bot.decide(&mut rng, &me, &opponent, &mut input);

        assert_eq!(bot.state, BotState::Approach);
        assert!(me.controls().is_pressed(ControlAction::Left, &input));
        assert!(!me.controls().is_pressed(ControlAction::Right, &input));
    }

    #[test]
    fn test_bot_releases_only_its_own_keys() {
        let me = fighter(PlayerSlot::Two);
        let opponent = fighter(PlayerSlot::One);
        let mut bot = SparringBot::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let human_code = opponent.controls().code(ControlAction::Punch);
        let mut input = InputSnapshot::from_pressed([human_code, me.controls().code(ControlAction::Kick)]);

        bot.decide(&mut rng, &me, &opponent, &mut input);

        assert!(input.is_pressed(human_code));
        assert!(!me.controls().is_pressed(ControlAction::Kick, &input));
    }

    #[test]
    fn test_bot_idle_when_someone_is_dead() {
        let me = fighter(PlayerSlot::One);
        let mut opponent = fighter(PlayerSlot::Two);
        opponent.is_dead = true;
        let mut bot = SparringBot::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut input = InputSnapshot::new();

        bot.decide(&mut rng, &me, &opponent, &mut input);
        assert!(input.is_empty());
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let me = fighter(PlayerSlot::One);
        let mut opponent = fighter(PlayerSlot::Two);
        opponent.x = me.x + 90.0;

        let run = |seed: u64| {
            let mut bot = SparringBot::default();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut trace = Vec::new();
            for _ in 0..200 {
                let mut input = InputSnapshot::new();
                bot.decide(&mut rng, &me, &opponent, &mut input);
                let mut pressed: Vec<_> = ControlAction::ALL
                    .iter()
                    .filter(|action| me.controls().is_pressed(**action, &input))
                    .copied()
                    .collect();
                pressed.sort_by_key(|action| action.index());
                trace.push(pressed);
            }
            trace
        };

        let first = run(99);
        assert_eq!(first, run(99));
        assert!(first.iter().any(|pressed| !pressed.is_empty()));
    }
}
