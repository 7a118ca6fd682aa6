//! MatchState: владелец двух бойцов, таймера раунда и счёта матча
//!
//! Tick order внутри Playing фиксирован:
//! fighter One → fighter Two → separation → round timer → KO → timeout.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::separation::resolve_overlap;
use crate::assets::{AssetProvider, FighterCatalog, GeneratedSheets};
use crate::audio::{play_sound, AudioSink, SoundKey};
use crate::combat::CombatEvent;
use crate::fighter::{Fighter, FighterSnapshot, TickContext};
use crate::input::{ControlBindings, InputSnapshot, PlayerSlot};
use crate::render::Renderer;
use crate::settings::{GameSettings, MatchRules, FPS};

/// Top-level phase of the match state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum MatchPhase {
    /// Character select / idle, ничего не симулируется
    Menu,
    Playing,
    Paused,
    /// Между раундами (auto-advance по таймеру)
    RoundOver,
    /// Матч решён, возврат в Menu по таймеру
    MatchOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Knockout { winner: PlayerSlot },
    Timeout { winner: PlayerSlot },
    /// `points_awarded == false` когда оба были на match point
    Draw { points_awarded: bool },
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<PlayerSlot> {
        match self {
            RoundOutcome::Knockout { winner } | RoundOutcome::Timeout { winner } => Some(*winner),
            RoundOutcome::Draw { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchWinner {
    Player(PlayerSlot),
    Tie,
}

/// Match-level events (forwarded to Bevy by `advance_match`).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MatchEvent {
    MatchStarted,
    RoundStarted { round: u32 },
    RoundEnded { outcome: RoundOutcome, scores: [u32; 2] },
    MatchEnded { winner: MatchWinner, scores: [u32; 2] },
    Paused,
    Resumed,
    ReturnedToMenu,
    FighterSelected { slot: PlayerSlot, key: String },
}

/// Everything that happened during one [`MatchState::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub combat: Vec<CombatEvent>,
    pub match_events: Vec<MatchEvent>,
}

#[derive(Resource)]
pub struct MatchState {
    rules: MatchRules,
    fighters: [Fighter; 2],
    catalog: FighterCatalog,
    assets: Box<dyn AssetProvider + Send + Sync>,
    selection: [String; 2],
    controls: [ControlBindings; 2],

    // === Flow ===
    phase: MatchPhase,
    scores: [u32; 2],
    round: u32,
    round_ticks_remaining: u32,
    round_restart_timer: u32,
    match_restart_timer: u32,
    last_outcome: Option<RoundOutcome>,
    match_winner: Option<MatchWinner>,
    /// Фоновая музыка зациклена бэкендом, запрашивается один раз
    music_started: bool,

    /// События из вызовов вне tick (start_match, pause, ...)
    pending: Vec<MatchEvent>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(
            &GameSettings::default(),
            FighterCatalog::default(),
            Box::new(GeneratedSheets::default()),
        )
    }
}

impl MatchState {
    pub fn new(
        settings: &GameSettings,
        catalog: FighterCatalog,
        assets: Box<dyn AssetProvider + Send + Sync>,
    ) -> Self {
        let settings = settings.clone().sanitized();
        let controls = PlayerSlot::ALL.map(|slot| {
            ControlBindings::normalized(settings.controls_for(slot), &ControlBindings::defaults(slot))
        });
        let selection = PlayerSlot::ALL.map(|slot| {
            let definition = match settings.fighter_for(slot) {
                Some(key) => catalog.resolve(Some(key)),
                None => catalog.default_for(slot),
            };
            definition.key.clone()
        });
        let fighters = PlayerSlot::ALL.map(|slot| {
            let definition = catalog.resolve(Some(&selection[slot.index()]));
            Fighter::from_definition(slot, controls[slot.index()], definition, assets.as_ref())
        });

        Self {
            rules: settings.rules,
            fighters,
            catalog,
            assets,
            selection,
            controls,
            phase: MatchPhase::Menu,
            scores: [0, 0],
            round: 0,
            round_ticks_remaining: settings.rules.round_time_limit_ticks(),
            round_restart_timer: 0,
            match_restart_timer: 0,
            last_outcome: None,
            match_winner: None,
            music_started: false,
            pending: Vec::new(),
        }
    }

    // === Per-tick ===

    /// Advances the match by one fixed tick.
    pub fn tick(&mut self, input: &InputSnapshot, audio: &mut dyn AudioSink) -> TickReport {
        let mut combat = Vec::new();

        if !self.music_started {
            self.music_started = true;
            play_sound(audio, SoundKey::Music);
        }

        match self.phase {
            MatchPhase::Playing => self.tick_round(input, audio, &mut combat),
            MatchPhase::RoundOver => {
                self.round_restart_timer = self.round_restart_timer.saturating_sub(1);
                if self.round_restart_timer == 0 {
                    self.start_round();
                }
            }
            MatchPhase::MatchOver => {
                self.match_restart_timer = self.match_restart_timer.saturating_sub(1);
                if self.match_restart_timer == 0 {
                    self.back_to_menu();
                }
            }
            MatchPhase::Menu | MatchPhase::Paused => {}
        }

        TickReport {
            combat,
            match_events: self.take_events(),
        }
    }

    fn tick_round(&mut self, input: &InputSnapshot, audio: &mut dyn AudioSink, combat: &mut Vec<CombatEvent>) {
        {
            let mut ctx = TickContext {
                audio,
                events: combat,
            };
            let [first, second] = &mut self.fighters;
            first.update(input, second, &mut ctx);
            second.update(input, first, &mut ctx);
            resolve_overlap(first, second);
        }

        self.round_ticks_remaining = self.round_ticks_remaining.saturating_sub(1);

        if let Some(outcome) = self.knockout_outcome() {
            self.finish_round(outcome);
        } else if self.round_ticks_remaining == 0 {
            let outcome = match self.leader_by_health() {
                Some(winner) => RoundOutcome::Timeout { winner },
                None => self.draw_outcome(),
            };
            self.finish_round(outcome);
        }
    }

    /// Round ends only once a death clip has reached its last frame.
    fn knockout_outcome(&self) -> Option<RoundOutcome> {
        let [first, second] = &self.fighters;
        let first_done = first.death_animation_complete();
        let second_done = second.death_animation_complete();
        if !first_done && !second_done {
            return None;
        }

        // Оба мертвы: решает health, при равенстве ничья
        if first.is_dead && second.is_dead {
            return Some(match self.leader_by_health() {
                Some(winner) => RoundOutcome::Knockout { winner },
                None => self.draw_outcome(),
            });
        }

        let winner = if first_done {
            PlayerSlot::Two
        } else {
            PlayerSlot::One
        };
        Some(RoundOutcome::Knockout { winner })
    }

    fn leader_by_health(&self) -> Option<PlayerSlot> {
        let [first, second] = &self.fighters;
        let (one, two) = (first.display_health(), second.display_health());
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::One),
            std::cmp::Ordering::Less => Some(PlayerSlot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Draw scores nothing when both players already sit on match point.
    fn draw_outcome(&self) -> RoundOutcome {
        let match_point = self.rules.wins_to_match.saturating_sub(1);
        let both_on_match_point = self.scores.iter().all(|score| *score == match_point);
        RoundOutcome::Draw {
            points_awarded: !both_on_match_point,
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Knockout { winner } | RoundOutcome::Timeout { winner } => {
                self.scores[winner.index()] += 1;
            }
            RoundOutcome::Draw { points_awarded: true } => {
                self.scores[0] += 1;
                self.scores[1] += 1;
            }
            RoundOutcome::Draw { points_awarded: false } => {}
        }

        self.last_outcome = Some(outcome);
        self.pending.push(MatchEvent::RoundEnded {
            outcome,
            scores: self.scores,
        });
        crate::logger::log_info(&format!(
            "🏁 Round {} over: {:?} (score {}-{})",
            self.round, outcome, self.scores[0], self.scores[1]
        ));

        let wins = self.rules.wins_to_match;
        if self.scores.iter().any(|score| *score >= wins) {
            let winner = match self.scores[0].cmp(&self.scores[1]) {
                std::cmp::Ordering::Greater => MatchWinner::Player(PlayerSlot::One),
                std::cmp::Ordering::Less => MatchWinner::Player(PlayerSlot::Two),
                std::cmp::Ordering::Equal => MatchWinner::Tie,
            };
            self.match_winner = Some(winner);
            self.phase = MatchPhase::MatchOver;
            self.match_restart_timer = self.rules.match_restart_ticks().max(1);
            self.pending.push(MatchEvent::MatchEnded {
                winner,
                scores: self.scores,
            });
            crate::logger::log_info(&format!(
                "🏆 Match over: {:?} ({}-{})",
                winner, self.scores[0], self.scores[1]
            ));
        } else {
            self.phase = MatchPhase::RoundOver;
            self.round_restart_timer = self.rules.round_restart_ticks().max(1);
        }
    }

    // === Flow control ===

    /// Zeroes the scores and starts round 1 (from any phase).
    pub fn start_match(&mut self) {
        self.scores = [0, 0];
        self.round = 0;
        self.last_outcome = None;
        self.match_winner = None;
        self.pending.push(MatchEvent::MatchStarted);
        crate::logger::log_info(&format!(
            "🏁 Match start: '{}' vs '{}' (first to {})",
            self.fighters[0].name(),
            self.fighters[1].name(),
            self.rules.wins_to_match
        ));
        self.start_round();
    }

    fn start_round(&mut self) {
        self.round += 1;
        self.begin_round();
    }

    fn begin_round(&mut self) {
        for fighter in &mut self.fighters {
            fighter.reset();
        }
        self.round_ticks_remaining = self.rules.round_time_limit_ticks();
        self.round_restart_timer = 0;
        self.phase = MatchPhase::Playing;
        self.pending.push(MatchEvent::RoundStarted { round: self.round });
        crate::logger::log(&format!("🏁 Round {} start", self.round));
    }

    /// RoundOver → next round immediately; Paused → replays the current round.
    pub fn restart_round(&mut self) -> bool {
        match self.phase {
            MatchPhase::RoundOver => {
                self.start_round();
                true
            }
            MatchPhase::Paused => {
                self.begin_round();
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != MatchPhase::Playing {
            return false;
        }
        self.phase = MatchPhase::Paused;
        self.pending.push(MatchEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = MatchPhase::Playing;
        self.pending.push(MatchEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            MatchPhase::Playing => self.pause(),
            MatchPhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Same fighters, fresh match. Only from MatchOver.
    pub fn rematch(&mut self) -> bool {
        if self.phase != MatchPhase::MatchOver {
            return false;
        }
        self.start_match();
        true
    }

    pub fn back_to_menu(&mut self) {
        self.phase = MatchPhase::Menu;
        self.match_restart_timer = 0;
        self.round_restart_timer = 0;
        for fighter in &mut self.fighters {
            fighter.reset();
        }
        self.pending.push(MatchEvent::ReturnedToMenu);
    }

    // === Character select ===

    /// Swaps `slot`'s fighter. Unknown keys fall back to the first catalog entry.
    pub fn select_fighter(&mut self, slot: PlayerSlot, key: &str) -> bool {
        if self.phase != MatchPhase::Menu {
            crate::logger::log_warning(&format!(
                "🎮 Fighter select ignored outside menu ({:?})",
                self.phase
            ));
            return false;
        }

        let definition = self.catalog.resolve(Some(key));
        let fighter = Fighter::from_definition(
            slot,
            self.controls[slot.index()],
            definition,
            self.assets.as_ref(),
        );
        let resolved = definition.key.clone();

        self.fighters[slot.index()] = fighter;
        self.selection[slot.index()] = resolved.clone();
        self.pending.push(MatchEvent::FighterSelected { slot, key: resolved });
        true
    }

    // === Accessors ===

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        &self.fighters[slot.index()]
    }

    pub fn fighter_mut(&mut self, slot: PlayerSlot) -> &mut Fighter {
        &mut self.fighters[slot.index()]
    }

    pub fn selection(&self, slot: PlayerSlot) -> &str {
        &self.selection[slot.index()]
    }

    pub fn catalog(&self) -> &FighterCatalog {
        &self.catalog
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn match_winner(&self) -> Option<MatchWinner> {
        self.match_winner
    }

    pub fn round_ticks_remaining(&self) -> u32 {
        self.round_ticks_remaining
    }

    /// HUD timer: whole seconds, rounded up.
    pub fn round_seconds_remaining(&self) -> u32 {
        self.round_ticks_remaining.div_ceil(FPS)
    }

    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        for fighter in &self.fighters {
            fighter.draw(renderer);
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            round: self.round,
            scores: self.scores,
            round_ticks_remaining: self.round_ticks_remaining,
            last_outcome: self.last_outcome,
            match_winner: self.match_winner,
            fighters: [self.fighters[0].snapshot(), self.fighters[1].snapshot()],
        }
    }
}

/// Serializable read model of the whole match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub round: u32,
    pub scores: [u32; 2],
    pub round_ticks_remaining: u32,
    pub last_outcome: Option<RoundOutcome>,
    pub match_winner: Option<MatchWinner>,
    pub fighters: [FighterSnapshot; 2],
}
