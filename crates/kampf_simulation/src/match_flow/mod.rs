//! Match flow: раунды, счёт, пауза и Bevy-адаптер над `MatchState`
//!
//! Системы тонкие: вся логика в `MatchState::tick`, который вызывается и без
//! Bevy (unit tests, headless binary).

use bevy::prelude::*;

use crate::audio::AudioOutput;
use crate::combat::CombatEvent;
use crate::input::{BotControl, InputSnapshot, PlayerSlot};
use crate::DeterministicRng;

pub mod separation;
pub mod state;


pub use separation::{resolve_overlap, split_overlap};
pub use state::{MatchEvent, MatchPhase, MatchSnapshot, MatchState, MatchWinner, RoundOutcome, TickReport};

/// Match Plugin
///
/// Регистрирует:
/// - Events: CombatEvent, MatchEvent
/// - Resources: MatchState, InputSnapshot, AudioOutput, BotControl
/// - Systems (FixedUpdate, chained): drive_sparring_bots → advance_match
pub struct MatchPlugin;

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatEvent>()
            .add_event::<MatchEvent>()
            .init_resource::<DeterministicRng>()
            .init_resource::<InputSnapshot>()
            .init_resource::<AudioOutput>()
            .init_resource::<BotControl>()
            .init_resource::<MatchState>()
            .add_systems(FixedUpdate, (drive_sparring_bots, advance_match).chain());
    }
}

/// Bot-driven slots write their keys into the shared snapshot.
pub fn drive_sparring_bots(
    state: Res<MatchState>,
    mut bots: ResMut<BotControl>,
    mut rng: ResMut<DeterministicRng>,
    mut input: ResMut<InputSnapshot>,
) {
    if state.phase() != MatchPhase::Playing {
        return;
    }

    for slot in PlayerSlot::ALL {
        let Some(bot) = bots.bot_mut(slot) else {
            continue;
        };
        bot.decide(
            &mut rng.rng,
            state.fighter(slot),
            state.fighter(slot.opponent()),
            &mut input,
        );
    }
}

/// One simulation tick; events go out through Bevy's event queues.
///
/// На входе в паузу удержанные клавиши сбрасываются: после resume боец
/// не продолжает движение, пока клавишу не нажмут снова.
pub fn advance_match(
    mut state: ResMut<MatchState>,
    mut input: ResMut<InputSnapshot>,
    mut audio: ResMut<AudioOutput>,
    mut combat_events: EventWriter<CombatEvent>,
    mut match_events: EventWriter<MatchEvent>,
) {
    let report = state.tick(&input, audio.sink_mut());

    if report.match_events.contains(&MatchEvent::Paused) {
        input.clear();
    }

    for event in report.combat {
        combat_events.write(event);
    }
    for event in report.match_events {
        match_events.write(event);
    }
}
