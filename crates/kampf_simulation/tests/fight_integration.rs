//! Fight integration test
//!
//! Полный стек: headless App + SimulationPlugin, тики через FixedUpdate.
//!
//! Проверяем:
//! - End-to-end KO: A подходит, бьёт punch'ем до нокаута, раунд засчитан A
//! - Health инварианты (не растёт у живого бойца)
//! - Bevy events (CombatEvent / MatchEvent) доходят до хоста
//! - Bot vs bot без паник

use bevy::prelude::*;
use kampf_simulation::input::keys;
use kampf_simulation::*;

/// Helper: создать полный fight App с всеми plugins
fn create_fight_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

/// Один fixed tick (без Time-driven accumulator)
fn step(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn set_input(app: &mut App, codes: &[InputCode]) {
    *app.world_mut().resource_mut::<InputSnapshot>() = InputSnapshot::from_pressed(codes.iter().copied());
}

fn combat_events(app: &App) -> Vec<CombatEvent> {
    app.world()
        .resource::<Events<CombatEvent>>()
        .iter_current_update_events()
        .copied()
        .collect()
}

fn match_events(app: &App) -> Vec<MatchEvent> {
    app.world()
        .resource::<Events<MatchEvent>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

#[test]
fn test_plugin_registers_resources() {
    let app = create_fight_app(7);
    let world = app.world();

    assert!(world.contains_resource::<MatchState>());
    assert!(world.contains_resource::<InputSnapshot>());
    assert!(world.contains_resource::<AudioOutput>());
    assert!(world.contains_resource::<BotControl>());
    // Seed из create_headless_app не перетёрт SimulationPlugin'ом
    assert_eq!(world.resource::<DeterministicRng>().seed, 7);
    assert_eq!(world.resource::<MatchState>().phase(), MatchPhase::Menu);
}

#[test]
fn test_walk_in_and_punch_to_knockout() {
    let mut app = create_fight_app(42);
    app.world_mut().resource_mut::<MatchState>().start_match();

    {
        let state = app.world().resource::<MatchState>();
        assert_eq!(state.fighter(PlayerSlot::One).x, 400.0);
        assert_eq!(state.fighter(PlayerSlot::Two).x, 900.0);
    }

    // A держит "вправо" + punch: первые замахи мимо, потом попадания
    set_input(&mut app, &[keys::D, keys::F]);

    let mut last_health = 100;
    let mut ticks = 0;
    while app.world().resource::<MatchState>().phase() == MatchPhase::Playing && ticks < 3000 {
        step(&mut app);
        ticks += 1;

        let state = app.world().resource::<MatchState>();
        let defender = state.fighter(PlayerSlot::Two);
        if !defender.is_dead {
            assert!(
                defender.health <= last_health,
                "health grew {} → {} at tick {}",
                last_health,
                defender.health,
                ticks
            );
        }
        last_health = defender.health;
    }

    let state = app.world().resource::<MatchState>();
    assert_eq!(state.phase(), MatchPhase::RoundOver);
    assert_eq!(state.last_outcome(), Some(RoundOutcome::Knockout { winner: PlayerSlot::One }));
    assert_eq!(state.scores(), [1, 0]);
    assert_eq!(state.fighter(PlayerSlot::One).health, 100);

    let defender = state.fighter(PlayerSlot::Two);
    assert!(defender.is_dead);
    assert_eq!(defender.state, FighterState::Death);
    assert!(defender.death_animation_complete());

    let events = combat_events(&app);
    let hits: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::Hit {
                defender: PlayerSlot::Two,
                damage,
                health_after,
            } => Some((*damage, *health_after)),
            _ => None,
        })
        .collect();
    // 100 HP / 20 за punch
    assert_eq!(hits, vec![(20, 80), (20, 60), (20, 40), (20, 20), (20, 0)]);
    assert!(events
        .iter()
        .any(|event| matches!(event, CombatEvent::Whiffed { attacker: PlayerSlot::One, .. })));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, CombatEvent::KnockedOut { .. }))
            .count(),
        1
    );

    let round_events = match_events(&app);
    assert!(round_events.contains(&MatchEvent::RoundEnded {
        outcome: RoundOutcome::Knockout { winner: PlayerSlot::One },
        scores: [1, 0],
    }));
}

#[test]
fn test_death_clip_holds_last_frame() {
    let mut app = create_fight_app(42);
    app.world_mut().resource_mut::<MatchState>().start_match();
    app.world_mut()
        .resource_mut::<MatchState>()
        .fighter_mut(PlayerSlot::Two)
        .health = 0;

    while app.world().resource::<MatchState>().phase() == MatchPhase::Playing {
        step(&mut app);
    }

    let frame = app.world().resource::<MatchState>().fighter(PlayerSlot::Two).clock.frame_index;
    // RoundOver ещё не сбросил бойцов: кадр стоит на месте
    for _ in 0..30 {
        step(&mut app);
    }
    let state = app.world().resource::<MatchState>();
    assert_eq!(state.phase(), MatchPhase::RoundOver);
    assert_eq!(state.fighter(PlayerSlot::Two).clock.frame_index, frame);
}

#[test]
fn test_bots_fight_without_panics() {
    let mut app = create_fight_app(42);
    {
        let mut bots = app.world_mut().resource_mut::<BotControl>();
        bots.enable(PlayerSlot::One, SparringBot::default());
        bots.enable(PlayerSlot::Two, SparringBot::default());
    }
    app.world_mut().resource_mut::<MatchState>().start_match();

    for _ in 0..6000 {
        step(&mut app);

        let state = app.world().resource::<MatchState>();
        let wins = state.rules().wins_to_match;
        assert!(state.scores().iter().all(|score| *score <= wins));
        for slot in PlayerSlot::ALL {
            let fighter = state.fighter(slot);
            assert!(fighter.health <= 100);
            let (min_x, max_x) = kampf_simulation::settings::arena_x_range(fighter.width());
            assert!(fighter.x >= min_x && fighter.x <= max_x);
            assert!(fighter.y >= fighter.ground_y());
        }
    }

    let events = combat_events(&app);
    assert!(events
        .iter()
        .any(|event| matches!(event, CombatEvent::AttackStarted { .. })));
}

#[test]
fn test_bots_idle_outside_playing() {
    let mut app = create_fight_app(3);
    app.world_mut()
        .resource_mut::<BotControl>()
        .enable(PlayerSlot::Two, SparringBot::default());

    // Menu: бот ничего не нажимает
    for _ in 0..20 {
        step(&mut app);
    }
    assert!(app.world().resource::<InputSnapshot>().is_empty());
}

#[test]
fn test_pause_releases_held_keys() {
    let mut app = create_fight_app(42);
    app.world_mut().resource_mut::<MatchState>().start_match();

    set_input(&mut app, &[keys::D]);
    step(&mut app);
    assert!(app.world_mut().resource_mut::<MatchState>().pause());
    step(&mut app);

    assert!(match_events(&app).contains(&MatchEvent::Paused));
    assert!(app.world().resource::<InputSnapshot>().is_empty());

    let x = app.world().resource::<MatchState>().fighter(PlayerSlot::One).x;
    assert!(app.world_mut().resource_mut::<MatchState>().resume());
    for _ in 0..10 {
        step(&mut app);
    }
    // D больше не зажата: боец стоит на месте
    let state = app.world().resource::<MatchState>();
    assert_eq!(state.phase(), MatchPhase::Playing);
    assert_eq!(state.fighter(PlayerSlot::One).x, x);
}
