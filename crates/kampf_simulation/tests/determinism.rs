//! Тесты детерминизма
//!
//! Один и тот же seed → идентичный матч (bot vs bot, через Bevy FixedUpdate)

use bevy::prelude::*;
use kampf_simulation::*;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 3000;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 1500;

    // Все прогоны тик в тик совпадают с первым
    let traces: Vec<_> = (0..3).map(|_| run_trace(SEED, TICK_COUNT)).collect();

    for (i, trace) in traces.iter().enumerate().skip(1) {
        assert_eq!(
            traces[0], *trace,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_core_is_deterministic_without_bevy() {
    let script = |tick: usize| -> InputSnapshot {
        use kampf_simulation::input::keys;
        let mut input = InputSnapshot::new();
        input.set(keys::D, tick % 90 < 60);
        input.set(keys::F, tick % 7 == 0);
        input.set(keys::W, tick % 120 == 5);
        input.set(keys::LEFT, tick % 50 < 20);
        input.set(keys::L, tick % 11 == 0);
        input
    };

    let run = || {
        let mut state = MatchState::default();
        state.start_match();
        let mut combat = Vec::new();
        for tick in 0..2000 {
            combat.extend(state.tick(&script(tick), &mut NullAudio).combat);
        }
        (state.snapshot(), combat)
    };

    assert_eq!(run(), run());
}

fn create_bot_match(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    {
        let mut bots = app.world_mut().resource_mut::<BotControl>();
        bots.enable(PlayerSlot::One, SparringBot::default());
        bots.enable(PlayerSlot::Two, SparringBot::default());
    }
    app.world_mut().resource_mut::<MatchState>().start_match();
    app
}

/// Прогоняет матч и возвращает финальный snapshot
fn run_simulation(seed: u64, tick_count: usize) -> MatchSnapshot {
    let mut app = create_bot_match(seed);
    for _ in 0..tick_count {
        app.world_mut().run_schedule(FixedUpdate);
    }
    app.world().resource::<MatchState>().snapshot()
}

/// Snapshot после каждого тика
fn run_trace(seed: u64, tick_count: usize) -> Vec<MatchSnapshot> {
    let mut app = create_bot_match(seed);
    (0..tick_count)
        .map(|_| {
            app.world_mut().run_schedule(FixedUpdate);
            app.world().resource::<MatchState>().snapshot()
        })
        .collect()
}
