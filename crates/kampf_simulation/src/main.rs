//! Headless симуляция Kampf
//!
//! Bot vs bot матч без рендера: проверка детерминизма и баланса на глаз.
//! Использование: `kampf_simulation [seed] [fighter1] [fighter2]`

use bevy::prelude::*;
use kampf_simulation::{
    create_headless_app, BotControl, MatchPhase, MatchState, PlayerSlot, SimulationPlugin, SparringBot,
};

/// Hard stop: 20 минут игрового времени
const MAX_TICKS: u64 = 60 * 60 * 20;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(42);
    let fighters = [args.next(), args.next()];
    println!("Starting Kampf headless match (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    {
        let mut bots = app.world_mut().resource_mut::<BotControl>();
        bots.enable(PlayerSlot::One, SparringBot::default());
        bots.enable(PlayerSlot::Two, SparringBot::default());
    }
    {
        let mut state = app.world_mut().resource_mut::<MatchState>();
        for (slot, key) in PlayerSlot::ALL.into_iter().zip(fighters) {
            if let Some(key) = key {
                state.select_fighter(slot, &key);
            }
        }
        println!(
            "{} vs {}",
            state.fighter(PlayerSlot::One).name(),
            state.fighter(PlayerSlot::Two).name()
        );
        state.start_match();
    }

    let mut phase = MatchPhase::Playing;
    for tick in 0..MAX_TICKS {
        app.world_mut().run_schedule(FixedUpdate);

        let state = app.world().resource::<MatchState>();
        if state.phase() == phase {
            continue;
        }
        phase = state.phase();

        match phase {
            MatchPhase::RoundOver | MatchPhase::MatchOver => {
                let [one, two] = state.scores();
                println!(
                    "Tick {}: round {} → {:?} (score {}-{}, hp {}/{})",
                    tick,
                    state.round(),
                    state.last_outcome(),
                    one,
                    two,
                    state.fighter(PlayerSlot::One).display_health(),
                    state.fighter(PlayerSlot::Two).display_health()
                );
            }
            MatchPhase::Playing => println!("Tick {}: round {} start", tick, state.round()),
            MatchPhase::Menu => {
                println!("Match complete: {:?}", state.match_winner());
                return;
            }
            MatchPhase::Paused => {}
        }
    }

    println!("Tick limit reached without a result");
}
