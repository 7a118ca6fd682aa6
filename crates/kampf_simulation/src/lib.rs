//! Kampf Simulation Core
//!
//! Детерминированная симуляция 2D файтинга (два бойца, раунды, матч) на Bevy 0.16.
//!
//! Слои:
//! - Core (plain Rust): `Fighter`, `MatchState`, анимации, hit test
//! - Host (Bevy): `SimulationPlugin` / `MatchPlugin` гоняют `MatchState::tick` в FixedUpdate
//!
//! Рендер, звук и ассеты приходят снаружи через trait'ы
//! (`Renderer`, `AudioSink`, `AssetProvider`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod animation;
pub mod assets;
pub mod audio;
pub mod combat;
pub mod fighter;
pub mod input;
pub mod logger;
pub mod match_flow;
pub mod render;
pub mod settings;

// Re-export для удобства
pub use animation::{AnimationClip, AnimationClock, Facing, FighterState};
pub use assets::{AssetProvider, FighterCatalog, FighterDefinition, GeneratedSheets, NoAssets};
pub use audio::{AudioOutput, AudioSink, NullAudio, SoundKey};
pub use combat::{AttackProfile, AttackSlot, CombatEvent};
pub use fighter::{Fighter, FighterSnapshot, TickContext};
pub use input::{BotControl, ControlAction, ControlBindings, InputCode, InputSnapshot, PlayerSlot, SparringBot};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use match_flow::{
    MatchEvent, MatchPhase, MatchPlugin, MatchSnapshot, MatchState, MatchWinner, RoundOutcome, TickReport,
};
pub use render::{DrawList, Renderer};
pub use settings::{GameSettings, MatchRules, FPS};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz: physics и frame-advance считаются в тиках
            .insert_resource(Time::<Fixed>::from_hz(FPS as f64))
            // Детерминистичный RNG (seed по умолчанию, не перетираем уже вставленный)
            .init_resource::<DeterministicRng>()
            .add_plugins(MatchPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(FPS as f64)); // 60Hz FixedUpdate

    app
}
