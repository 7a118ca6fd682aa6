//! Fighter catalog: статические определения персонажей.
//!
//! Определение описывает где лежат спрайты и какие overrides применяются
//! к атакам. Загрузка кадров делается позже, в `fighter::loadout`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::animation::FighterState;
use crate::combat::{AttackOverride, AttackSlot};
use crate::fighter::EffectAnchor;
use crate::input::PlayerSlot;
use crate::settings::{FRAME_SIZE, MAX_FIGHTER_SCALE, MIN_FIGHTER_SCALE};

/// Effect strip attached to an attack slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEffectFile {
    pub slot: AttackSlot,
    pub file: String,
    #[serde(default)]
    pub anchor: EffectAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterDefinition {
    pub key: String,
    pub name: String,
    pub sprite_dir: PathBuf,
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,
    /// Sheet file overrides per animation state
    #[serde(default)]
    pub action_files: Vec<(FighterState, String)>,
    #[serde(default)]
    pub attacks: Vec<(AttackSlot, AttackOverride)>,
    #[serde(default)]
    pub attack_effects: Vec<AttackEffectFile>,
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,
}

fn default_frame_size() -> u32 {
    FRAME_SIZE
}

fn default_min_scale() -> f32 {
    MIN_FIGHTER_SCALE
}

fn default_max_scale() -> f32 {
    MAX_FIGHTER_SCALE
}

impl FighterDefinition {
    pub fn new(key: &str, name: &str, sprite_dir: impl Into<PathBuf>, frame_size: u32) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            sprite_dir: sprite_dir.into(),
            frame_size,
            action_files: Vec::new(),
            attacks: Vec::new(),
            attack_effects: Vec::new(),
            min_scale: MIN_FIGHTER_SCALE,
            max_scale: MAX_FIGHTER_SCALE,
        }
    }

    pub fn with_action_file(mut self, state: FighterState, file: &str) -> Self {
        self.action_files.push((state, file.to_string()));
        self
    }

    pub fn with_attack(mut self, slot: AttackSlot, custom: AttackOverride) -> Self {
        self.attacks.push((slot, custom));
        self
    }

    pub fn with_effect(mut self, slot: AttackSlot, file: &str, anchor: EffectAnchor) -> Self {
        self.attack_effects.push(AttackEffectFile {
            slot,
            file: file.to_string(),
            anchor,
        });
        self
    }

    pub fn with_max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = max_scale;
        self
    }

    /// File name used for `state` (override, otherwise the stock name).
    pub fn sheet_file(&self, state: FighterState) -> &str {
        self.action_files
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == state)
            .map(|(_, file)| file.as_str())
            .unwrap_or_else(|| state.default_sheet())
    }

    pub fn sheet_path(&self, state: FighterState) -> PathBuf {
        self.sprite_dir.join(self.sheet_file(state))
    }

    pub fn effect_for(&self, slot: AttackSlot) -> Option<&AttackEffectFile> {
        self.attack_effects.iter().rev().find(|effect| effect.slot == slot)
    }

    pub fn effect_path(&self, effect: &AttackEffectFile) -> PathBuf {
        self.sprite_dir.join(&effect.file)
    }

    /// Clamps sizes so loading never divides by zero or inverts the scale range.
    pub fn sanitized(mut self) -> Self {
        self.frame_size = self.frame_size.clamp(16, 1024);
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            self.min_scale = MIN_FIGHTER_SCALE;
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            self.max_scale = self.min_scale.max(MAX_FIGHTER_SCALE);
        }
        self
    }
}

/// Stock roster, запасной вариант для `resolve`
static STOCK: Lazy<FighterCatalog> = Lazy::new(FighterCatalog::default);

/// Ordered list of selectable fighters. Never empty.
///
/// Десериализация идёт через `new`: пустой список → stock roster,
/// каждое определение проходит `sanitized`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogFile")]
pub struct FighterCatalog {
    entries: Vec<FighterDefinition>,
}

/// Сырой JSON каталога до валидации
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: Vec<FighterDefinition>,
}

impl From<CatalogFile> for FighterCatalog {
    fn from(file: CatalogFile) -> Self {
        Self::new(file.entries)
    }
}

impl Default for FighterCatalog {
    fn default() -> Self {
        Self::stock(Path::new("assets/Sprites"))
    }
}

impl FighterCatalog {
    /// Builds a catalog; an empty list falls back to the stock roster.
    pub fn new(entries: Vec<FighterDefinition>) -> Self {
        if entries.is_empty() {
            crate::logger::log_warning("📚 Empty fighter catalog, using stock roster");
            return Self::default();
        }
        Self {
            entries: entries.into_iter().map(FighterDefinition::sanitized).collect(),
        }
    }

    /// Stock roster of seven fighters rooted at `sprite_root`.
    pub fn stock(sprite_root: &Path) -> Self {
        use FighterState::*;

        // Раскладка файлов у паков Knight/Samurai одинаковая
        let craftpix = |key: &str, name: &str, dir: &str, attack_files: [&str; 3]| {
            FighterDefinition::new(key, name, sprite_root.join(dir), 128)
                .with_action_file(Idle, "Idle.png")
                .with_action_file(Run, "Run.png")
                .with_action_file(Jump, "Jump.png")
                .with_action_file(Fall, "Jump.png")
                .with_action_file(Attack(AttackSlot::Primary), attack_files[0])
                .with_action_file(Attack(AttackSlot::Secondary), attack_files[1])
                .with_action_file(Attack(AttackSlot::Special), attack_files[2])
                .with_action_file(TakeHit, "Hurt.png")
                .with_action_file(Death, "Dead.png")
        };

        let entries = vec![
            FighterDefinition::new("tutankhamun", "Tutankhamun", sprite_root.join("Fighter1"), FRAME_SIZE)
                .with_max_scale(1.8),
            FighterDefinition::new("charlemagne", "Charlemagne", sprite_root.join("Fighter2"), 200)
                .with_action_file(TakeHit, "Take Hit.png")
                .with_action_file(Attack(AttackSlot::Special), "Attack2.png")
                .with_max_scale(1.8),
            craftpix("knight_2", "Knight II", "Knight_2", ["Attack 1.png", "Attack 2.png", "Attack 3.png"]),
            craftpix("knight_3", "Knight III", "Knight_3", ["Attack 1.png", "Attack 2.png", "Attack 3.png"]),
            craftpix("samurai", "Samurai", "Samurai", ["Attack_1.png", "Attack_2.png", "Attack_3.png"]),
            craftpix(
                "samurai_archer",
                "Samurai Archer",
                "Samurai_Archer",
                ["Attack_1.png", "Attack_2.png", "Shot.png"],
            )
            .with_effect(AttackSlot::Special, "Arrow.png", EffectAnchor::Fixed),
            craftpix(
                "samurai_commander",
                "Samurai Commander",
                "Samurai_Commander",
                ["Attack_1.png", "Attack_2.png", "Attack_3.png"],
            ),
        ];

        Self { entries }
    }

    pub fn entries(&self) -> &[FighterDefinition] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&FighterDefinition> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// First entry; the stock roster covers a catalog that somehow ended up empty.
    pub fn first(&self) -> &FighterDefinition {
        self.entries.first().unwrap_or_else(|| &STOCK.entries[0])
    }

    /// Resolves a selection, falling back to the first entry for unknown keys.
    pub fn resolve(&self, key: Option<&str>) -> &FighterDefinition {
        if let Some(found) = key.and_then(|key| self.get(key)) {
            return found;
        }
        let fallback = self.first();
        if let Some(key) = key {
            crate::logger::log_warning(&format!(
                "📚 Unknown fighter '{}', using '{}'",
                key, fallback.key
            ));
        }
        fallback
    }

    /// Default pick for a slot when settings name none.
    ///
    /// Каталог без стандартного бойца слота молча отдаёт первую запись.
    pub fn default_for(&self, slot: PlayerSlot) -> &FighterDefinition {
        self.get(slot.default_fighter()).unwrap_or_else(|| self.first())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }
}
