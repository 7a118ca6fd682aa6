//! FighterLoadout: всё, что грузится один раз на выбор персонажа
//!
//! Clips + attack table + body + effect templates. Fighter строится из
//! loadout и дальше только сбрасывается между раундами.

use crate::animation::{AnimationClip, ClipTable, FighterState};
use crate::assets::{load_sheet_or_placeholder, AssetProvider, FighterDefinition};
use crate::combat::{AttackSlot, AttackTable};
use crate::settings::{DEFAULT_FRAME_INTERVAL, GROUND_Y};

use super::{BodyDimensions, EffectTemplate, MetricsAccumulator};

#[derive(Debug, Clone)]
pub struct FighterLoadout {
    pub name: String,
    pub clips: ClipTable,
    pub attacks: AttackTable,
    pub body: BodyDimensions,
    pub effects: [Option<EffectTemplate>; 3],
}

impl FighterLoadout {
    pub fn load(definition: &FighterDefinition, assets: &dyn AssetProvider) -> Self {
        let definition = definition.clone().sanitized();
        let attacks = AttackTable::new(&definition.attacks);
        let mut metrics = MetricsAccumulator::new(definition.frame_size);

        let clips = FighterState::ALL.map(|state| {
            let sheet = load_sheet_or_placeholder(assets, &definition.sheet_path(state), definition.frame_size);
            metrics.add(&sheet.metrics);
            let frame_count = sheet.frames.frame_count();

            match state.attack_slot() {
                Some(slot) => {
                    let profile = attacks.get(slot);
                    AnimationClip::new(
                        sheet.frames,
                        profile.frame_interval(frame_count),
                        Some(profile.hit_frame(frame_count)),
                    )
                }
                None => AnimationClip::new(sheet.frames, DEFAULT_FRAME_INTERVAL, None),
            }
        });

        let body = BodyDimensions::from_metrics(
            &metrics.finish(),
            definition.min_scale,
            definition.max_scale,
            GROUND_Y,
        );

        let effects = AttackSlot::ALL.map(|slot| {
            let effect = definition.effect_for(slot)?;
            EffectTemplate::load(
                assets,
                &definition.effect_path(effect),
                slot,
                effect.anchor,
                attacks.get(slot),
                &body,
            )
        });

        crate::logger::log_info(&format!(
            "📦 Loadout '{}': box {:.0}x{:.0}, collision ±{:.0}, effects {}",
            definition.name,
            body.width,
            body.height,
            body.collision_half_width,
            effects.iter().filter(|effect| effect.is_some()).count()
        ));

        Self {
            name: definition.name,
            clips: ClipTable::new(clips),
            attacks,
            body,
            effects,
        }
    }
}
