//! Hit test geometry

use super::AttackProfile;
use crate::settings::{
    FALLBACK_INVINCIBILITY_TICKS, HIT_HORIZONTAL_BUFFER, HIT_VERTICAL_TOLERANCE, MIN_PLAYER_DISTANCE,
};

/// Max horizontal center distance at which a swing connects.
pub fn hit_reach(attacker_half_width: f32, defender_half_width: f32) -> f32 {
    (attacker_half_width + defender_half_width).max(MIN_PLAYER_DISTANCE) + HIT_HORIZONTAL_BUFFER
}

/// `dx`/`dy` = center distance between attacker and defender.
pub fn in_hit_range(dx: f32, dy: f32, attacker_half_width: f32, defender_half_width: f32) -> bool {
    dx.abs() <= hit_reach(attacker_half_width, defender_half_width)
        && dy.abs() <= HIT_VERTICAL_TOLERANCE
}

/// Invincibility window for a hit; profile-less hits get a flat fallback.
pub fn invincibility_ticks(profile: Option<&AttackProfile>) -> u32 {
    profile
        .map(AttackProfile::invincibility_ticks)
        .unwrap_or(FALLBACK_INVINCIBILITY_TICKS)
}
