//! Inter-fighter separation (push-apart по оси x)

use crate::fighter::Fighter;
use crate::settings::{
    arena_x_range, MIN_PLAYER_DISTANCE, TOUCH_TOLERANCE, VERTICAL_SEPARATION_THRESHOLD,
};

/// Pushes two overlapping fighters apart along x.
///
/// Skipped when either fighter is dead or their vertical gap is large (one is
/// jumping over the other).
pub fn resolve_overlap(first: &mut Fighter, second: &mut Fighter) {
    if first.is_dead || second.is_dead {
        return;
    }
    if (first.y - second.y).abs() > VERTICAL_SEPARATION_THRESHOLD {
        return;
    }

    let (left, right) = if first.x <= second.x {
        (first, second)
    } else {
        (second, first)
    };

    let min_distance =
        (left.collision_half_width() + right.collision_half_width()).max(MIN_PLAYER_DISTANCE);
    let distance = right.x - left.x;
    if distance >= min_distance - TOUCH_TOLERANCE {
        return;
    }

    let overlap = min_distance - distance;
    let left_room = (left.x - arena_x_range(left.width()).0).max(0.0);
    let right_room = (arena_x_range(right.width()).1 - right.x).max(0.0);
    let (left_shift, right_shift) = split_overlap(overlap, left_room, right_room);

    left.x -= left_shift;
    right.x += right_shift;
    left.clamp_to_arena();
    right.clamp_to_arena();
}

/// Splits `overlap` into (left shift, right shift).
///
/// Both sides first take half, limited by their room to the wall. Whatever
/// is left goes to the left fighter's spare room, then the right one's. If
/// neither has room the fighters stay overlapped.
pub fn split_overlap(overlap: f32, left_room: f32, right_room: f32) -> (f32, f32) {
    if overlap <= 0.0 {
        return (0.0, 0.0);
    }

    let half = overlap / 2.0;
    let mut left_shift = half.min(left_room);
    let mut right_shift = half.min(right_room);
    let mut remaining = overlap - (left_shift + right_shift);

    if remaining > 0.0 && left_room > left_shift {
        let extra = remaining.min(left_room - left_shift);
        left_shift += extra;
        remaining -= extra;
    }
    if remaining > 0.0 && right_room > right_shift {
        right_shift += remaining.min(right_room - right_shift);
    }

    (left_shift, right_shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_fighters_split_evenly() {
        assert_eq!(split_overlap(60.0, 500.0, 500.0), (30.0, 30.0));
    }

    #[test]
    fn test_wall_side_yields_less() {
        // Левый прижат к стене: весь overlap уходит вправо
        assert_eq!(split_overlap(60.0, 0.0, 500.0), (0.0, 60.0));
        assert_eq!(split_overlap(60.0, 10.0, 500.0), (10.0, 50.0));
        assert_eq!(split_overlap(60.0, 500.0, 12.0), (48.0, 12.0));
    }

    #[test]
    fn test_both_constrained() {
        assert_eq!(split_overlap(60.0, 5.0, 5.0), (5.0, 5.0));
        assert_eq!(split_overlap(0.0, 5.0, 5.0), (0.0, 0.0));
    }
}
