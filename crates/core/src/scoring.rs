//! Scoring module - points, level progression and fall cadence
//!
//! - Line clears score `lines * 100 * level`, using the level in effect
//!   before the lock.
//! - Hard drops add 2 points per row fallen.
//! - The level is recomputed from the running line total on every lock:
//!   `lines / 10 + 1`.

use crate::types::{
    BASE_FALL_MS, FALL_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, LINE_CLEAR_POINTS,
    MIN_FALL_MS, START_LEVEL,
};

/// Points for clearing `lines` rows at `level`.
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    lines
        .saturating_mul(LINE_CLEAR_POINTS)
        .saturating_mul(level)
}

/// Points for a hard drop of `distance` rows.
pub fn hard_drop_points(distance: u32) -> u32 {
    distance.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

/// Level for a cumulative line total.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + START_LEVEL
}

/// Fall-timer interval for `level`: `max(50, 1000 - (level-1)*100)` ms.
pub fn fall_interval_ms(level: u32) -> u32 {
    let steps = level.saturating_sub(START_LEVEL);
    BASE_FALL_MS
        .saturating_sub(steps.saturating_mul(FALL_STEP_MS))
        .max(MIN_FALL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_points() {
        assert_eq!(line_clear_points(0, 5), 0);
        assert_eq!(line_clear_points(1, 1), 100);
        assert_eq!(line_clear_points(2, 3), 600);
        assert_eq!(line_clear_points(4, 2), 800);
    }

    #[test]
    fn test_hard_drop_points() {
        assert_eq!(hard_drop_points(0), 0);
        assert_eq!(hard_drop_points(17), 34);
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(27), 3);
        assert_eq!(level_for_lines(30), 4);
    }

    #[test]
    fn test_fall_interval_ms() {
        assert_eq!(fall_interval_ms(1), 1000);
        assert_eq!(fall_interval_ms(2), 900);
        assert_eq!(fall_interval_ms(10), 100);
        assert_eq!(fall_interval_ms(11), 50);
        assert_eq!(fall_interval_ms(50), 50);
        // Level 0 never occurs, but must not underflow.
        assert_eq!(fall_interval_ms(0), 1000);
    }
}
