use std::time::Duration;

use serde::Serialize;

/// Tick quanta between forced descents at gravity factor 1.
pub const GRAVITY_TICKS: f64 = 100.0;
/// Each soft drop divides the gravity factor by this.
pub const SOFT_DROP_DIVISOR: f64 = 30.0;
/// Cleared lines per level.
pub const LINES_PER_LEVEL: u32 = 8;
/// Reference wall-clock length of one tick.
pub const TICK_QUANTUM: Duration = Duration::from_millis(10);

/// Level reached after clearing `line_count` lines. Levels start at 1.
#[must_use]
pub const fn level_for_lines(line_count: u32) -> u32 {
    line_count / LINES_PER_LEVEL + 1
}

/// Per-level speed curve: `(0.8 - (level - 1) * 0.007) ^ (level - 1)`.
///
/// Level 1 gives `1.0`; higher levels give smaller factors and therefore
/// shorter descent intervals.
///
/// ```
/// use tetrus_engine::gravity_factor;
///
/// assert_eq!(gravity_factor(1), 1.0);
/// assert!(gravity_factor(2) < gravity_factor(1));
/// ```
#[must_use]
pub fn gravity_factor(level: u32) -> f64 {
    let steps = level.saturating_sub(1);
    let exponent = i32::try_from(steps).unwrap_or(i32::MAX);
    (0.8 - f64::from(steps) * 0.007).powi(exponent)
}

/// Level, line count and gravity timing of one game.
///
/// `level` is always derived from `line_count`; `gravity_factor` is derived
/// from `level` whenever a piece spawns and may then be divided down by soft
/// drops. The accumulator counts ticks since the last forced descent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    level: u32,
    line_count: u32,
    gravity_factor: f64,
    tick_accumulator: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            line_count: 0,
            gravity_factor: gravity_factor(1),
            tick_accumulator: 0,
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn line_count(&self) -> u32 {
        self.line_count
    }

    #[must_use]
    pub const fn gravity_factor(&self) -> f64 {
        self.gravity_factor
    }

    #[must_use]
    pub const fn tick_accumulator(&self) -> u32 {
        self.tick_accumulator
    }

    /// Accumulated ticks needed for a forced descent, from the current factor.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        GRAVITY_TICKS * self.gravity_factor
    }

    /// How many more ticks until the next descent attempt.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn ticks_until_descent(&self) -> u32 {
        let remaining = (self.threshold() - f64::from(self.tick_accumulator)).ceil();
        if remaining <= 1.0 {
            1
        } else {
            remaining.min(f64::from(u32::MAX)) as u32
        }
    }

    /// Counts one tick and reports whether the descent threshold is reached.
    pub(crate) fn advance_tick(&mut self) -> bool {
        self.tick_accumulator = self.tick_accumulator.saturating_add(1);
        f64::from(self.tick_accumulator) >= self.threshold()
    }

    pub(crate) fn reset_accumulator(&mut self) {
        self.tick_accumulator = 0;
    }

    pub(crate) fn add_lines(&mut self, lines: u32) {
        self.line_count = self.line_count.saturating_add(lines);
    }

    pub(crate) fn update_level(&mut self) {
        self.level = level_for_lines(self.line_count);
    }

    /// Resets the gravity factor to the curve value of the current level.
    pub(crate) fn reset_gravity(&mut self) {
        self.gravity_factor = gravity_factor(self.level);
    }

    pub(crate) fn soft_drop(&mut self) {
        self.gravity_factor /= SOFT_DROP_DIVISOR;
    }
}
