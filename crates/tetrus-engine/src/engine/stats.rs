use serde::Serialize;

/// Points awarded per lock, indexed by rows cleared (0 to 4).
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Session statistics kept alongside the rules.
///
/// Tracks:
///
/// - **Ticks**: Tick quanta processed while the game was running
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Locks that cleared 0, 1, 2, 3 or 4 rows
/// - **Score**: Points from [`SCORE_TABLE`]
///
/// None of these feed back into gameplay.
///
/// # Example
///
/// ```
/// use tetrus_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.completed_pieces(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    ticks: u64,
    score: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            score: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index 4 also counts any lock clearing more than four rows.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub const fn count_tick(&mut self) {
        self.ticks += 1;
    }

    /// Updates statistics after a piece lock.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.line_cleared_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_drops() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(2);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.score(), 400);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_large_clear_lands_in_last_bucket() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(6);
        assert_eq!(stats.line_cleared_counter()[4], 1);
        assert_eq!(stats.score(), 800);
    }
}
