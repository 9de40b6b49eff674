use crate::{
    CommandError,
    core::{Piece, PieceKind, Playfield, Rotation},
};

use super::{
    bag::{GameSeed, PieceBag},
    command::{Command, Direction},
    progression::Progression,
    snapshot::Snapshot,
    stats::GameStats,
};

/// What a single [`GameEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The descent threshold has not been reached yet.
    Waiting,
    /// The active piece moved down one row.
    Descended,
    /// The piece landed and locked, a new piece spawned, full rows were cleared.
    Locked { cleared_lines: usize },
    /// The piece locked but the next piece could not spawn. The game is over.
    ToppedOut,
    /// The game was already over; nothing changed.
    Halted,
}

/// The rule engine of one game session.
///
/// Owns the settled grid, the active piece, the bag and the progression
/// state. The host drives it with [`Self::tick`] once per tick quantum and
/// with input commands, and reads an owned [`Snapshot`] to render. All
/// operations are synchronous and bounded.
///
/// Once the game is over every mutating operation is a no-op until
/// [`Self::new_game`] is called.
///
/// # Example
///
/// ```
/// use tetrus_engine::{Direction, GameEngine, GameSeed};
///
/// let mut engine = GameEngine::with_seed(GameSeed::from_bytes([7; 16]));
///
/// engine.try_move(Direction::Left).ok();
/// engine.try_rotate().ok();
/// for _ in 0..100 {
///     engine.tick();
/// }
///
/// let snapshot = engine.snapshot();
/// assert_eq!(snapshot.active_piece.row(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine {
    playfield: Playfield,
    piece: Piece,
    bag: PieceBag,
    progression: Progression,
    stats: GameStats,
    is_game_over: bool,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Starts a game with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_bag(PieceBag::new())
    }

    /// Starts a game whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        Self::from_bag(PieceBag::with_seed(seed))
    }

    fn from_bag(bag: PieceBag) -> Self {
        let mut this = Self {
            playfield: Playfield::INITIAL,
            piece: Piece::spawn(bag.current()),
            bag,
            progression: Progression::new(),
            stats: GameStats::new(),
            is_game_over: false,
        };
        this.is_game_over = !this.spawn();
        this
    }

    /// Restarts the session: empty grid, cold-filled bag, level 1.
    pub fn new_game(&mut self) {
        self.playfield = Playfield::INITIAL;
        self.bag.reset();
        self.progression = Progression::new();
        self.stats = GameStats::new();
        self.is_game_over = !self.spawn();
    }

    /// Puts the bag's current kind at the spawn pose and recomputes gravity
    /// from the level. Returns whether the spawn pose is valid.
    fn spawn(&mut self) -> bool {
        self.piece = Piece::spawn(self.bag.current());
        self.progression.reset_gravity();
        self.playfield.is_valid(&self.piece)
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.bag.upcoming()
    }

    #[must_use]
    pub fn bag(&self) -> &PieceBag {
        &self.bag
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.progression.line_count()
    }

    #[must_use]
    pub fn gravity_factor(&self) -> f64 {
        self.progression.gravity_factor()
    }

    #[must_use]
    pub fn ticks_until_descent(&self) -> u32 {
        self.progression.ticks_until_descent()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Tests the active piece's kind at the given pose against the grid.
    #[must_use]
    pub fn is_valid(&self, column: i32, row: i32, rotation: Rotation) -> bool {
        let piece = Piece::new(self.piece.kind(), rotation, column, row);
        self.playfield.is_valid(&piece)
    }

    /// Advances time by one quantum.
    ///
    /// When the accumulated ticks reach the gravity threshold the piece
    /// descends one row, or locks if it cannot. At most one descent-or-lock
    /// happens per call.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_game_over {
            return TickOutcome::Halted;
        }
        self.stats.count_tick();
        if !self.progression.advance_tick() {
            return TickOutcome::Waiting;
        }

        let below = self.piece.shifted(0, 1);
        if self.playfield.is_valid(&below) {
            self.piece = below;
            self.progression.reset_accumulator();
            return TickOutcome::Descended;
        }
        self.lock_and_respawn()
    }

    fn lock_and_respawn(&mut self) -> TickOutcome {
        self.playfield.lock_piece(&self.piece);
        self.bag.advance();
        self.progression.update_level();
        let spawned = self.spawn();
        self.progression.reset_accumulator();

        // top-out is decided against the grid before any rows are cleared
        if !spawned {
            self.is_game_over = true;
            self.stats.complete_piece_drop(0);
            return TickOutcome::ToppedOut;
        }

        let cleared_lines = self.playfield.clear_lines();
        self.progression
            .add_lines(u32::try_from(cleared_lines).unwrap_or(u32::MAX));
        self.progression.update_level();
        self.stats.complete_piece_drop(cleared_lines);
        TickOutcome::Locked { cleared_lines }
    }

    /// Shifts the active piece one column if the target pose is valid.
    pub fn try_move(&mut self, direction: Direction) -> Result<(), CommandError> {
        self.try_set_piece(self.piece.shifted(direction.dx(), 0))
    }

    /// Advances the rotation phase by one if the target pose is valid.
    /// There is no wall kick.
    pub fn try_rotate(&mut self) -> Result<(), CommandError> {
        self.try_set_piece(self.piece.rotated_right())
    }

    /// Divides the gravity factor by
    /// [`SOFT_DROP_DIVISOR`](super::progression::SOFT_DROP_DIVISOR).
    ///
    /// Repeated calls compound. The factor is recomputed from the level when
    /// the next piece spawns. Position is not changed.
    pub fn soft_drop(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        self.progression.soft_drop();
        Ok(())
    }

    /// Dispatches an input command.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Move(direction) => self.try_move(direction),
            Command::Rotate => self.try_rotate(),
            Command::SoftDrop => self.soft_drop(),
        }
    }

    fn try_set_piece(&mut self, piece: Piece) -> Result<(), CommandError> {
        self.ensure_playing()?;
        if !self.playfield.is_valid(&piece) {
            return Err(CommandError::PieceCollision);
        }
        self.piece = piece;
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), CommandError> {
        if self.is_game_over {
            return Err(CommandError::GameOver);
        }
        Ok(())
    }

    /// Copies out everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let grid = self
            .playfield
            .overlaid(&self.piece)
            .unwrap_or_else(|| self.playfield.clone());
        Snapshot {
            grid,
            active_piece: self.piece,
            next_kind: self.next_kind(),
            level: self.level(),
            line_count: self.line_count(),
            gravity_factor: self.gravity_factor(),
            is_game_over: self.is_game_over,
        }
    }
}
