use std::{fmt, ops::Range};

use serde::{Serialize, ser::SerializeSeq as _};

use super::piece::Piece;

/// Total grid width, including the left and right border columns.
pub const WIDTH: usize = 12;
/// Total grid height, including the floor row.
pub const HEIGHT: usize = 19;
/// Index of the permanent floor row.
pub const FLOOR_ROW: usize = HEIGHT - 1;
/// Playable columns (everything between the two side borders).
pub const INTERIOR_COLUMNS: Range<usize> = 1..WIDTH - 1;
/// Rows a renderer shows. Row 0 is a hidden spawn row.
pub const VISIBLE_ROWS: Range<usize> = 1..FLOOR_ROW;

/// Bounding-box origin of every newly spawned piece.
pub const SPAWN_COLUMN: i32 = 4;
pub const SPAWN_ROW: i32 = 0;

/// One grid row of occupancy counts.
pub type Row = [u8; WIDTH];

const OPEN_ROW: Row = {
    let mut row = [0; WIDTH];
    row[0] = 1;
    row[WIDTH - 1] = 1;
    row
};
const FLOOR: Row = [1; WIDTH];

/// The settled grid as occupancy counts.
///
/// Every cell holds how many blocks occupy it: `0` is empty, `1` is a block.
/// The left and right columns and the bottom row are permanent border cells
/// with occupancy `1`, so walls and floor collide exactly like settled blocks.
///
/// Collision is tested by overlay: the piece's cells are added onto a copy
/// of the grid and the pose is valid iff no cell exceeds `1`.
///
/// # Layout
///
/// ```text
///  col 0 1 2 3 4 5 6 7 8 9 10 11
/// row 0  # . . . . . . . . . . #   <- hidden spawn row
///   ...
/// row 17 # . . . . . . . . . . #
/// row 18 # # # # # # # # # # # #   <- floor
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    rows: [Row; HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Playfield {
    /// Empty interior enclosed by its border.
    pub const INITIAL: Self = {
        let mut rows = [OPEN_ROW; HEIGHT];
        rows[FLOOR_ROW] = FLOOR;
        Self { rows }
    };

    #[must_use]
    pub fn rows(&self) -> &[Row; HEIGHT] {
        &self.rows
    }

    /// Occupancy of the cell at `(column, row)`, or `None` off the grid.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<u8> {
        self.rows.get(row)?.get(column).copied()
    }

    /// Interior cells of the rows a renderer shows, top to bottom.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.rows[VISIBLE_ROWS]
            .iter()
            .map(|row| &row[INTERIOR_COLUMNS])
    }

    /// Returns a copy of this grid with the piece's cells added on top.
    ///
    /// Returns `None` when any piece cell falls outside the grid.
    #[must_use]
    pub fn overlaid(&self, piece: &Piece) -> Option<Self> {
        let mut board = self.clone();
        for (column, row) in piece.occupied_cells() {
            let (x, y) = grid_index(column, row)?;
            board.rows[y][x] = board.rows[y][x].saturating_add(1);
        }
        Some(board)
    }

    /// `true` when no cell is occupied more than once.
    #[must_use]
    pub fn is_within_capacity(&self) -> bool {
        self.rows.iter().flatten().all(|&count| count <= 1)
    }

    /// The collision test: a pose is valid iff overlaying it keeps every
    /// cell at occupancy `<= 1`.
    #[must_use]
    pub fn is_valid(&self, piece: &Piece) -> bool {
        self.overlaid(piece)
            .is_some_and(|board| board.is_within_capacity())
    }

    /// Merges the piece into the settled grid.
    ///
    /// The pose must have passed [`Self::is_valid`]; an off-grid pose leaves
    /// the grid untouched.
    pub fn lock_piece(&mut self, piece: &Piece) {
        if let Some(board) = self.overlaid(piece) {
            *self = board;
        }
    }

    /// `true` when every interior cell of `row` is occupied.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows[row][INTERIOR_COLUMNS]
            .iter()
            .all(|&count| count != 0)
    }

    /// Removes full rows and returns how many were cleared.
    ///
    /// Rows are scanned top to bottom, excluding the floor. Each full row is
    /// overwritten by the interior of the row above it, cascading up to
    /// row 0, which is left empty. Border cells are never touched.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        for y in 0..FLOOR_ROW {
            if !self.is_row_full(y) {
                continue;
            }
            cleared += 1;
            for above in (0..y).rev() {
                let source = self.rows[above];
                self.rows[above + 1][INTERIOR_COLUMNS]
                    .copy_from_slice(&source[INTERIOR_COLUMNS]);
            }
            self.rows[0][INTERIOR_COLUMNS].fill(0);
        }
        cleared
    }

    /// Creates a `Playfield` from ASCII art for testing.
    ///
    /// `#` is a settled block and `.` an empty cell; each line holds the 10
    /// interior cells of one row. Lines are bottom-aligned: the last line
    /// lands on the row directly above the floor.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::INITIAL;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= FLOOR_ROW,
            "At most {FLOOR_ROW} rows allowed, got {}",
            lines.len()
        );

        let top = FLOOR_ROW - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                INTERIOR_COLUMNS.len(),
                "Each row must have exactly {} cells, got {} at line {}",
                INTERIOR_COLUMNS.len(),
                chars.len(),
                i
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[top + i][INTERIOR_COLUMNS.start + x] = 1;
                }
            }
        }
        board
    }
}

fn grid_index(column: i32, row: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(column).ok().filter(|&x| x < WIDTH)?;
    let y = usize::try_from(row).ok().filter(|&y| y < HEIGHT)?;
    Some((x, y))
}

impl fmt::Display for Playfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &count) in row.iter().enumerate() {
                let ch = match count {
                    0 => '.',
                    1 if y == FLOOR_ROW => '=',
                    1 if !INTERIOR_COLUMNS.contains(&x) => '|',
                    1 => '#',
                    _ => 'X',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Playfield {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["100000000001", ..., "111111111111"] (one digit per cell)
        let mut seq = serializer.serialize_seq(Some(HEIGHT))?;
        for row in &self.rows {
            let digits: String = row
                .iter()
                .map(|&count| char::from_digit(u32::from(count.min(9)), 10).unwrap_or('9'))
                .collect();
            seq.serialize_element(&digits)?;
        }
        seq.end()
    }
}
