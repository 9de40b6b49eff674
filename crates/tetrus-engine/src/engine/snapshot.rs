use std::fmt;

use serde::Serialize;

use crate::core::{
    FLOOR_ROW, INTERIOR_COLUMNS, Piece, PieceKind, Playfield, Rotation, VISIBLE_ROWS,
};

/// Owned, read-only view of the engine for rendering.
///
/// `grid` is the settled grid with the active piece overlaid. Occupancy
/// above 1 shows up only on the final frame of a topped-out game, where the
/// unspawnable piece overlaps the stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub grid: Playfield,
    pub active_piece: Piece,
    pub next_kind: PieceKind,
    pub level: u32,
    pub line_count: u32,
    pub gravity_factor: f64,
    pub is_game_over: bool,
}

impl Snapshot {
    /// Interior cells of rows `1..FLOOR_ROW`, the area a renderer paints.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.grid.visible_rows()
    }

    /// `true` if the painted cell at `(column, row)` is filled.
    ///
    /// Coordinates are relative to the painted area: `(0, 0)` is interior
    /// column 1 of grid row 1.
    #[must_use]
    pub fn is_filled(&self, column: usize, row: usize) -> bool {
        let x = column + INTERIOR_COLUMNS.start;
        let y = row + VISIBLE_ROWS.start;
        x < INTERIOR_COLUMNS.end
            && y < FLOOR_ROW
            && self.grid.cell(x, y).is_some_and(|count| count > 0)
    }

    /// Phase-0 cells of the next piece in bounding-box `(col, row)`, for the
    /// preview box.
    pub fn next_piece_cells(&self) -> impl Iterator<Item = (u8, u8)> {
        self.next_kind.cells(Rotation::SPAWN)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut preview = [[false; 4]; 2];
        for (col, row) in self.next_piece_cells() {
            if let Some(cell) = preview
                .get_mut(usize::from(row))
                .and_then(|r| r.get_mut(usize::from(col)))
            {
                *cell = true;
            }
        }

        for (y, row) in self.visible_rows().enumerate() {
            write!(f, "|")?;
            for &count in row {
                write!(f, "{}", if count > 0 { '#' } else { '.' })?;
            }
            write!(f, "|")?;
            match y {
                0 => write!(f, "  Next")?,
                1 | 2 => {
                    write!(f, "  ")?;
                    for &filled in &preview[y - 1] {
                        write!(f, "{}", if filled { '#' } else { ' ' })?;
                    }
                }
                4 => write!(f, "  Level {}", self.level)?,
                6 => write!(f, "  Lines {}", self.line_count)?,
                8 if self.is_game_over => write!(f, "  Game Over!")?,
                _ => {}
            }
            writeln!(f)?;
        }
        writeln!(f, "+{}+", "-".repeat(INTERIOR_COLUMNS.len()))
    }
}
