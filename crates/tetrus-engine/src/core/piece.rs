use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::playfield::{SPAWN_COLUMN, SPAWN_ROW};

/// Cell offsets of one rotation phase inside the 4×4 bounding box.
///
/// Each offset encodes `row * 4 + col`, so values range over `0..16`.
pub type PhaseOffsets = [u8; 4];

/// Offsets for every kind and phase, indexed `[kind][phase]`.
pub type ShapeTable = [[PhaseOffsets; Rotation::COUNT]; PieceKind::LEN];

/// The shape of every piece in every rotation phase.
///
/// Renderers must decode this exactly as the engine does: `col = offset % 4`,
/// `row = offset / 4`.
pub static SHAPE_TABLE: ShapeTable = [
    // I
    [[4, 5, 6, 7], [2, 6, 10, 14], [8, 9, 10, 11], [1, 5, 9, 13]],
    // J
    [[0, 4, 5, 6], [1, 2, 5, 9], [4, 5, 6, 10], [1, 5, 8, 9]],
    // L
    [[2, 4, 5, 6], [1, 5, 9, 10], [4, 5, 6, 8], [0, 1, 5, 9]],
    // O
    [[1, 2, 5, 6], [1, 2, 5, 6], [1, 2, 5, 6], [1, 2, 5, 6]],
    // S
    [[1, 2, 4, 5], [1, 5, 6, 10], [5, 6, 8, 9], [0, 4, 5, 9]],
    // T
    [[1, 4, 5, 6], [1, 5, 6, 9], [4, 5, 6, 9], [1, 4, 5, 9]],
    // Z
    [[0, 1, 5, 6], [2, 5, 6, 9], [4, 5, 9, 10], [1, 4, 5, 8]],
];

/// Enum representing the type of piece.
///
/// The discriminant is the piece's row in [`SHAPE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..PieceKind::LEN) {
            0 => PieceKind::I,
            1 => PieceKind::J,
            2 => PieceKind::L,
            3 => PieceKind::O,
            4 => PieceKind::S,
            5 => PieceKind::T,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in table order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Returns the raw bounding-box offsets of this kind at `rotation`.
    #[must_use]
    pub fn offsets(self, rotation: Rotation) -> &'static PhaseOffsets {
        &SHAPE_TABLE[self.index()][rotation.as_usize()]
    }

    /// Returns the occupied `(col, row)` positions inside the 4×4 bounding box.
    pub fn cells(self, rotation: Rotation) -> impl Iterator<Item = (u8, u8)> {
        self.offsets(rotation)
            .iter()
            .map(|&offset| (offset % 4, offset / 4))
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrus_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::Z.as_char(), 'Z');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// ```
    /// use tetrus_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Rotation phase of a piece.
///
/// One of four phases `0..=3`; phase 0 is the spawn orientation. Rotation
/// only ever advances by one phase and wraps modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const COUNT: usize = 4;
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(phase: u8) -> Option<Self> {
        if (phase as usize) < Self::COUNT {
            Some(Self(phase))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn phase(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Rotation {
    type Error = crate::InvalidRotationError;

    fn try_from(phase: u8) -> Result<Self, Self::Error> {
        Self::new(phase).ok_or(crate::InvalidRotationError(phase))
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// A piece pose: kind, rotation phase and the origin of its bounding box.
///
/// Coordinates are signed playfield coordinates. A pose is only a candidate;
/// whether it fits is decided by
/// [`Playfield::is_valid`](super::playfield::Playfield::is_valid).
/// Movement methods return new poses and never fail.
///
/// ```
/// use tetrus_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.shifted(-1, 0).rotated_right();
/// assert_eq!(moved.column(), piece.column() - 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    column: i32,
    row: i32,
}

impl Piece {
    /// Creates a piece in its spawn pose (phase 0 at the spawn origin).
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, Rotation::SPAWN, SPAWN_COLUMN, SPAWN_ROW)
    }

    #[must_use]
    pub const fn new(kind: PieceKind, rotation: Rotation, column: i32, row: i32) -> Self {
        Self {
            kind,
            rotation,
            column,
            row,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.kind, self.rotation, self.column + dx, self.row + dy)
    }

    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        self.with_rotation(self.rotation.rotated_right())
    }

    #[must_use]
    pub const fn with_rotation(&self, rotation: Rotation) -> Self {
        Self::new(self.kind, rotation, self.column, self.row)
    }

    #[must_use]
    pub const fn at(&self, column: i32, row: i32) -> Self {
        Self::new(self.kind, self.rotation, column, row)
    }

    /// Absolute `(column, row)` of the four occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> ArrayVec<(i32, i32), 4> {
        self.kind
            .cells(self.rotation)
            .map(|(dx, dy)| (self.column + i32::from(dx), self.row + i32::from(dy)))
            .collect()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#rotation@column,row" (e.g., "O#0@4,16")
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.column,
            self.row
        )
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phase_has_four_distinct_offsets_in_box() {
        for kind in PieceKind::ALL {
            for phase in 0..4 {
                let offsets = kind.offsets(Rotation::new(phase).unwrap());
                assert!(offsets.iter().all(|&o| o < 16), "{kind} phase {phase}");
                let mut sorted = *offsets;
                sorted.sort_unstable();
                sorted.windows(2).for_each(|w| assert_ne!(w[0], w[1]));
            }
        }
    }

    #[test]
    fn test_offset_decoding_is_row_major() {
        // I phase 1 is the vertical bar in column 2
        let cells: Vec<_> = PieceKind::I.cells(Rotation::new(1).unwrap()).collect();
        assert_eq!(cells, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);

        // T phase 0: nub on top, bar below
        let cells: Vec<_> = PieceKind::T.cells(Rotation::SPAWN).collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let spawn = PieceKind::O.offsets(Rotation::SPAWN);
        for phase in 1..4 {
            assert_eq!(PieceKind::O.offsets(Rotation::new(phase).unwrap()), spawn);
        }
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = Rotation::SPAWN;
        for expected in [1, 2, 3, 0] {
            rotation = rotation.rotated_right();
            assert_eq!(rotation.phase(), expected);
        }
        assert!(Rotation::new(4).is_none());
    }

    #[test]
    fn test_occupied_cells_translate_by_origin() {
        let piece = Piece::spawn(PieceKind::O).at(-1, 3);
        let cells = piece.occupied_cells();
        assert_eq!(cells.as_slice(), &[(0, 3), (1, 3), (0, 4), (1, 4)]);
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(kind));
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S, Rotation::new(1).unwrap(), -1, 12);
        assert_eq!(serde_json::to_string(&piece).unwrap(), "\"S#1@-1,12\"");
        assert_eq!(piece.to_string(), "S#1@-1,12");
    }

    #[test]
    fn test_rotation_deserialization_rejects_out_of_range() {
        assert_eq!(
            serde_json::from_str::<Rotation>("3").unwrap(),
            Rotation::new(3).unwrap()
        );
        assert!(serde_json::from_str::<Rotation>("4").is_err());
    }
}
