use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, PieceKind};

/// Number of drawn slots in one bag.
pub const BAG_LEN: usize = PieceKind::LEN;
/// Drawn slots plus the lookahead slot.
pub const BAG_SLOTS: usize = BAG_LEN + 1;

/// Piece sequencer implementing the 7-bag rule with a lookahead slot.
///
/// # Layout
///
/// Slots `0..7` hold one shuffled bag: a permutation of all seven kinds.
/// Slot `7` holds the kind revealed as "next" once the cursor reaches the
/// last drawn slot. When the cursor moves past slot 6 the bag is refilled:
/// the lookahead kind is carried into slot 0, the remaining six slots are
/// filled with the kinds not yet present, and a fresh lookahead is drawn.
///
/// The bag is filled by rejection sampling: a uniform kind is drawn and
/// accepted only if it is not already among the accepted slots. The
/// lookahead is drawn uniformly without any distinctness check.
///
/// # Example
///
/// ```
/// use tetrus_engine::{GameSeed, PieceBag};
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let mut bag = PieceBag::with_seed(seed);
///
/// let first = bag.current();
/// let preview = bag.upcoming();
/// bag.advance();
/// assert_eq!(bag.current(), preview);
/// # let _ = first;
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    slots: [PieceKind; BAG_SLOTS],
    cursor: usize,
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the bag's random number generator. Two engines built
/// from the same seed and fed the same commands play identical games.
///
/// Serialized and parsed as a 32-character hex string.
///
/// ```
/// use tetrus_engine::GameSeed;
///
/// let seed: GameSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidHex);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidHex)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

impl PieceBag {
    /// Creates a bag seeded from the thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic
    /// sequences. The bag is cold-filled and the cursor is at slot 0.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            slots: [PieceKind::I; BAG_SLOTS],
            cursor: 0,
        };
        this.reset();
        this
    }

    /// Cold-fills the bag and rewinds the cursor, continuing the same
    /// random stream.
    pub fn reset(&mut self) {
        self.fill(false);
        self.cursor = 0;
    }

    fn fill(&mut self, carry_lookahead: bool) {
        let mut count = 0;
        if carry_lookahead {
            self.slots[0] = self.slots[BAG_LEN];
            count += 1;
        }

        while count < BAG_LEN {
            let kind: PieceKind = self.rng.random();
            if !self.slots[..count].contains(&kind) {
                self.slots[count] = kind;
                count += 1;
            }
        }
        self.slots[BAG_LEN] = self.rng.random();
    }

    /// The kind of the piece currently in play.
    #[must_use]
    pub fn current(&self) -> PieceKind {
        self.slots[self.cursor]
    }

    /// The kind shown as the upcoming piece.
    #[must_use]
    pub fn upcoming(&self) -> PieceKind {
        self.slots[self.cursor + 1]
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn slots(&self) -> &[PieceKind; BAG_SLOTS] {
        &self.slots
    }

    /// Moves to the next slot, refilling once the last drawn slot is passed.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= BAG_LEN {
            self.fill(true);
            self.cursor = 0;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_slots(&mut self, slots: [PieceKind; BAG_SLOTS], cursor: usize) {
        assert!(cursor < BAG_LEN);
        self.slots = slots;
        self.cursor = cursor;
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}
