pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why an input command was rejected. A rejected command changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("piece colliding at target pose")]
    PieceCollision,
    #[display("game is over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("rotation phase must be 0-3, got {_0}")]
pub struct InvalidRotationError(#[error(not(source))] pub u8);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex in seed")]
    InvalidHex,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command: {_0} (expected left, right, rotate or soft-drop)")]
pub struct ParseCommandError(#[error(not(source))] pub String);
