use std::str::FromStr;

use serde::Serialize;

use crate::ParseCommandError;

/// Horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Direction {
    /// Column delta of one step in this direction.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// A discrete input event delivered by the host.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    #[display("{_0}")]
    Move(Direction),
    #[display("rotate")]
    Rotate,
    #[display("soft-drop")]
    SoftDrop,
}

impl Command {
    pub const ALL: [Self; 4] = [
        Command::Move(Direction::Left),
        Command::Move(Direction::Right),
        Command::Rotate,
        Command::SoftDrop,
    ];
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.to_string() == s)
            .ok_or_else(|| ParseCommandError(s.to_owned()))
    }
}
