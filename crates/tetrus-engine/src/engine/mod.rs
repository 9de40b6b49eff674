//! Game engine logic and state management.
//!
//! This module builds the rules on top of the core data structures:
//!
//! - [`GameEngine`] - The state machine driven by ticks and input commands
//! - [`PieceBag`] - 7-bag piece sequencing with a lookahead slot
//! - [`GameSeed`] - Seed for deterministic piece generation
//! - [`Progression`] - Level, line count and gravity timing
//! - [`GameStats`] - Session statistics (pieces, clears, score)
//! - [`Snapshot`] - Owned read-only view for rendering
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`], optionally with a [`GameSeed`]
//! 2. Call [`GameEngine::tick`] once per [`TICK_QUANTUM`]
//! 3. Forward input as [`Command`]s through [`GameEngine::apply`]
//! 4. Render from [`GameEngine::snapshot`] after each event
//! 5. Repeat until [`TickOutcome::ToppedOut`], then [`GameEngine::new_game`]
//!
//! # Example
//!
//! ```
//! use tetrus_engine::{Command, Direction, GameEngine, TickOutcome};
//!
//! let mut engine = GameEngine::new();
//!
//! engine.apply(Command::Move(Direction::Right)).ok();
//! engine.apply(Command::Rotate).ok();
//!
//! loop {
//!     match engine.tick() {
//!         TickOutcome::Locked { cleared_lines } => {
//!             println!("locked, {cleared_lines} lines");
//!             break;
//!         }
//!         TickOutcome::ToppedOut => break,
//!         _ => {}
//!     }
//! }
//!
//! let snapshot = engine.snapshot();
//! println!("{snapshot}");
//! ```

pub use self::{bag::*, command::*, game_engine::*, progression::*, snapshot::*, stats::*};

mod bag;
mod command;
mod game_engine;
mod progression;
mod snapshot;
mod stats;
