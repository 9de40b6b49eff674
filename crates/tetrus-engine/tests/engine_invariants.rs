//! Invariant tests for the tick/command state machine.
//!
//! Random seeds and random command streams drive the engine through its
//! public API; after every step the bag, grid, progression and game-over
//! invariants are checked.

use proptest::prelude::*;
use tetrus_engine::{
    BAG_LEN, Command, CommandError, FLOOR_ROW, GameEngine, GameSeed, HEIGHT, PieceKind, Playfield,
    TickOutcome, WIDTH, level_for_lines,
};

fn assert_bag_is_permutation(engine: &GameEngine) {
    let drawn = &engine.bag().slots()[..BAG_LEN];
    for kind in PieceKind::ALL {
        assert_eq!(
            drawn.iter().filter(|&&k| k == kind).count(),
            1,
            "{kind} in {drawn:?}"
        );
    }
}

fn assert_border_intact(board: &Playfield) {
    for y in 0..HEIGHT {
        assert_eq!(board.cell(0, y), Some(1));
        assert_eq!(board.cell(WIDTH - 1, y), Some(1));
    }
    for x in 0..WIDTH {
        assert_eq!(board.cell(x, FLOOR_ROW), Some(1));
    }
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        8 => prop::sample::select(Command::ALL[..3].to_vec()),
        1 => Just(Command::SoftDrop),
    ]
}

#[test]
fn random_seed_game_runs_to_top_out_without_input() {
    let mut engine = GameEngine::new();
    let mut locks = 0;
    for _ in 0..1_000_000 {
        match engine.tick() {
            TickOutcome::Locked { .. } => locks += 1,
            TickOutcome::ToppedOut => break,
            _ => {}
        }
    }
    assert!(engine.is_game_over());
    assert!(locks > 0);
    assert_eq!(engine.tick(), TickOutcome::Halted);
}

#[test]
fn snapshot_does_not_mutate() {
    let mut engine = GameEngine::with_seed(GameSeed::from_bytes([3; 16]));
    for _ in 0..250 {
        engine.tick();
    }
    let first = engine.snapshot();
    let second = engine.snapshot();
    assert_eq!(first, second);
    assert_eq!(first.active_piece, engine.active_piece());
    assert_eq!(first.grid, engine.playfield().overlaid(&engine.active_piece()).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_sessions_respect_invariants(
        seed in any::<[u8; 16]>(),
        steps in prop::collection::vec((command_strategy(), 0u32..250), 1..120),
    ) {
        let mut engine = GameEngine::with_seed(GameSeed::from_bytes(seed));
        let mut line_count = engine.line_count();
        let mut was_over = false;

        for (command, wait) in steps {
            let before = engine.snapshot();
            match engine.apply(command) {
                Ok(()) => prop_assert!(!was_over),
                Err(CommandError::PieceCollision) => {
                    prop_assert_eq!(engine.snapshot(), before);
                }
                Err(CommandError::GameOver) => {
                    prop_assert!(was_over);
                    prop_assert_eq!(engine.snapshot(), before);
                }
            }

            for _ in 0..wait {
                let outcome = engine.tick();
                prop_assert!(engine.line_count() >= line_count);
                line_count = engine.line_count();

                match outcome {
                    TickOutcome::Locked { .. } => {
                        prop_assert_eq!(engine.level(), level_for_lines(engine.line_count()));
                        for y in 0..FLOOR_ROW {
                            prop_assert!(!engine.playfield().is_row_full(y), "row {} full", y);
                        }
                    }
                    TickOutcome::ToppedOut => prop_assert!(engine.is_game_over()),
                    TickOutcome::Halted => prop_assert!(was_over),
                    TickOutcome::Waiting | TickOutcome::Descended => {}
                }

                if was_over {
                    prop_assert!(engine.is_game_over());
                }
                was_over = engine.is_game_over();

                prop_assert!(engine.playfield().is_within_capacity());
                let piece = engine.active_piece();
                if !was_over {
                    prop_assert!(engine.is_valid(piece.column(), piece.row(), piece.rotation()));
                }
            }

            assert_bag_is_permutation(&engine);
            assert_border_intact(engine.playfield());
        }
    }

    #[test]
    fn identical_seeds_and_inputs_replay_identically(
        seed in any::<[u8; 16]>(),
        steps in prop::collection::vec((command_strategy(), 0u32..150), 1..60),
    ) {
        let seed = GameSeed::from_bytes(seed);
        let mut engine1 = GameEngine::with_seed(seed);
        let mut engine2 = GameEngine::with_seed(seed);
        for (command, wait) in steps {
            prop_assert_eq!(engine1.apply(command), engine2.apply(command));
            for _ in 0..wait {
                prop_assert_eq!(engine1.tick(), engine2.tick());
            }
        }
        prop_assert_eq!(engine1.snapshot(), engine2.snapshot());
    }
}
