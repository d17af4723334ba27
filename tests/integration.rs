//! End-to-end tests for the sweep-reason solver.
//!
//! These drive the knowledge base only through its public API, the way an
//! agent would: probe, read back facts, pick the next move.

use std::collections::HashSet;

use rand::SeedableRng;
use sweep_reason::{
    Board, Cell, Game, GameOutcome, HazardOracle, InferenceConfig, KnowledgeBase, MoveKind,
    Sentence, StepOutcome,
};

fn c(row: usize, col: usize) -> Cell {
    Cell::new(row, col)
}

fn cells(list: &[(usize, usize)]) -> HashSet<Cell> {
    list.iter().map(|&(r, col)| c(r, col)).collect()
}

#[test]
fn probe_next_to_hazard_row() {
    // 1x3, hazard at (0,2): a zero at (0,0) clears (0,1).
    let mut kb = KnowledgeBase::new(1, 3);
    let report = kb.update(c(0, 0), 0);

    assert_eq!(report.new_safe, vec![c(0, 1)]);
    assert_eq!(kb.next_safe_move(), Some(c(0, 1)));

    kb.update(c(0, 1), 1);
    assert_eq!(kb.hazards(), &cells(&[(0, 2)]));
    assert!(kb.sentences().is_empty());
    assert_eq!(kb.next_safe_move(), None);
}

#[test]
fn three_probes_isolate_corner_hazard() {
    // 3x3 with a single hazard at (0,0).
    let mut kb = KnowledgeBase::new(3, 3);
    kb.update(c(1, 1), 1);
    kb.update(c(0, 1), 1);

    // {(0,0),(0,2),(1,0),(1,2)} = 1 sits inside the (1,1) sentence with the
    // same count, so the bottom row is safe.
    assert!(kb.safe().is_superset(&cells(&[(2, 0), (2, 1), (2, 2)])));
    assert!(kb.hazards().is_empty());

    kb.update(c(1, 0), 1);
    assert_eq!(kb.hazards(), &cells(&[(0, 0)]));
    let everything_else: HashSet<Cell> = (0..3)
        .flat_map(|r| (0..3).map(move |col| c(r, col)))
        .filter(|&cell| cell != c(0, 0))
        .collect();
    assert_eq!(kb.safe(), &everything_else);
    assert!(kb.unknown_cells().is_empty());
}

#[test]
fn empty_sentence_adds_nothing() {
    let mut kb = KnowledgeBase::new(2, 2);
    let report = kb.assert_sentence(Sentence::new([], 0));
    assert!(report.is_empty());
    assert!(kb.sentences().is_empty());
    assert!(kb.hazards().is_empty() && kb.safe().is_empty());
}

#[test]
fn next_safe_move_tracks_unprobed_safe_cells() {
    let mut kb = KnowledgeBase::new(2, 2);
    assert_eq!(kb.next_safe_move(), None);
    kb.mark_safe(c(1, 0));
    assert_eq!(kb.next_safe_move(), Some(c(1, 0)));
    kb.update(c(1, 0), 2);
    assert_eq!(kb.next_safe_move(), None);
}

#[test]
fn second_inference_run_is_quiet() {
    let mut kb = KnowledgeBase::new(4, 4);
    kb.update(c(1, 1), 1);
    kb.update(c(2, 2), 2);
    let sentences = kb.sentences().to_vec();
    let hazards = kb.hazards().clone();
    let safe = kb.safe().clone();

    let report = kb.infer();
    assert!(report.is_empty());
    assert!(report.reached_fixpoint);
    assert_eq!(kb.sentences(), sentences.as_slice());
    assert_eq!(kb.hazards(), &hazards);
    assert_eq!(kb.safe(), &safe);
}

#[test]
fn random_moves_avoid_hazards_and_probed_cells() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut kb = KnowledgeBase::new(2, 2);
    kb.mark_hazard(c(0, 0));
    kb.update(c(1, 1), 1);

    for _ in 0..50 {
        let cell = kb.next_random_move(2, 2, &mut rng).unwrap();
        assert!(cell == c(0, 1) || cell == c(1, 0));
    }
}

#[test]
fn seeded_games_never_contradict_the_board() {
    for seed in 0..40 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let board = Board::random(6, 6, 6, &mut rng).unwrap();
        let truth = board.hazards().clone();
        let mut game = Game::new(board, InferenceConfig::default());

        while !game.is_won() {
            if let Some(cell) = game.knowledge().next_safe_move() {
                assert!(!truth.contains(&cell), "seed {seed}: safe move {cell} is a hazard");
            }
            match game.step(&mut rng) {
                StepOutcome::Probed { cell, count, .. } => {
                    assert_eq!(count, game.oracle().neighbor_hazard_count(cell));
                }
                StepOutcome::Exploded { .. } | StepOutcome::NoMovesLeft => break,
            }
        }

        let kb = game.knowledge();
        assert!(kb.hazards().is_subset(&truth), "seed {seed}: false hazard");
        assert!(kb.safe().is_disjoint(&truth), "seed {seed}: hazard marked safe");
        assert!(kb.probed().is_subset(kb.safe()));
    }
}

#[test]
fn lost_games_end_on_a_random_guess() {
    for seed in 0..40 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let board = Board::random(5, 5, 5, &mut rng).unwrap();
        let mut game = Game::new(board, InferenceConfig::default());

        loop {
            if game.is_won() {
                break;
            }
            let next = game.knowledge().next_move(&mut rng.clone());
            match game.step(&mut rng) {
                StepOutcome::Probed { .. } => {}
                StepOutcome::Exploded { cell } => {
                    let next = next.unwrap();
                    assert_eq!(next.cell, cell);
                    assert_eq!(next.kind, MoveKind::Random, "seed {seed}");
                    break;
                }
                StepOutcome::NoMovesLeft => break,
            }
        }
    }
}

#[test]
fn game_report_serializes_to_json() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let board = Board::with_hazards(3, 3, []).unwrap();
    let mut game = Game::new(board, InferenceConfig::default());
    let report = game.play(&mut rng);
    assert_eq!(report.outcome, GameOutcome::Won);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"]["result"], "won");
    assert_eq!(json["moves"], 0);

    let lost = serde_json::to_value(GameOutcome::Lost { cell: c(1, 2) }).unwrap();
    assert_eq!(lost["result"], "lost");
    assert_eq!(lost["cell"]["row"], 1);
    assert_eq!(lost["cell"]["col"], 2);
}

#[test]
fn disabling_derivation_never_adds_sentences() {
    let config = InferenceConfig {
        derive_sentences: false,
        ..Default::default()
    };
    for seed in 0..10 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let board = Board::random(6, 6, 8, &mut rng).unwrap();
        let truth = board.hazards().clone();
        let mut game = Game::new(board, config.clone());
        while !game.is_won() {
            match game.step(&mut rng) {
                StepOutcome::Probed { report, .. } => assert_eq!(report.derived_sentences, 0),
                StepOutcome::Exploded { .. } | StepOutcome::NoMovesLeft => break,
            }
        }
        assert!(game.knowledge().hazards().is_subset(&truth));
    }
}
