//! Automated play: the solver against an environment.
//!
//! Each step asks the knowledge base for a move (proven-safe first, random
//! otherwise), probes the environment, and feeds the revealed count back in.
//! The game ends when every non-hazard cell has been probed or every hazard
//! has been identified (won), a probe hits a hazard (lost), or no move is
//! left (stalled).

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::board::HazardOracle;
use crate::cell::Cell;
use crate::knowledge::{InferenceConfig, InferenceReport, KnowledgeBase, MoveKind};
use crate::render::render_knowledge;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    Won,
    Lost { cell: Cell },
    Stalled,
}

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Probed {
        cell: Cell,
        count: usize,
        kind: MoveKind,
        report: InferenceReport,
    },
    Exploded {
        cell: Cell,
    },
    NoMovesLeft,
}

/// Summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub moves: usize,
    pub safe_moves: usize,
    pub random_moves: usize,
    pub hazards_found: usize,
    pub safe_found: usize,
    pub probed: usize,
}

/// One game in progress.
pub struct Game<O: HazardOracle> {
    oracle: O,
    kb: KnowledgeBase,
    revealed: HashMap<Cell, usize>,
    safe_moves: usize,
    random_moves: usize,
}

impl<O: HazardOracle> Game<O> {
    pub fn new(oracle: O, config: InferenceConfig) -> Self {
        let kb = KnowledgeBase::with_config(oracle.height(), oracle.width(), config);
        Self {
            oracle,
            kb,
            revealed: HashMap::new(),
            safe_moves: 0,
            random_moves: 0,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Neighbor counts revealed so far.
    pub fn revealed(&self) -> &HashMap<Cell, usize> {
        &self.revealed
    }

    /// Every non-hazard cell probed, or the confirmed hazards are exactly the
    /// real ones.
    pub fn is_won(&self) -> bool {
        let mut all_probed = true;
        let mut hazards_match = true;
        for row in 0..self.oracle.height() {
            for col in 0..self.oracle.width() {
                let cell = Cell::new(row, col);
                let hazard = self.oracle.is_hazard(cell);
                all_probed &= hazard || self.kb.probed().contains(&cell);
                hazards_match &= hazard == self.kb.hazards().contains(&cell);
            }
        }
        all_probed || hazards_match
    }

    /// Choose a move, probe it, and update the knowledge base.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepOutcome {
        let Some(mv) = self.kb.next_move(rng) else {
            return StepOutcome::NoMovesLeft;
        };

        match mv.kind {
            MoveKind::Safe => self.safe_moves += 1,
            MoveKind::Random => self.random_moves += 1,
        }

        if self.oracle.is_hazard(mv.cell) {
            tracing::debug!(cell = %mv.cell, kind = ?mv.kind, "probe hit a hazard");
            return StepOutcome::Exploded { cell: mv.cell };
        }

        let count = self.oracle.neighbor_hazard_count(mv.cell);
        self.revealed.insert(mv.cell, count);
        let report = self.kb.update(mv.cell, count);
        tracing::debug!(
            cell = %mv.cell,
            kind = ?mv.kind,
            count,
            new_hazards = report.new_hazards.len(),
            new_safe = report.new_safe.len(),
            "probed"
        );

        StepOutcome::Probed {
            cell: mv.cell,
            count,
            kind: mv.kind,
            report,
        }
    }

    /// Step until the game is decided.
    pub fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameReport {
        let outcome = loop {
            if self.is_won() {
                break GameOutcome::Won;
            }
            match self.step(rng) {
                StepOutcome::Probed { .. } => {}
                StepOutcome::Exploded { cell } => break GameOutcome::Lost { cell },
                StepOutcome::NoMovesLeft => {
                    break if self.is_won() {
                        GameOutcome::Won
                    } else {
                        GameOutcome::Stalled
                    };
                }
            }
        };

        let report = self.report(outcome);
        tracing::info!(
            outcome = ?report.outcome,
            moves = report.moves,
            random_moves = report.random_moves,
            hazards_found = report.hazards_found,
            "game finished"
        );
        report
    }

    fn report(&self, outcome: GameOutcome) -> GameReport {
        GameReport {
            outcome,
            moves: self.safe_moves + self.random_moves,
            safe_moves: self.safe_moves,
            random_moves: self.random_moves,
            hazards_found: self.kb.hazards().len(),
            safe_found: self.kb.safe().len(),
            probed: self.kb.probed().len(),
        }
    }

    /// The solver's current view as text.
    pub fn render(&self) -> String {
        render_knowledge(&self.kb, &self.revealed)
    }
}
