//! The solver's knowledge base: sentences, derived facts, and fixpoint inference.
//!
//! Each probe result becomes a [`Sentence`] over the probed cell's unresolved
//! neighbors. Inference then runs to a fixpoint:
//!
//! 1. **Subset resolution**: for sentences `A ⊇ B`, the cells of `A − B` hold
//!    exactly `A.count − B.count` hazards. A zero difference makes them all
//!    safe; a difference equal to `|A − B|` makes them all hazards; anything
//!    in between becomes a new sentence.
//! 2. **Self-resolution**: a sentence with `count == 0` or `count == |cells|`
//!    resolves every cell it mentions and is dropped.
//! 3. **Deduplication** of structurally equal sentences.
//!
//! Marking a cell is an explicit fan-out: [`KnowledgeBase::mark_hazard`] and
//! [`KnowledgeBase::mark_safe`] visit every held sentence, so no sentence ever
//! mentions a resolved cell.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::sentence::Sentence;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the inference loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Hard cap on fixpoint passes (default: 10,000).
    pub max_passes: usize,
    /// Whether subset resolution adds `A − B` sentences when it cannot
    /// resolve them outright (default: true).
    pub derive_sentences: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_passes: 10_000,
            derive_sentences: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// What one inference run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    /// Cells newly confirmed as hazards, in discovery order.
    pub new_hazards: Vec<Cell>,
    /// Cells newly confirmed as safe, in discovery order.
    pub new_safe: Vec<Cell>,
    /// Sentences added by subset resolution.
    pub derived_sentences: usize,
    /// Fixpoint passes executed, including the final quiet one.
    pub passes: usize,
    pub reached_fixpoint: bool,
}

impl InferenceReport {
    /// True when no new fact or sentence was produced.
    pub fn is_empty(&self) -> bool {
        self.new_hazards.is_empty() && self.new_safe.is_empty() && self.derived_sentences == 0
    }
}

/// How a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// The cell was proven safe.
    Safe,
    /// Deduction was exhausted; the cell was picked at random.
    Random,
}

/// A suggested probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

enum Resolution {
    Hazards(BTreeSet<Cell>),
    Safe(BTreeSet<Cell>),
}

// ---------------------------------------------------------------------------
// Knowledge base
// ---------------------------------------------------------------------------

/// Accumulated sentences and confirmed facts about one grid.
///
/// `hazards`, `safe`, and `probed` only ever grow. A cell is never in both
/// `hazards` and `safe`, and every probed cell is safe.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    probed: HashSet<Cell>,
    hazards: HashSet<Cell>,
    safe: HashSet<Cell>,
    sentences: Vec<Sentence>,
    config: InferenceConfig,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_config(height, width, InferenceConfig::default())
    }

    pub fn with_config(height: usize, width: usize, config: InferenceConfig) -> Self {
        Self {
            height,
            width,
            probed: HashSet::new(),
            hazards: HashSet::new(),
            safe: HashSet::new(),
            sentences: Vec::new(),
            config,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn probed(&self) -> &HashSet<Cell> {
        &self.probed
    }

    pub fn hazards(&self) -> &HashSet<Cell> {
        &self.hazards
    }

    pub fn safe(&self) -> &HashSet<Cell> {
        &self.safe
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Grid cells that are neither confirmed safe nor confirmed hazards.
    pub fn unknown_cells(&self) -> Vec<Cell> {
        grid(self.height, self.width)
            .filter(|c| !self.safe.contains(c) && !self.hazards.contains(c))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Fact propagation
    // -----------------------------------------------------------------------

    /// Confirm `cell` as a hazard and reduce every held sentence.
    ///
    /// Does not run inference. Returns whether the fact is new. A cell that
    /// is already known safe is left alone.
    pub fn mark_hazard(&mut self, cell: Cell) -> bool {
        if self.safe.contains(&cell) {
            tracing::warn!(cell = %cell, "refusing to mark a known-safe cell as a hazard");
            return false;
        }
        let new = self.hazards.insert(cell);
        for sentence in &mut self.sentences {
            sentence.mark_hazard(cell);
        }
        if new {
            tracing::debug!(cell = %cell, "hazard confirmed");
        }
        new
    }

    /// Confirm `cell` as safe and reduce every held sentence.
    ///
    /// Does not run inference. Returns whether the fact is new. A cell that
    /// is already a known hazard is left alone.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if self.hazards.contains(&cell) {
            tracing::warn!(cell = %cell, "refusing to mark a known hazard as safe");
            return false;
        }
        let new = self.safe.insert(cell);
        for sentence in &mut self.sentences {
            sentence.mark_safe(cell);
        }
        if new {
            tracing::debug!(cell = %cell, "safe cell confirmed");
        }
        new
    }

    // -----------------------------------------------------------------------
    // Knowledge intake
    // -----------------------------------------------------------------------

    /// Record that `cell` was probed and has `count` hazardous neighbors,
    /// then run inference to a fixpoint.
    pub fn update(&mut self, cell: Cell, count: usize) -> InferenceReport {
        if self.hazards.contains(&cell) {
            tracing::warn!(cell = %cell, "probe reported for a known hazard; ignoring");
            return InferenceReport {
                reached_fixpoint: true,
                ..Default::default()
            };
        }

        self.mark_safe(cell);
        self.probed.insert(cell);

        let mut known_hazard_neighbors = 0;
        let mut unresolved = Vec::with_capacity(8);
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.hazards.contains(&neighbor) {
                known_hazard_neighbors += 1;
            } else if !self.safe.contains(&neighbor) {
                unresolved.push(neighbor);
            }
        }

        match count.checked_sub(known_hazard_neighbors) {
            Some(remaining) => {
                let sentence = Sentence::new(unresolved, remaining);
                tracing::debug!(cell = %cell, count, sentence = %sentence, "probe recorded");
                self.push_sentence(sentence);
            }
            None => tracing::warn!(
                cell = %cell,
                count,
                known_hazard_neighbors,
                "reported count is below the known hazard neighbors; sentence dropped"
            ),
        }

        self.infer()
    }

    /// Add an arbitrary constraint, reduced against the facts already known,
    /// then run inference to a fixpoint.
    pub fn assert_sentence(&mut self, sentence: Sentence) -> InferenceReport {
        let mut sentence = sentence;
        let mentioned: Vec<Cell> = sentence.cells().iter().copied().collect();
        for cell in mentioned {
            if self.hazards.contains(&cell) {
                sentence.mark_hazard(cell);
            } else if self.safe.contains(&cell) {
                sentence.mark_safe(cell);
            }
        }
        self.push_sentence(sentence);
        self.infer()
    }

    fn push_sentence(&mut self, sentence: Sentence) {
        if sentence.is_inconsistent() {
            tracing::warn!(sentence = %sentence, "sentence claims more hazards than cells; dropped");
        } else if !sentence.is_vacuous() {
            self.sentences.push(sentence);
        }
    }

    // -----------------------------------------------------------------------
    // Inference
    // -----------------------------------------------------------------------

    /// Run subset resolution, self-resolution, and deduplication until a
    /// full pass changes nothing.
    pub fn infer(&mut self) -> InferenceReport {
        let mut report = InferenceReport::default();

        while report.passes < self.config.max_passes {
            report.passes += 1;
            let mut changed = self.resolve_subsets(&mut report);
            changed |= self.resolve_sentences(&mut report);
            changed |= self.deduplicate();
            if !changed {
                report.reached_fixpoint = true;
                break;
            }
        }

        if !report.reached_fixpoint {
            tracing::warn!(
                max_passes = self.config.max_passes,
                sentences = self.sentences.len(),
                "inference stopped before reaching a fixpoint"
            );
        }
        tracing::debug!(
            passes = report.passes,
            new_hazards = report.new_hazards.len(),
            new_safe = report.new_safe.len(),
            derived = report.derived_sentences,
            sentences = self.sentences.len(),
            "inference complete"
        );
        report
    }

    /// Compare every ordered pair `(superset, subset)` of held sentences.
    fn resolve_subsets(&mut self, report: &mut InferenceReport) -> bool {
        let mut safe = BTreeSet::new();
        let mut hazards = BTreeSet::new();
        let mut derived: Vec<Sentence> = Vec::new();

        for (i, sup) in self.sentences.iter().enumerate() {
            for (j, sub) in self.sentences.iter().enumerate() {
                if i == j || sub.is_empty() || sub.len() >= sup.len() || !sub.is_subset_of(sup) {
                    continue;
                }

                let Some(diff_count) = sup.count().checked_sub(sub.count()) else {
                    tracing::warn!(
                        superset = %sup,
                        subset = %sub,
                        "subset claims more hazards than its superset; pair skipped"
                    );
                    continue;
                };
                let diff: BTreeSet<Cell> = sup.cells().difference(sub.cells()).copied().collect();

                if diff_count == 0 {
                    safe.extend(diff);
                } else if diff_count == diff.len() {
                    hazards.extend(diff);
                } else if diff_count > diff.len() {
                    tracing::warn!(
                        superset = %sup,
                        subset = %sub,
                        "difference claims more hazards than cells; pair skipped"
                    );
                } else if self.config.derive_sentences {
                    let sentence = Sentence::new(diff, diff_count);
                    if !self.sentences.contains(&sentence) && !derived.contains(&sentence) {
                        derived.push(sentence);
                    }
                }
            }
        }

        let mut changed = !derived.is_empty();
        for sentence in derived {
            tracing::trace!(sentence = %sentence, "sentence derived");
            report.derived_sentences += 1;
            self.sentences.push(sentence);
        }
        // Derived sentences are already held, so these marks reduce them too.
        for cell in safe {
            if self.mark_safe(cell) {
                report.new_safe.push(cell);
                changed = true;
            }
        }
        for cell in hazards {
            if self.mark_hazard(cell) {
                report.new_hazards.push(cell);
                changed = true;
            }
        }
        changed
    }

    /// Drop every sentence that fully resolves, marking its cells.
    fn resolve_sentences(&mut self, report: &mut InferenceReport) -> bool {
        let mut changed = false;
        let mut i = 0;

        while i < self.sentences.len() {
            let sentence = &self.sentences[i];

            if sentence.is_empty() || sentence.is_inconsistent() {
                if !sentence.is_vacuous() {
                    tracing::warn!(sentence = %sentence, "inconsistent sentence dropped");
                }
                self.sentences.remove(i);
                changed = true;
                continue;
            }

            let resolution = if let Some(cells) = sentence.known_hazards() {
                Resolution::Hazards(cells.clone())
            } else if let Some(cells) = sentence.known_safe() {
                Resolution::Safe(cells.clone())
            } else {
                i += 1;
                continue;
            };

            self.sentences.remove(i);
            changed = true;
            match resolution {
                Resolution::Hazards(cells) => {
                    for cell in cells {
                        if self.mark_hazard(cell) {
                            report.new_hazards.push(cell);
                        }
                    }
                }
                Resolution::Safe(cells) => {
                    for cell in cells {
                        if self.mark_safe(cell) {
                            report.new_safe.push(cell);
                        }
                    }
                }
            }
        }

        changed
    }

    /// Keep the first of each group of equal sentences.
    fn deduplicate(&mut self) -> bool {
        let before = self.sentences.len();
        let mut seen: HashSet<Sentence> = HashSet::with_capacity(before);
        self.sentences.retain(|s| seen.insert(s.clone()));
        before != self.sentences.len()
    }

    // -----------------------------------------------------------------------
    // Move selection
    // -----------------------------------------------------------------------

    /// A cell proven safe but not yet probed, lowest in row-major order.
    pub fn next_safe_move(&self) -> Option<Cell> {
        self.safe.difference(&self.probed).min().copied()
    }

    /// A uniformly random cell of a `height` x `width` grid that is neither a
    /// known hazard nor already probed.
    pub fn next_random_move<R>(&self, height: usize, width: usize, rng: &mut R) -> Option<Cell>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<Cell> = grid(height, width)
            .filter(|c| !self.hazards.contains(c) && !self.probed.contains(c))
            .collect();
        candidates.choose(rng).copied()
    }

    /// [`next_random_move`](Self::next_random_move) over this knowledge base's own grid.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        self.next_random_move(self.height, self.width, rng)
    }

    /// Prefer a proven-safe cell; fall back to a random one.
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        if let Some(cell) = self.next_safe_move() {
            return Some(Move {
                cell,
                kind: MoveKind::Safe,
            });
        }
        self.random_move(rng).map(|cell| Move {
            cell,
            kind: MoveKind::Random,
        })
    }
}

fn grid(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
}
