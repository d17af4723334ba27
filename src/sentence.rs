//! Logical sentences about the board.
//!
//! A [`Sentence`] states that exactly `count` of its `cells` are hazards.
//! Sentences shrink in place as cells become known: a resolved cell is
//! removed, and `count` drops by one when that cell was a hazard.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// "Exactly `count` of `cells` are hazards."
///
/// Equality is structural over `(cells, count)`, which is what the knowledge
/// base relies on for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Create a sentence. The pair is not validated; callers supply a
    /// consistent `count <= cells.len()`.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// An empty sentence carries no information.
    pub fn is_vacuous(&self) -> bool {
        self.cells.is_empty() && self.count == 0
    }

    /// Whether the sentence claims more hazards than it has cells.
    pub fn is_inconsistent(&self) -> bool {
        self.count > self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn is_subset_of(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Every remaining cell is a hazard when there are exactly `count` of them.
    ///
    /// A vacuous sentence returns `Some` of an empty set; treat that as
    /// nothing new.
    pub fn known_hazards(&self) -> Option<&BTreeSet<Cell>> {
        (self.cells.len() == self.count).then_some(&self.cells)
    }

    /// Every remaining cell is safe when `count` is zero.
    pub fn known_safe(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == 0).then_some(&self.cells)
    }

    /// Record that `cell` is a hazard. Returns whether the sentence changed.
    pub fn mark_hazard(&mut self, cell: Cell) -> bool {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
            true
        } else {
            false
        }
    }

    /// Record that `cell` is safe. Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}} = {}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn set(cells: &[Cell]) -> BTreeSet<Cell> {
        cells.iter().copied().collect()
    }

    #[test]
    fn mark_hazard_removes_member_and_decrements() {
        let mut s = Sentence::new([c(0, 0), c(0, 1), c(1, 0)], 2);
        assert!(s.mark_hazard(c(0, 1)));
        assert!(!s.contains(c(0, 1)));
        assert_eq!(s.count(), 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn mark_hazard_on_non_member_is_noop() {
        let mut s = Sentence::new([c(0, 0), c(0, 1)], 1);
        let before = s.clone();
        assert!(!s.mark_hazard(c(5, 5)));
        assert_eq!(s, before);
    }

    #[test]
    fn mark_safe_keeps_count() {
        let mut s = Sentence::new([c(0, 0), c(0, 1), c(1, 0)], 1);
        assert!(s.mark_safe(c(1, 0)));
        assert!(!s.contains(c(1, 0)));
        assert_eq!(s.count(), 1);

        let before = s.clone();
        assert!(!s.mark_safe(c(9, 9)));
        assert_eq!(s, before);
    }

    #[test]
    fn known_hazards_when_count_equals_len() {
        let s = Sentence::new([c(0, 0), c(0, 1)], 2);
        assert_eq!(s.known_hazards(), Some(&set(&[c(0, 0), c(0, 1)])));
        assert_eq!(s.known_safe(), None);
    }

    #[test]
    fn known_safe_when_count_zero() {
        let s = Sentence::new([c(0, 0), c(0, 1)], 0);
        assert_eq!(s.known_safe(), Some(&set(&[c(0, 0), c(0, 1)])));
        assert_eq!(s.known_hazards(), None);
    }

    #[test]
    fn no_conclusion_otherwise() {
        let s = Sentence::new([c(0, 0), c(0, 1), c(0, 2)], 1);
        assert!(s.known_hazards().is_none());
        assert!(s.known_safe().is_none());
    }

    #[test]
    fn vacuous_sentence_yields_empty_sets() {
        let s = Sentence::new(Vec::<Cell>::new(), 0);
        assert!(s.is_vacuous());
        assert_eq!(s.known_hazards().map(|h| h.len()), Some(0));
        assert_eq!(s.known_safe().map(|h| h.len()), Some(0));
    }

    #[test]
    fn equality_is_structural() {
        let a = Sentence::new([c(1, 1), c(0, 0)], 1);
        let b = Sentence::new([c(0, 0), c(1, 1)], 1);
        let d = Sentence::new([c(0, 0), c(1, 1)], 2);
        assert_eq!(a, b);
        assert_ne!(a, d);
    }

    #[test]
    fn duplicate_cells_collapse() {
        let s = Sentence::new([c(0, 0), c(0, 0), c(0, 1)], 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn subset_check() {
        let big = Sentence::new([c(0, 0), c(0, 1), c(0, 2)], 2);
        let small = Sentence::new([c(0, 1), c(0, 2)], 1);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
    }

    #[test]
    fn inconsistent_sentence_detected() {
        assert!(Sentence::new([c(0, 0)], 2).is_inconsistent());
        assert!(!Sentence::new([c(0, 0)], 1).is_inconsistent());
    }

    #[test]
    fn display_format() {
        let s = Sentence::new([c(0, 1), c(0, 0)], 1);
        assert_eq!(s.to_string(), "{(0, 0), (0, 1)} = 1");
    }
}
