//! The environment: where the hazards actually are.
//!
//! The solver never inspects a board directly. It only receives neighbor
//! counts through the [`HazardOracle`] seam; [`Board`] is the reference
//! implementation used by the game driver, the CLI, and the tests.

use std::collections::HashSet;

use rand::Rng;

use crate::cell::Cell;
use crate::error::{BoardError, BoardResult};

/// What the solver's environment must answer.
pub trait HazardOracle {
    fn height(&self) -> usize;

    fn width(&self) -> usize;

    /// Ground truth for one cell. Only the game driver asks this, to decide
    /// whether a probe lost the game.
    fn is_hazard(&self, cell: Cell) -> bool;

    /// Hazards among the in-bounds neighbors of `cell`.
    fn neighbor_hazard_count(&self, cell: Cell) -> usize {
        cell.neighbors(self.height(), self.width())
            .filter(|&n| self.is_hazard(n))
            .count()
    }
}

/// A fixed grid with a known set of hazards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    hazards: HashSet<Cell>,
}

impl Board {
    /// Place `count` hazards uniformly at random.
    pub fn random<R>(height: usize, width: usize, count: usize, rng: &mut R) -> BoardResult<Self>
    where
        R: Rng + ?Sized,
    {
        let capacity = check_dimensions(height, width)?;
        if count > capacity {
            return Err(BoardError::TooManyHazards {
                requested: count,
                capacity,
            });
        }

        let hazards = rand::seq::index::sample(rng, capacity, count)
            .into_iter()
            .map(|idx| Cell::new(idx / width, idx % width))
            .collect();

        tracing::debug!(height, width, hazards = count, "board generated");
        Ok(Self {
            height,
            width,
            hazards,
        })
    }

    /// Build a board with hazards at exactly the given cells.
    pub fn with_hazards(
        height: usize,
        width: usize,
        hazards: impl IntoIterator<Item = Cell>,
    ) -> BoardResult<Self> {
        check_dimensions(height, width)?;
        let hazards: HashSet<Cell> = hazards.into_iter().collect();
        if let Some(&cell) = hazards.iter().find(|c| !c.in_bounds(height, width)) {
            return Err(BoardError::OutOfBounds {
                cell,
                height,
                width,
            });
        }
        Ok(Self {
            height,
            width,
            hazards,
        })
    }

    pub fn hazards(&self) -> &HashSet<Cell> {
        &self.hazards
    }

    pub fn hazard_count(&self) -> usize {
        self.hazards.len()
    }

    pub fn cell_count(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width)
    }

    /// Reject cells that fall outside the board.
    pub fn check(&self, cell: Cell) -> BoardResult<Cell> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(BoardError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// Whether `flagged` is exactly the set of hazards.
    pub fn won(&self, flagged: &HashSet<Cell>) -> bool {
        flagged == &self.hazards
    }
}

impl HazardOracle for Board {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn is_hazard(&self, cell: Cell) -> bool {
        self.hazards.contains(&cell)
    }
}

/// Text rendering: `X` marks a hazard.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.width {
                let mark = if self.is_hazard(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

fn check_dimensions(height: usize, width: usize) -> BoardResult<usize> {
    if height == 0 || width == 0 {
        return Err(BoardError::EmptyGrid { height, width });
    }
    Ok(height * width)
}
