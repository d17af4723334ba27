// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # sweep-reason
//!
//! A knowledge-based inference engine for hidden-hazard grids (minesweeper).
//!
//! The solver never sees where the hazards are. Each safe probe reveals how
//! many of the probed cell's neighbors are hazards; the [`KnowledgeBase`]
//! records that as a [`Sentence`] and runs rule-based inference to a fixpoint,
//! proving cells safe or hazardous whenever the constraints allow it.
//!
//! ## Architecture
//!
//! - **Cells** (`cell`): grid coordinates and the 8-neighborhood
//! - **Sentences** (`sentence`): "exactly `count` of these cells are hazards"
//! - **Knowledge base** (`knowledge`): fact sets, fixpoint inference, move selection
//! - **Board** (`board`): the reference environment behind the `HazardOracle` seam
//! - **Game** (`game`): automated play of the solver against an environment
//! - **Config** (`config`): TOML-backed board and inference settings
//!
//! ## Library usage
//!
//! ```
//! use sweep_reason::{Cell, KnowledgeBase};
//!
//! let mut kb = KnowledgeBase::new(3, 3);
//! kb.update(Cell::new(0, 0), 0);
//! assert!(kb.safe().contains(&Cell::new(1, 1)));
//! assert_eq!(kb.next_safe_move(), Some(Cell::new(0, 1)));
//! ```

pub mod board;
pub mod cell;
pub mod config;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod render;
pub mod sentence;

pub use board::{Board, HazardOracle};
pub use cell::Cell;
pub use config::SweepConfig;
pub use error::{BoardError, ConfigError, SweepError, SweepResult};
pub use game::{Game, GameOutcome, GameReport, StepOutcome};
pub use knowledge::{InferenceConfig, InferenceReport, KnowledgeBase, Move, MoveKind};
pub use render::render_knowledge;
pub use sentence::Sentence;
