//! Diagnostic error types for sweep-reason.
//!
//! Inference itself never fails; these errors cover the fallible edges:
//! building boards and loading configuration. Each type derives miette's
//! `Diagnostic` with an error code and help text.

use miette::Diagnostic;
use thiserror::Error;

use crate::cell::Cell;

/// Top-level error type.
#[derive(Debug, Error, Diagnostic)]
pub enum SweepError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Board errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BoardError {
    #[error("board has no cells ({height} x {width})")]
    #[diagnostic(
        code(sweep::board::empty),
        help("Height and width must both be at least 1.")
    )]
    EmptyGrid { height: usize, width: usize },

    #[error("cannot place {requested} hazards on a board with {capacity} cells")]
    #[diagnostic(
        code(sweep::board::too_many_hazards),
        help("Lower the hazard count or enlarge the board.")
    )]
    TooManyHazards { requested: usize, capacity: usize },

    #[error("cell {cell} is outside the {height} x {width} board")]
    #[diagnostic(
        code(sweep::board::out_of_bounds),
        help("Rows run from 0 to height - 1 and columns from 0 to width - 1.")
    )]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(sweep::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(sweep::config::parse),
        help("Check the TOML syntax. `sweep-reason config init` writes a valid default file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(sweep::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {message}")]
    #[diagnostic(code(sweep::config::invalid))]
    Invalid { message: String },
}

/// Convenience alias.
pub type SweepResult<T> = std::result::Result<T, SweepError>;

/// Result type for board construction.
pub type BoardResult<T> = std::result::Result<T, BoardError>;

/// Result type for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_error_wraps_transparently() {
        let err: SweepError = BoardError::TooManyHazards {
            requested: 10,
            capacity: 9,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "cannot place 10 hazards on a board with 9 cells"
        );
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("sweep::board::too_many_hazards")
        );
    }

    #[test]
    fn out_of_bounds_message_names_cell() {
        let err = BoardError::OutOfBounds {
            cell: Cell::new(4, 1),
            height: 3,
            width: 3,
        };
        assert_eq!(err.to_string(), "cell (4, 1) is outside the 3 x 3 board");
    }
}
