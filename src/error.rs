use thiserror::Error;

use crate::pentomino::Pentomino;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Reasons a problem instance could not be turned into a [`Matrix`](crate::Matrix).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// There must be exactly one payload per row of the choice matrix.
    #[error("expected one payload per row: {rows} rows but {payloads} payloads")]
    PayloadCount {
        /// Number of rows in the choice matrix.
        rows: usize,
        /// Number of payloads supplied.
        payloads: usize,
    },

    /// Every row must have one cell per column label.
    #[error("row {row} has {len} cells but there are {columns} columns")]
    RowLength {
        /// Index of the offending row.
        row: usize,
        /// Number of cells in that row.
        len: usize,
        /// Number of column labels.
        columns: usize,
    },

    /// A piece was listed more than once for a tiling puzzle.
    #[error("pentomino {0} appears more than once in the piece list")]
    DuplicatePiece(Pentomino),
}
