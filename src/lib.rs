#![deny(missing_docs)]

//! Implementation of [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links)
//! and [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) for solving
//!  [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problems given as
//! a boolean choice matrix.
//!
//! Every row of the matrix carries a caller supplied payload, and solutions
//! are reported as the payloads of the selected rows:
//!
//! ```
//! use dancing_matrix::Matrix;
//! use std::collections::HashSet;
//!
//! // Knuth's example: seven constraints, six candidate rows.
//! let choices = [
//!     [false, false, true, false, true, false, false],
//!     [true, false, false, true, false, false, true],
//!     [false, true, true, false, false, true, false],
//!     [true, false, false, true, false, true, false],
//!     [false, true, false, false, false, false, true],
//!     [false, false, false, true, true, false, true],
//! ];
//! let columns = ["A", "B", "C", "D", "E", "F", "G"];
//! let payloads = ["CE", "ADG", "BCF", "ADF", "BG", "DEG"];
//!
//! let mut matrix = Matrix::new(&choices, &columns, &payloads)?;
//! let solutions = matrix.search();
//!
//! assert_eq!(solutions, vec![HashSet::from([&"ADF", &"BG", &"CE"])]);
//! # Ok::<(), dancing_matrix::Error>(())
//! ```
//!
//! The [`pentomino`] module shows how a tiling puzzle is encoded on top of
//! the solver.

pub(crate) mod column;
pub(crate) mod error;
pub(crate) mod matrix;
pub(crate) mod node;
pub mod pentomino;
pub(crate) mod search;

pub use column::{ColumnId, ColumnRef};
pub use error::{Error, Result};
pub use matrix::{ColumnChoice, Matrix};
pub use node::{NodeId, NodeRef};
pub use search::{Selection, StepLimit, Visitor};
