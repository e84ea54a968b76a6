//! A [pentomino](https://en.wikipedia.org/wiki/Pentomino) tiling puzzle is a
//! board with some cells blocked, and a set of pentominoes that must all be
//! placed so that every open cell is covered exactly once.
//!
//! The puzzle is encoded as an exact cover problem with one column per piece
//! (each piece must be used) and one column per open cell (each cell must be
//! covered). Every way of fitting a piece onto the board, in any of its
//! rotations or reflections, becomes a row whose payload is the [`Placement`].

use core::fmt;
use std::collections::{BTreeMap, HashSet};

use crate::{Error, Matrix, Result};

/// The twelve free pentominoes, named by the letters they resemble.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pentomino {
    /// The F pentomino.
    F,
    /// The I pentomino.
    I,
    /// The L pentomino.
    L,
    /// The N pentomino.
    N,
    /// The P pentomino.
    P,
    /// The T pentomino.
    T,
    /// The U pentomino.
    U,
    /// The V pentomino.
    V,
    /// The W pentomino.
    W,
    /// The X pentomino.
    X,
    /// The Y pentomino.
    Y,
    /// The Z pentomino.
    Z,
}

impl Pentomino {
    /// Every pentomino, in alphabetical order.
    pub const ALL: [Pentomino; 12] = [
        Pentomino::F,
        Pentomino::I,
        Pentomino::L,
        Pentomino::N,
        Pentomino::P,
        Pentomino::T,
        Pentomino::U,
        Pentomino::V,
        Pentomino::W,
        Pentomino::X,
        Pentomino::Y,
        Pentomino::Z,
    ];

    /// The untransformed shape of this piece.
    pub fn shape(self) -> Shape {
        use Pentomino::*;

        match self {
            F => Shape::from([[0, 1, 1], [1, 1, 0], [0, 1, 0]]),
            I => Shape::from([[1, 1, 1, 1, 1]]),
            L => Shape::from([[1, 0], [1, 0], [1, 0], [1, 1]]),
            N => Shape::from([[0, 1], [0, 1], [1, 1], [1, 0]]),
            P => Shape::from([[1, 1], [1, 1], [1, 0]]),
            T => Shape::from([[1, 1, 1], [0, 1, 0], [0, 1, 0]]),
            U => Shape::from([[1, 0, 1], [1, 1, 1]]),
            V => Shape::from([[1, 0, 0], [1, 0, 0], [1, 1, 1]]),
            W => Shape::from([[1, 0, 0], [1, 1, 0], [0, 1, 1]]),
            X => Shape::from([[0, 1, 0], [1, 1, 1], [0, 1, 0]]),
            Y => Shape::from([[0, 1], [1, 1], [0, 1], [0, 1]]),
            Z => Shape::from([[1, 1, 0], [0, 1, 0], [0, 1, 1]]),
        }
    }

    /// The distinct shapes this piece can take, each paired with the first
    /// [`Transformation`] (in [`Transformation::ALL`] order) that produces it.
    pub fn orientations(self) -> Vec<(Transformation, Shape)> {
        let base = self.shape();
        let mut seen = HashSet::new();

        Transformation::ALL
            .iter()
            .map(|&transformation| (transformation, base.transformed(transformation)))
            .filter(|(_, shape)| seen.insert(shape.clone()))
            .collect()
    }

    fn letter(self) -> char {
        use Pentomino::*;

        match self {
            F => 'F',
            I => 'I',
            L => 'L',
            N => 'N',
            P => 'P',
            T => 'T',
            U => 'U',
            V => 'V',
            W => 'W',
            X => 'X',
            Y => 'Y',
            Z => 'Z',
        }
    }
}

impl fmt::Display for Pentomino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The symmetries of the square, applied to a shape before it is translated
/// onto the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transformation {
    /// Leave the shape as it is.
    Identity,
    /// Rotate a quarter turn clockwise.
    Rotate90,
    /// Rotate a half turn.
    Rotate180,
    /// Rotate three quarter turns clockwise.
    Rotate270,
    /// Mirror left to right.
    ReflectVertical,
    /// Mirror top to bottom.
    ReflectHorizontal,
    /// Mirror across the line from top left to bottom right.
    ReflectDiagonal,
    /// Mirror across the line from top right to bottom left.
    ReflectAntiDiagonal,
}

impl Transformation {
    /// Every transformation, rotations first.
    pub const ALL: [Transformation; 8] = [
        Transformation::Identity,
        Transformation::Rotate90,
        Transformation::Rotate180,
        Transformation::Rotate270,
        Transformation::ReflectVertical,
        Transformation::ReflectHorizontal,
        Transformation::ReflectDiagonal,
        Transformation::ReflectAntiDiagonal,
    ];

    /// Map a `(row, column)` offset, before normalisation.
    fn apply(self, (row, column): (isize, isize)) -> (isize, isize) {
        use Transformation::*;

        match self {
            Identity => (row, column),
            Rotate90 => (column, -row),
            Rotate180 => (-row, -column),
            Rotate270 => (-column, row),
            ReflectVertical => (row, -column),
            ReflectHorizontal => (-row, column),
            ReflectDiagonal => (column, row),
            ReflectAntiDiagonal => (-column, -row),
        }
    }
}

/// A set of cells, stored as sorted `(row, column)` pairs translated so the
/// bounding box starts at `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Create a shape from arbitrary cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells` is empty.
    pub fn new(cells: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let cells: Vec<_> = cells
            .into_iter()
            .map(|(row, column)| (row as isize, column as isize))
            .collect();

        Self::normalised(cells)
    }

    fn normalised(cells: Vec<(isize, isize)>) -> Self {
        assert!(!cells.is_empty(), "Shape must have at least one cell.");

        let min_row = cells.iter().map(|(row, _)| *row).min().unwrap_or(0);
        let min_column = cells.iter().map(|(_, column)| *column).min().unwrap_or(0);

        let mut cells: Vec<_> = cells
            .into_iter()
            .map(|(row, column)| ((row - min_row) as usize, (column - min_column) as usize))
            .collect();
        cells.sort_unstable();
        cells.dedup();

        Shape { cells }
    }

    /// The occupied cells, sorted in row-major order.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Number of rows spanned by the shape.
    pub fn height(&self) -> usize {
        self.cells.iter().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Number of columns spanned by the shape.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|(_, column)| column + 1).max().unwrap_or(0)
    }

    /// The image of this shape under `transformation`.
    pub fn transformed(&self, transformation: Transformation) -> Shape {
        Self::normalised(
            self.cells
                .iter()
                .map(|&(row, column)| transformation.apply((row as isize, column as isize)))
                .collect(),
        )
    }
}

impl<const W: usize, const H: usize> From<[[u8; W]; H]> for Shape {
    fn from(arr: [[u8; W]; H]) -> Self {
        Shape::new((0..H).flat_map(|row| {
            (0..W)
                .filter(move |&column| arr[row][column] != 0)
                .map(move |column| (row, column))
        }))
    }
}

/// A board position. `x` counts columns from the left, `y` rows from the top.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The surface to tile. Blocked cells must stay uncovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    blocked: Vec<bool>,
}

impl Board {
    /// An open `height` × `width` board.
    pub fn rectangle(height: usize, width: usize) -> Self {
        Board {
            height,
            width,
            blocked: vec![false; height * width],
        }
    }

    /// A board given row by row, where `true` marks a blocked cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowLength`] if the rows differ in length.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[bool]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut blocked = Vec::with_capacity(rows.len() * width);

        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != width {
                return Err(Error::RowLength {
                    row,
                    len: cells.len(),
                    columns: width,
                });
            }
            blocked.extend_from_slice(cells);
        }

        Ok(Board {
            height: rows.len(),
            width,
            blocked,
        })
    }

    /// Mark a cell as blocked.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the board.
    pub fn block(&mut self, cell: Coordinate) -> &mut Self {
        let index = self.index(cell);
        self.blocked[index] = true;
        self
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return true if `cell` is blocked.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is outside the board.
    pub fn is_blocked(&self, cell: Coordinate) -> bool {
        self.blocked[self.index(cell)]
    }

    /// All open cells, in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Coordinate { x, y }))
            .filter(move |cell| !self.is_blocked(*cell))
    }

    fn index(&self, cell: Coordinate) -> usize {
        assert!(
            cell.x < self.width && cell.y < self.height,
            "Cell {} is outside of the {}x{} board.",
            cell,
            self.width,
            self.height
        );

        cell.y * self.width + cell.x
    }

    /// Return true if `shape` placed with its bounding box at `origin` stays
    /// on the board and only covers open cells.
    fn fits(&self, shape: &Shape, origin: Coordinate) -> bool {
        origin.x + shape.width() <= self.width
            && origin.y + shape.height() <= self.height
            && shape.cells().iter().all(|&(row, column)| {
                !self.is_blocked(Coordinate {
                    x: origin.x + column,
                    y: origin.y + row,
                })
            })
    }
}

/// Where and how a piece is put on the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// The piece being placed.
    pub pentomino: Pentomino,
    /// Applied to the piece's base shape first.
    pub transformation: Transformation,
    /// Top left corner of the transformed shape's bounding box.
    pub origin: Coordinate,
}

impl Placement {
    /// The board cells covered by this placement.
    pub fn cells(&self) -> Vec<Coordinate> {
        self.pentomino
            .shape()
            .transformed(self.transformation)
            .cells()
            .iter()
            .map(|&(row, column)| Coordinate {
                x: self.origin.x + column,
                y: self.origin.y + row,
            })
            .collect()
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} at {}",
            self.pentomino, self.transformation, self.origin
        )
    }
}

/// A tiling puzzle expressed as the inputs of a [`Matrix`].
#[derive(Debug, Clone)]
pub struct Encoding {
    /// One row per placement, one column per piece then per open cell.
    pub choices: Vec<Vec<bool>>,
    /// `Piece: <letter>` for each piece, then `Position: (x, y)` for each open
    /// cell.
    pub columns: Vec<String>,
    /// Payload of each row.
    pub placements: Vec<Placement>,
}

/// Instance of a pentomino tiling puzzle.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pieces: Vec<Pentomino>,
    board: Board,
}

impl Puzzle {
    /// Create a puzzle that must place each of `pieces` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePiece`] if a piece is listed twice.
    pub fn new(pieces: impl IntoIterator<Item = Pentomino>, board: Board) -> Result<Self> {
        let mut seen = HashSet::new();
        let pieces: Vec<_> = pieces.into_iter().collect();

        if let Some(duplicate) = pieces.iter().find(|piece| !seen.insert(**piece)) {
            return Err(Error::DuplicatePiece(*duplicate));
        }

        Ok(Puzzle { pieces, board })
    }

    /// The pieces to place, in the order given.
    pub fn pieces(&self) -> &[Pentomino] {
        &self.pieces
    }

    /// The board to tile.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Build the exact cover problem for this puzzle.
    pub fn encode(&self) -> Encoding {
        let empty_cells: Vec<_> = self.board.empty_cells().collect();
        let cell_columns: BTreeMap<Coordinate, usize> = empty_cells
            .iter()
            .enumerate()
            .map(|(offset, cell)| (*cell, self.pieces.len() + offset))
            .collect();
        let width = self.pieces.len() + empty_cells.len();

        let columns = self
            .pieces
            .iter()
            .map(|piece| format!("Piece: {}", piece))
            .chain(empty_cells.iter().map(|cell| format!("Position: {}", cell)))
            .collect();

        let mut choices = Vec::new();
        let mut placements = Vec::new();
        for (piece_column, &pentomino) in self.pieces.iter().enumerate() {
            for (transformation, shape) in pentomino.orientations() {
                if shape.height() > self.board.height || shape.width() > self.board.width {
                    continue;
                }

                for y in 0..=self.board.height - shape.height() {
                    for x in 0..=self.board.width - shape.width() {
                        let origin = Coordinate { x, y };
                        if !self.board.fits(&shape, origin) {
                            continue;
                        }

                        let mut row = vec![false; width];
                        row[piece_column] = true;
                        for &(dy, dx) in shape.cells() {
                            let cell = Coordinate {
                                x: x + dx,
                                y: y + dy,
                            };
                            row[cell_columns[&cell]] = true;
                        }

                        choices.push(row);
                        placements.push(Placement {
                            pentomino,
                            transformation,
                            origin,
                        });
                    }
                }
            }
        }

        log::debug!(
            "Encoded [{}] pieces on a {}x{} board as [{}] placements.",
            self.pieces.len(),
            self.board.width,
            self.board.height,
            placements.len()
        );

        Encoding {
            choices,
            columns,
            placements,
        }
    }

    /// Find up to `limit` tilings, or all of them if `limit` is `None`.
    ///
    /// # Errors
    ///
    /// Only fails if the encoding is inconsistent, which indicates a bug.
    pub fn solve_for_multiple(&self, limit: Option<usize>) -> Result<Vec<Solution>> {
        let encoding = self.encode();
        let mut matrix = Matrix::new(&encoding.choices, &encoding.columns, &encoding.placements)?;

        let found = match limit {
            Some(limit) => matrix.search_limited(limit),
            None => matrix.search(),
        };

        Ok(found
            .into_iter()
            .map(|placements| Solution {
                placements: placements
                    .into_iter()
                    .map(|placement| (placement.pentomino, *placement))
                    .collect(),
                board: self.board.clone(),
            })
            .collect())
    }

    /// Find one tiling, if there is any.
    ///
    /// # Errors
    ///
    /// See [`Puzzle::solve_for_multiple`].
    pub fn solve(&self) -> Result<Option<Solution>> {
        Ok(self.solve_for_multiple(Some(1))?.into_iter().next())
    }

    /// Count every tiling without keeping them.
    ///
    /// # Errors
    ///
    /// See [`Puzzle::solve_for_multiple`].
    pub fn count_solutions(&self) -> Result<usize> {
        let encoding = self.encode();
        let mut matrix = Matrix::new(&encoding.choices, &encoding.columns, &encoding.placements)?;

        Ok(matrix.count_solutions())
    }
}

/// One tiling: where each piece went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    placements: BTreeMap<Pentomino, Placement>,
    board: Board,
}

impl Solution {
    /// The placement of each piece.
    pub fn placements(&self) -> &BTreeMap<Pentomino, Placement> {
        &self.placements
    }

    /// Where `pentomino` was placed, if it is part of the puzzle.
    pub fn placement(&self, pentomino: Pentomino) -> Option<&Placement> {
        self.placements.get(&pentomino)
    }
}

/// Draw the board with one letter per piece, `#` for blocked cells and `.`
/// for anything left uncovered.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut canvas: Vec<char> = self
            .board
            .blocked
            .iter()
            .map(|blocked| if *blocked { '#' } else { '.' })
            .collect();

        for placement in self.placements.values() {
            for cell in placement.cells() {
                canvas[self.board.index(cell)] = placement.pentomino.letter();
            }
        }

        for row in canvas.chunks(self.board.width.max(1)) {
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }

        Ok(())
    }
}
