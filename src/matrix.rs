//! Construction of the toroidal structure from a boolean choice matrix.

use core::fmt;

use crate::{
    column::{ColumnHeader, ColumnId, ColumnRef, Links},
    node::{Index, Node, NodeId, NodeRef, ROOT},
    Error, Result,
};

/// Policy used to pick the next column to branch on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnChoice {
    /// Pick the live column with the fewest rows. When several share the
    /// minimum, the one furthest along the header ring wins.
    #[default]
    MinimumSize,
    /// Always pick the first live column to the right of the root.
    FirstLive,
}

/// An exact cover problem laid out as dancing links.
///
/// Each row of the input matrix is tagged with a payload borrowed from the
/// caller; solutions are reported in terms of these payloads.
pub struct Matrix<'p, T> {
    pub(crate) links: Links,
    pub(crate) payloads: &'p [T],
    /// First node of each input row, `None` for rows without any cell.
    pub(crate) row_heads: Vec<Option<Index>>,
    pub(crate) column_choice: ColumnChoice,
    /// Columns covered through [`Matrix::cover`], most recent last.
    covered: Vec<Index>,
}

impl<'p, T> Matrix<'p, T> {
    /// Build the structure for `choices`, where `choices[r][c]` is true if
    /// row `r` satisfies column `c`.
    ///
    /// `column_names` gives the number of columns and is only used for
    /// diagnostics. `payloads[r]` is attached to row `r`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadCount`] if there is not exactly one payload
    /// per row, and [`Error::RowLength`] if a row does not have exactly one
    /// cell per column name.
    pub fn new<R, S>(choices: &[R], column_names: &[S], payloads: &'p [T]) -> Result<Self>
    where
        R: AsRef<[bool]>,
        S: AsRef<str>,
    {
        if choices.len() != payloads.len() {
            return Err(Error::PayloadCount {
                rows: choices.len(),
                payloads: payloads.len(),
            });
        }

        let num_columns = column_names.len();
        if let Some((row, cells)) = choices
            .iter()
            .map(|cells| cells.as_ref())
            .enumerate()
            .find(|(_, cells)| cells.len() != num_columns)
        {
            return Err(Error::RowLength {
                row,
                len: cells.len(),
                columns: num_columns,
            });
        }

        let num_cells = choices
            .iter()
            .map(|cells| cells.as_ref().iter().filter(|cell| **cell).count())
            .sum::<usize>();

        // Root followed by the column headers, linked into the header ring.
        let mut nodes = Vec::with_capacity(1 + num_columns + num_cells);
        let mut headers = Vec::with_capacity(1 + num_columns);
        nodes.push(Node::new_self_ref(ROOT, ROOT, None));
        headers.push(ColumnHeader {
            name: String::from("root"),
            size: 0,
        });
        for name in column_names {
            let index = nodes.len();
            nodes.push(Node::new_self_ref(index, index, None));
            headers.push(ColumnHeader {
                name: name.as_ref().to_owned(),
                size: 0,
            });
            Node::add_right(&mut nodes, index - 1, index);
        }
        let last_header = nodes.len() - 1;
        Node::add_right(&mut nodes, last_header, ROOT);

        // Bottom-most node of each column so far, starting at the header.
        let mut column_tails: Vec<Index> = (1..=num_columns).collect();
        let mut row_heads = Vec::with_capacity(choices.len());

        for (row, cells) in choices.iter().enumerate() {
            let mut first_in_row: Option<Index> = None;
            let mut previous_in_row: Option<Index> = None;

            for (column, _) in cells.as_ref().iter().enumerate().filter(|(_, cell)| **cell) {
                let index = nodes.len();
                let header = ColumnId(column).index();
                nodes.push(Node::new_self_ref(index, header, Some(row)));

                if let Some(previous) = previous_in_row {
                    Node::add_right(&mut nodes, previous, index);
                }
                Node::add_below(&mut nodes, column_tails[column], index);

                column_tails[column] = index;
                previous_in_row = Some(index);
                first_in_row.get_or_insert(index);
            }

            // Wrap around so the row forms a ring.
            if let (Some(first), Some(last)) = (first_in_row, previous_in_row) {
                Node::add_right(&mut nodes, last, first);
            }

            row_heads.push(first_in_row);
        }

        // Close every vertical ring and count what ended up in it.
        for (column, tail) in column_tails.into_iter().enumerate() {
            let header = ColumnId(column).index();
            Node::add_below(&mut nodes, tail, header);
        }
        let mut links = Links { nodes, headers };
        for header in 1..=num_columns {
            links.headers[header].size = links.column_nodes(header).count();
        }

        log::debug!(
            "Built matrix with [{}] rows, [{}] columns and [{}] nodes.",
            choices.len(),
            num_columns,
            num_cells
        );

        Ok(Matrix {
            links,
            payloads,
            row_heads,
            column_choice: ColumnChoice::default(),
            covered: Vec::new(),
        })
    }

    /// Use the given column choice policy for subsequent searches.
    pub fn with_column_choice(mut self, column_choice: ColumnChoice) -> Self {
        self.column_choice = column_choice;
        self
    }

    /// Change the column choice policy for subsequent searches.
    pub fn set_column_choice(&mut self, column_choice: ColumnChoice) {
        self.column_choice = column_choice;
    }

    /// Toggle the shortest-column heuristic.
    ///
    /// `true` selects [`ColumnChoice::MinimumSize`], `false` selects
    /// [`ColumnChoice::FirstLive`].
    pub fn use_shortest_column(&mut self, enabled: bool) {
        self.column_choice = if enabled {
            ColumnChoice::MinimumSize
        } else {
            ColumnChoice::FirstLive
        };
    }

    /// The column choice policy currently in effect.
    pub fn column_choice(&self) -> ColumnChoice {
        self.column_choice
    }

    /// Number of rows in the input matrix, including rows without cells.
    pub fn num_rows(&self) -> usize {
        self.row_heads.len()
    }

    /// Number of columns in the input matrix.
    pub fn num_columns(&self) -> usize {
        self.links.headers.len() - 1
    }

    /// Number of "1"s in the input matrix.
    pub fn num_nodes(&self) -> usize {
        self.links.nodes.len() - self.links.headers.len()
    }

    /// The payloads given at construction, indexed by row.
    pub fn payloads(&self) -> &'p [T] {
        self.payloads
    }

    /// Return true if no column is left in the header ring.
    pub fn is_solved(&self) -> bool {
        self.links.nodes[ROOT].right == ROOT
    }

    /// View of a column, whether or not it is currently covered.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range.
    pub fn column(&self, column: ColumnId) -> ColumnRef<'_, 'p, T> {
        assert!(
            column.0 < self.num_columns(),
            "column {} out of range for {} columns",
            column,
            self.num_columns()
        );

        ColumnRef {
            matrix: self,
            index: column.index(),
        }
    }

    /// Iterate over every column in input order, covered or not.
    pub fn columns(&self) -> impl Iterator<Item = ColumnRef<'_, 'p, T>> + '_ {
        (1..self.links.headers.len()).map(move |index| ColumnRef {
            matrix: self,
            index,
        })
    }

    /// Iterate over the columns still in the header ring, in ring order.
    pub fn live_columns(&self) -> impl Iterator<Item = ColumnRef<'_, 'p, T>> + '_ {
        self.links
            .live_columns()
            .map(move |index| ColumnRef {
                matrix: self,
                index,
            })
    }

    /// View of a node, or `None` if `node` is a column header or out of range.
    pub fn node(&self, node: NodeId) -> Option<NodeRef<'_, 'p, T>> {
        self.links
            .nodes
            .get(node.0)
            .filter(|links| links.row.is_some())
            .map(|_| NodeRef {
                matrix: self,
                index: node.0,
            })
    }

    /// Iterate over the nodes of input row `row`, in column order.
    ///
    /// Rows keep their horizontal links while covered, so this always
    /// yields every cell of the row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> impl Iterator<Item = NodeRef<'_, 'p, T>> + '_ {
        let head = self.row_heads[row];

        head.into_iter()
            .flat_map(move |head| {
                core::iter::once(head).chain(self.links.row_neighbors(head))
            })
            .map(move |index| NodeRef {
                matrix: self,
                index,
            })
    }

    /// Remove `column` from the header ring, along with every row that
    /// touches it from all other columns.
    ///
    /// Covers must be undone with [`Matrix::uncover`] in last-in, first-out
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range or already covered.
    pub fn cover(&mut self, column: ColumnId) {
        let index = self.column(column).index;
        assert!(self.links.is_live(index), "column {} is already covered", column);

        self.links.cover(index);
        self.covered.push(index);
    }

    /// Restore a column removed by [`Matrix::cover`].
    ///
    /// `column` must be the most recently covered column that has not been
    /// uncovered yet.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of range, not covered, or not the most
    /// recently covered column.
    pub fn uncover(&mut self, column: ColumnId) {
        let index = self.column(column).index;
        assert!(!self.links.is_live(index), "column {} is not covered", column);
        assert_eq!(
            self.covered.last(),
            Some(&index),
            "column {} is not the most recently covered column",
            column
        );

        self.covered.pop();
        self.links.uncover(index);
    }
}

impl<T> fmt::Debug for Matrix<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("links", &self.links)
            .field("payloads", &self.payloads)
            .field("column_choice", &self.column_choice)
            .finish()
    }
}

/// One line per live column: its name, size and the rows linked under it.
impl<T> fmt::Display for Matrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in self.live_columns() {
            let rows: Vec<_> = column.rows().collect();
            writeln!(f, "{:>12} ({}): {:?}", column.name(), column.size(), rows)?;
        }

        Ok(())
    }
}
