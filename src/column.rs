//! Column headers and the reversible cover/uncover protocol.

use core::fmt;

use crate::{
    node::{Direction, Index, Node, NodeId, NodeRef, Walk, ROOT},
    Matrix,
};

/// Stable identifier of a column (constraint), in input order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub usize);

impl ColumnId {
    /// Arena slot of the header. Slot 0 belongs to the root.
    #[inline]
    pub(crate) fn index(self) -> Index {
        self.0 + 1
    }

    #[inline]
    pub(crate) fn from_index(index: Index) -> Self {
        debug_assert_ne!(index, ROOT, "the root is not a column");
        ColumnId(index - 1)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Bookkeeping carried by a column header on top of its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnHeader {
    /// Diagnostic name, never used for correctness.
    pub(crate) name: String,
    /// Number of nodes currently linked into the vertical ring.
    pub(crate) size: usize,
}

/// The whole toroidal structure: every node plus one header record per arena
/// slot that is a header (the root included, at slot 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Links {
    pub(crate) nodes: Vec<Node>,
    pub(crate) headers: Vec<ColumnHeader>,
}

impl Links {
    /// Remove `column` from the header ring and every row that touches it from
    /// all other columns.
    pub(crate) fn cover(&mut self, column: Index) {
        log::trace!(
            "cover {} (size {})",
            self.headers[column].name,
            self.headers[column].size
        );

        Node::cover_horizontal(&mut self.nodes, column);

        let mut rows = Walk::new(column, Direction::Down);
        while let Some(row_node) = rows.next(&self.nodes) {
            let mut cells = Walk::new(row_node, Direction::Right);
            while let Some(cell) = cells.next(&self.nodes) {
                Node::cover_vertical(&mut self.nodes, cell);

                let owner = self.nodes[cell].column;
                debug_assert!(self.headers[owner].size > 0);
                self.headers[owner].size -= 1;
            }
        }
    }

    /// Undo [`Links::cover`], walking both axes in the opposite direction.
    ///
    /// Must be applied to the most recently covered column.
    pub(crate) fn uncover(&mut self, column: Index) {
        let mut rows = Walk::new(column, Direction::Up);
        while let Some(row_node) = rows.next(&self.nodes) {
            let mut cells = Walk::new(row_node, Direction::Left);
            while let Some(cell) = cells.next(&self.nodes) {
                let owner = self.nodes[cell].column;
                self.headers[owner].size += 1;

                Node::uncover_vertical(&mut self.nodes, cell);
            }
        }

        Node::uncover_horizontal(&mut self.nodes, column);

        log::trace!(
            "uncover {} (size {})",
            self.headers[column].name,
            self.headers[column].size
        );
    }

    /// Return true if `column` is currently linked into the header ring.
    pub(crate) fn is_live(&self, column: Index) -> bool {
        let Node { left, right, .. } = self.nodes[column];

        self.nodes[left].right == column && self.nodes[right].left == column
    }

    /// Iterate over the header slots of all live columns, in ring order.
    pub(crate) fn live_columns(&self) -> impl Iterator<Item = Index> + '_ {
        Walk::new(ROOT, Direction::Right).iter(&self.nodes)
    }

    /// Iterate over the nodes currently linked under `column`, top to bottom.
    pub(crate) fn column_nodes(&self, column: Index) -> impl Iterator<Item = Index> + '_ {
        Walk::new(column, Direction::Down).iter(&self.nodes)
    }

    /// Iterate over the other nodes in the row of `node`, left to right.
    pub(crate) fn row_neighbors(&self, node: Index) -> impl Iterator<Item = Index> + '_ {
        Walk::new(node, Direction::Right).iter(&self.nodes)
    }
}

/// Read-only view of a column header.
#[derive(Debug)]
pub struct ColumnRef<'m, 'p, T> {
    pub(crate) matrix: &'m Matrix<'p, T>,
    pub(crate) index: Index,
}

impl<'m, 'p, T> Clone for ColumnRef<'m, 'p, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, 'p, T> Copy for ColumnRef<'m, 'p, T> {}

impl<'m, 'p, T> ColumnRef<'m, 'p, T> {
    fn header(&self) -> &'m ColumnHeader {
        &self.matrix.links.headers[self.index]
    }

    /// Identifier of this column.
    pub fn id(&self) -> ColumnId {
        ColumnId::from_index(self.index)
    }

    /// Human readable label given at construction.
    pub fn name(&self) -> &'m str {
        &self.header().name
    }

    /// Number of rows currently linked into this column.
    pub fn size(&self) -> usize {
        self.header().size
    }

    /// Return true if this column is currently part of the header ring.
    pub fn is_live(&self) -> bool {
        self.matrix.links.is_live(self.index)
    }

    /// Iterate over the nodes currently linked into this column, top to
    /// bottom.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'m, 'p, T>> + 'm {
        let matrix = self.matrix;

        matrix
            .links
            .column_nodes(self.index)
            .map(move |index| NodeRef { matrix, index })
    }

    /// Iterate over the input row indices currently linked into this column.
    pub fn rows(&self) -> impl Iterator<Item = usize> + 'm {
        self.nodes().map(|node| node.row())
    }

    /// Header node of this column, as seen from the `up`/`down` links of
    /// its nodes.
    pub fn node_id(&self) -> NodeId {
        NodeId(self.index)
    }
}
