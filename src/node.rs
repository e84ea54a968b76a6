//! The four-direction link record behind every "1" in the matrix.
//!
//! Nodes live in a single arena owned by the [`Matrix`](crate::Matrix) and
//! refer to each other by index, so rewiring a link is a plain assignment and
//! nothing ever needs to be freed while a search is running.

use core::fmt;

use crate::{column::ColumnId, Matrix};

/// Internal index into the node arena.
pub(crate) type Index = usize;

/// Arena slot of the sentinel root header.
pub(crate) const ROOT: Index = 0;

/// Direction of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Link node in the dancing links structure, linked along two axes.
///
/// Column headers (and the root) are nodes too: their left/right links form
/// the header ring and their up/down links anchor the column's vertical ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) left: Index,
    pub(crate) right: Index,
    pub(crate) up: Index,
    pub(crate) down: Index,
    /// Arena slot of the owning column header. Headers point at themselves.
    pub(crate) column: Index,
    /// Input row this node was created for, `None` for headers.
    pub(crate) row: Option<usize>,
}

impl Node {
    /// Create a node whose four links all point back at `index`.
    pub(crate) fn new_self_ref(index: Index, column: Index, row: Option<usize>) -> Self {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            column,
            row,
        }
    }

    #[inline]
    pub(crate) fn get(&self, direction: Direction) -> Index {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

// The [un]cover functions read both neighbors before writing either, so the
// case where left == right (or up == down) still ends up consistent.
impl Node {
    pub(crate) fn cover_horizontal(nodes: &mut [Node], index: Index) {
        let Node { left, right, .. } = nodes[index];

        nodes[left].right = right;
        nodes[right].left = left;
    }

    pub(crate) fn cover_vertical(nodes: &mut [Node], index: Index) {
        let Node { up, down, .. } = nodes[index];

        nodes[up].down = down;
        nodes[down].up = up;
    }

    pub(crate) fn uncover_horizontal(nodes: &mut [Node], index: Index) {
        let Node { left, right, .. } = nodes[index];

        nodes[left].right = index;
        nodes[right].left = index;
    }

    pub(crate) fn uncover_vertical(nodes: &mut [Node], index: Index) {
        let Node { up, down, .. } = nodes[index];

        nodes[up].down = index;
        nodes[down].up = index;
    }
}

macro_rules! add_direction {
    ($name:ident, $direction:ident, $opposite:ident) => {
        /// Link `neighbor` on this side of `index`, overwriting both
        /// facing links.
        pub(crate) fn $name(nodes: &mut [Node], index: Index, neighbor: Index) {
            nodes[index].$direction = neighbor;
            nodes[neighbor].$opposite = index;
        }
    };
}

impl Node {
    add_direction!(add_below, down, up);

    add_direction!(add_right, right, left);
}

/// Borrowless traversal state for walking one ring.
///
/// The walk finishes when the starting point is reached again; the starting
/// point itself is never emitted. Because it does not hold a borrow, links can
/// be rewritten between steps as long as the ring being walked is left intact.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walk {
    start: Index,
    current: Index,
    direction: Direction,
}

impl Walk {
    pub(crate) fn new(start: Index, direction: Direction) -> Self {
        Walk {
            start,
            current: start,
            direction,
        }
    }

    /// Step to the next node of the ring, reading links from `nodes`.
    #[inline]
    pub(crate) fn next(&mut self, nodes: &[Node]) -> Option<Index> {
        let next = nodes[self.current].get(self.direction);

        if next == self.start {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }

    /// Turn the walk into an iterator that borrows `nodes` for its duration.
    pub(crate) fn iter(self, nodes: &[Node]) -> WalkIter<'_> {
        WalkIter { walk: self, nodes }
    }
}

#[derive(Debug)]
pub(crate) struct WalkIter<'n> {
    walk: Walk,
    nodes: &'n [Node],
}

impl Iterator for WalkIter<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next(self.nodes)
    }
}

/// Stable identifier of a node in a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of a single "1" of the matrix.
///
/// Neighbors are reported as they are currently linked, so while columns are
/// covered the view reflects the covered structure.
#[derive(Debug)]
pub struct NodeRef<'m, 'p, T> {
    pub(crate) matrix: &'m Matrix<'p, T>,
    pub(crate) index: Index,
}

impl<'m, 'p, T> Clone for NodeRef<'m, 'p, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, 'p, T> Copy for NodeRef<'m, 'p, T> {}

impl<'m, 'p, T> NodeRef<'m, 'p, T> {
    fn node(&self) -> &'m Node {
        &self.matrix.links.nodes[self.index]
    }

    fn neighbor(&self, direction: Direction) -> NodeId {
        NodeId(self.node().get(direction))
    }

    /// Identifier of this node.
    pub fn id(&self) -> NodeId {
        NodeId(self.index)
    }

    /// Node currently linked to the left in this row.
    pub fn left(&self) -> NodeId {
        self.neighbor(Direction::Left)
    }

    /// Node currently linked to the right in this row.
    pub fn right(&self) -> NodeId {
        self.neighbor(Direction::Right)
    }

    /// Node currently linked above in this column.
    ///
    /// This may be the column header, reported as an ordinary [`NodeId`].
    pub fn up(&self) -> NodeId {
        self.neighbor(Direction::Up)
    }

    /// Node currently linked below in this column.
    pub fn down(&self) -> NodeId {
        self.neighbor(Direction::Down)
    }

    /// The column this node belongs to.
    pub fn column(&self) -> ColumnId {
        ColumnId::from_index(self.node().column)
    }

    /// Index of the input row this node was created for.
    pub fn row(&self) -> usize {
        self.node()
            .row
            .expect("node views are only handed out for body nodes")
    }

    /// Payload of the row this node belongs to.
    pub fn payload(&self) -> &'p T {
        &self.matrix.payloads[self.row()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(len: usize) -> Vec<Node> {
        let mut nodes: Vec<_> = (0..len)
            .map(|index| Node::new_self_ref(index, index, None))
            .collect();
        for index in 0..len {
            Node::add_right(&mut nodes, index, (index + 1) % len);
        }
        nodes
    }

    #[test]
    fn walk_skips_start() {
        let nodes = ring(4);

        let forward: Vec<_> = Walk::new(1, Direction::Right).iter(&nodes).collect();
        let backward: Vec<_> = Walk::new(1, Direction::Left).iter(&nodes).collect();

        assert_eq!(forward, vec![2, 3, 0]);
        assert_eq!(backward, vec![0, 3, 2]);
    }

    #[test]
    fn cover_then_uncover_horizontal() {
        let mut nodes = ring(3);
        let before = nodes.clone();

        Node::cover_horizontal(&mut nodes, 1);
        assert_eq!(
            Walk::new(0, Direction::Right).iter(&nodes).collect::<Vec<_>>(),
            vec![2]
        );
        // The removed node still remembers where it was.
        assert_eq!((nodes[1].left, nodes[1].right), (0, 2));

        Node::uncover_horizontal(&mut nodes, 1);
        assert_eq!(nodes, before);
    }

    #[test]
    fn cover_in_two_element_ring() {
        let mut nodes = ring(2);

        Node::cover_horizontal(&mut nodes, 1);
        assert_eq!((nodes[0].left, nodes[0].right), (0, 0));

        Node::uncover_horizontal(&mut nodes, 1);
        assert_eq!((nodes[0].left, nodes[0].right), (1, 1));
    }
}
