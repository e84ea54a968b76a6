//! Algorithm X: depth-first backtracking over the dancing links structure.
//!
//! The engine walks the header ring, picks a column, and tries every row
//! still linked under it, covering and uncovering columns in strict
//! last-in, first-out order. Every complete cover is reported to a
//! [`Visitor`], which can also cut the search short. However the search
//! ends, all covers are unwound before returning, so a [`Matrix`] can be
//! searched any number of times.

use core::{hash::Hash, ops::ControlFlow};
use std::collections::HashSet;

use crate::{
    matrix::ColumnChoice,
    node::{Direction, Index, Walk, ROOT},
    Matrix,
};

/// Receives the solutions found by [`Matrix::search_with`].
pub trait Visitor<'p, T> {
    /// Called once for every complete cover.
    ///
    /// Returning [`ControlFlow::Break`] stops the search.
    fn visit(&mut self, selection: &Selection<'_, 'p, T>) -> ControlFlow<()>;

    /// Called before the engine explores a new level of the search tree,
    /// `depth` being the number of rows selected so far.
    ///
    /// Returning [`ControlFlow::Break`] stops the search. The default
    /// implementation never does.
    fn enter(&mut self, depth: usize) -> ControlFlow<()> {
        let _ = depth;
        ControlFlow::Continue(())
    }
}

/// The rows selected on the current search path.
#[derive(Debug)]
pub struct Selection<'s, 'p, T> {
    rows: &'s [usize],
    payloads: &'p [T],
}

impl<'s, 'p, T> Selection<'s, 'p, T> {
    /// Indices of the selected input rows, in the order they were selected.
    pub fn rows(&self) -> &'s [usize] {
        self.rows
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return true if no row was selected, which only happens for a matrix
    /// without columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Payloads of the selected rows, in the order they were selected.
    pub fn payloads<'a>(&'a self) -> impl Iterator<Item = &'p T> + 'a {
        let rows: &'a [usize] = self.rows;
        let payloads = self.payloads;
        rows.iter().map(move |row| &payloads[*row])
    }

    /// Payloads of the selected rows as a set.
    pub fn to_set(&self) -> HashSet<&'p T>
    where
        T: Eq + Hash,
    {
        self.rows.iter().map(|row| &self.payloads[*row]).collect()
    }
}

/// Per-search bookkeeping: the node chosen at each depth.
#[derive(Debug)]
struct SearchContext {
    nodes: Vec<Index>,
    rows: Vec<usize>,
}

impl SearchContext {
    fn with_capacity(depth: usize) -> Self {
        SearchContext {
            nodes: Vec::with_capacity(depth),
            rows: Vec::with_capacity(depth),
        }
    }

    fn depth(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, node: Index, row: usize) {
        self.nodes.push(node);
        self.rows.push(row);
    }

    fn pop(&mut self) {
        self.nodes.pop();
        self.rows.pop();
    }
}

impl<'p, T> Matrix<'p, T> {
    /// Run the search, reporting every exact cover to `visitor` until it asks
    /// to stop.
    ///
    /// Returns [`ControlFlow::Break`] if the visitor stopped the search early.
    pub fn search_with<V>(&mut self, visitor: &mut V) -> ControlFlow<()>
    where
        V: Visitor<'p, T> + ?Sized,
    {
        log::debug!(
            "Searching [{}] columns using {:?}.",
            self.num_columns(),
            self.column_choice
        );

        let mut context = SearchContext::with_capacity(self.num_columns());
        let flow = self.search_from(&mut context, visitor);

        debug_assert_eq!(context.depth(), 0, "search returned with rows still selected");
        log::debug!("Search finished, stopped early: [{}].", flow.is_break());

        flow
    }

    /// Call `on_solution` with every exact cover until it returns
    /// [`ControlFlow::Break`].
    pub fn for_each_solution<F>(&mut self, on_solution: F) -> ControlFlow<()>
    where
        F: FnMut(&Selection<'_, 'p, T>) -> ControlFlow<()>,
    {
        self.search_with(&mut FnVisitor(on_solution))
    }

    /// Find every exact cover, each as the set of its rows' payloads.
    pub fn search(&mut self) -> Vec<HashSet<&'p T>>
    where
        T: Eq + Hash,
    {
        self.collect(None, |selection| selection.to_set())
    }

    /// Find at most `limit` exact covers, stopping the search as soon as the
    /// last one is found.
    pub fn search_limited(&mut self, limit: usize) -> Vec<HashSet<&'p T>>
    where
        T: Eq + Hash,
    {
        self.collect(Some(limit), |selection| selection.to_set())
    }

    /// Find every exact cover, each as the list of selected row indices in
    /// selection order.
    pub fn search_rows(&mut self) -> Vec<Vec<usize>> {
        self.collect(None, |selection| selection.rows().to_vec())
    }

    /// Count the exact covers without keeping them.
    pub fn count_solutions(&mut self) -> usize {
        let mut count = 0;
        let _ = self.for_each_solution(|_| {
            count += 1;
            ControlFlow::Continue(())
        });
        count
    }

    fn collect<R, F>(&mut self, limit: Option<usize>, map: F) -> Vec<R>
    where
        F: FnMut(&Selection<'_, 'p, T>) -> R,
    {
        let mut collector = Collector {
            map,
            limit,
            found: Vec::new(),
        };

        if limit != Some(0) {
            let _ = self.search_with(&mut collector);
        }

        collector.found
    }

    fn search_from<V>(&mut self, context: &mut SearchContext, visitor: &mut V) -> ControlFlow<()>
    where
        V: Visitor<'p, T> + ?Sized,
    {
        let depth = context.depth();
        debug_assert!(
            depth <= self.num_columns(),
            "search depth {} exceeds the number of columns",
            depth
        );

        if visitor.enter(depth).is_break() {
            return ControlFlow::Break(());
        }

        if self.is_solved() {
            log::trace!("Found solution at depth [{}]: {:?}.", depth, context.rows);
            return visitor.visit(&Selection {
                rows: &context.rows,
                payloads: self.payloads,
            });
        }

        let column = self.choose_column();
        log::trace!(
            "Depth [{}]: chose column {} with size [{}].",
            depth,
            self.links.headers[column].name,
            self.links.headers[column].size
        );

        self.links.cover(column);

        let mut flow = ControlFlow::Continue(());
        let mut rows = Walk::new(column, Direction::Down);
        while let Some(row_node) = rows.next(&self.links.nodes) {
            let Some(row) = self.links.nodes[row_node].row else {
                unreachable!("column header linked below column {}", column);
            };
            context.push(row_node, row);
            log::trace!("Depth [{}]: trying row [{}].", depth, row);

            let mut cells = Walk::new(row_node, Direction::Right);
            while let Some(cell) = cells.next(&self.links.nodes) {
                self.links.cover(self.links.nodes[cell].column);
            }

            flow = self.search_from(context, visitor);

            let mut cells = Walk::new(row_node, Direction::Left);
            while let Some(cell) = cells.next(&self.links.nodes) {
                self.links.uncover(self.links.nodes[cell].column);
            }

            context.pop();

            if flow.is_break() {
                break;
            }
        }

        self.links.uncover(column);

        flow
    }

    /// Pick the column to branch on next. Only called while at least one
    /// column is live.
    fn choose_column(&self) -> Index {
        match self.column_choice {
            ColumnChoice::FirstLive => self.links.nodes[ROOT].right,
            ColumnChoice::MinimumSize => {
                let mut chosen = ROOT;
                let mut min_size = usize::MAX;

                // `<=` so that the last of several equally small columns wins.
                for column in self.links.live_columns() {
                    let size = self.links.headers[column].size;
                    if size <= min_size {
                        chosen = column;
                        min_size = size;
                    }
                }

                debug_assert_ne!(chosen, ROOT, "no live column to choose from");
                chosen
            }
        }
    }
}

struct FnVisitor<F>(F);

impl<'p, T, F> Visitor<'p, T> for FnVisitor<F>
where
    F: FnMut(&Selection<'_, 'p, T>) -> ControlFlow<()>,
{
    fn visit(&mut self, selection: &Selection<'_, 'p, T>) -> ControlFlow<()> {
        (self.0)(selection)
    }
}

struct Collector<F, R> {
    map: F,
    limit: Option<usize>,
    found: Vec<R>,
}

impl<'p, T, F, R> Visitor<'p, T> for Collector<F, R>
where
    F: FnMut(&Selection<'_, 'p, T>) -> R,
{
    fn visit(&mut self, selection: &Selection<'_, 'p, T>) -> ControlFlow<()> {
        self.found.push((self.map)(selection));

        match self.limit {
            Some(limit) if self.found.len() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Wraps another visitor and stops the search once a number of search tree
/// nodes have been entered.
///
/// This bounds the work done on instances whose search tree is too large to
/// walk completely.
#[derive(Debug)]
pub struct StepLimit<V> {
    inner: V,
    remaining: usize,
    exhausted: bool,
}

impl<V> StepLimit<V> {
    /// Allow at most `max_steps` calls to [`Visitor::enter`].
    pub fn new(inner: V, max_steps: usize) -> Self {
        StepLimit {
            inner,
            remaining: max_steps,
            exhausted: false,
        }
    }

    /// Return true if the search was cut short because the steps ran out.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Return the wrapped visitor.
    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<'p, T, V> Visitor<'p, T> for StepLimit<V>
where
    V: Visitor<'p, T>,
{
    fn visit(&mut self, selection: &Selection<'_, 'p, T>) -> ControlFlow<()> {
        self.inner.visit(selection)
    }

    fn enter(&mut self, depth: usize) -> ControlFlow<()> {
        if self.remaining == 0 {
            log::debug!("Step limit reached at depth [{}].", depth);
            self.exhausted = true;
            return ControlFlow::Break(());
        }

        self.remaining -= 1;
        self.inner.enter(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnId;

    /// Knuth's example from the "Dancing Links" paper, columns A through G.
    fn knuth_rows() -> (Vec<[bool; 7]>, Vec<&'static str>) {
        let rows: [&[usize]; 6] = [
            &[2, 4],
            &[0, 3, 6],
            &[1, 2, 5],
            &[0, 3, 5],
            &[1, 6],
            &[3, 4, 6],
        ];
        let choices = rows
            .iter()
            .map(|columns| {
                let mut row = [false; 7];
                for &column in *columns {
                    row[column] = true;
                }
                row
            })
            .collect();
        let payloads = vec!["CE", "ADG", "BCF", "ADF", "BG", "DEG"];

        (choices, payloads)
    }

    const KNUTH_COLUMNS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

    #[test]
    fn knuth_example_has_one_solution() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads).unwrap();

        let solutions = matrix.search();

        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], HashSet::from([&"ADF", &"BG", &"CE"]));
    }

    #[test]
    fn knuth_example_selection_order() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads).unwrap();

        // F is the last of the size-two columns, then G, then E.
        assert_eq!(matrix.search_rows(), vec![vec![3, 4, 0]]);
    }

    #[test]
    fn first_live_policy_finds_same_solution() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads)
            .unwrap()
            .with_column_choice(ColumnChoice::FirstLive);

        // A first: row 1 dead-ends, row 3 then B (row 4) then C (row 0).
        assert_eq!(matrix.search_rows(), vec![vec![3, 4, 0]]);
    }

    #[test]
    fn ties_go_to_the_last_column() {
        let choices = [[true, false], [false, true]];
        let payloads = ['a', 'b'];
        let mut matrix = Matrix::new(&choices, &["x", "y"], &payloads).unwrap();

        assert_eq!(matrix.search_rows(), vec![vec![1, 0]]);

        matrix.use_shortest_column(false);
        assert_eq!(matrix.search_rows(), vec![vec![0, 1]]);
    }

    #[test]
    fn latin_square_of_order_two() {
        // Rows are (row, column, symbol); columns are cells, then
        // row/symbol pairs, then column/symbol pairs.
        let payloads: Vec<(usize, usize, usize)> = (0..2)
            .flat_map(|r| (0..2).flat_map(move |c| (0..2).map(move |v| (r, c, v))))
            .collect();
        let choices: Vec<Vec<bool>> = payloads
            .iter()
            .map(|&(r, c, v)| {
                let mut row = vec![false; 12];
                row[2 * r + c] = true;
                row[4 + 2 * r + v] = true;
                row[8 + 2 * c + v] = true;
                row
            })
            .collect();
        let names: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let mut matrix = Matrix::new(&choices, &names, &payloads).unwrap();

        let solutions = matrix.search();

        let first = HashSet::from([&(0, 0, 0), &(0, 1, 1), &(1, 0, 1), &(1, 1, 0)]);
        let second = HashSet::from([&(0, 0, 1), &(0, 1, 0), &(1, 0, 0), &(1, 1, 1)]);
        assert_eq!(solutions.len(), 2);
        assert!(solutions.contains(&first));
        assert!(solutions.contains(&second));
    }

    #[test]
    fn no_columns_means_one_empty_solution() {
        let choices: [[bool; 0]; 3] = [[], [], []];
        let payloads = [1, 2, 3];
        let mut matrix = Matrix::new(&choices, &[] as &[&str], &payloads).unwrap();

        let solutions = matrix.search();

        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].is_empty());
    }

    #[test]
    fn empty_column_prunes_everything() {
        let choices = [[true, false, false], [false, true, false]];
        let payloads = [0, 1];
        let mut matrix = Matrix::new(&choices, &["a", "b", "dead"], &payloads).unwrap();

        assert!(matrix.search().is_empty());
        assert_eq!(matrix.count_solutions(), 0);
    }

    #[test]
    fn search_leaves_structure_untouched() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads).unwrap();
        let before = matrix.links.clone();

        let first = matrix.search();
        assert_eq!(matrix.links, before);

        let second = matrix.search();
        assert_eq!(first, second);
    }

    #[test]
    fn cover_uncover_every_column() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads).unwrap();
        let before = matrix.links.clone();

        for column in 0..KNUTH_COLUMNS.len() {
            matrix.cover(ColumnId(column));
            matrix.uncover(ColumnId(column));
            assert_eq!(matrix.links, before, "column {}", KNUTH_COLUMNS[column]);
        }
    }

    /// Every subset of {0, 1, 2} as a row, so there is one solution per set
    /// partition of three elements.
    fn all_subsets() -> (Vec<[bool; 3]>, Vec<u8>) {
        let payloads: Vec<u8> = (1..8).collect();
        let choices = payloads
            .iter()
            .map(|bits| [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0])
            .collect();
        (choices, payloads)
    }

    #[test]
    fn limited_search_stops_early() {
        let (choices, payloads) = all_subsets();
        let mut matrix = Matrix::new(&choices, &["0", "1", "2"], &payloads).unwrap();
        let before = matrix.links.clone();

        let all = matrix.search();
        assert_eq!(all.len(), 5);

        let limited = matrix.search_limited(2);
        assert_eq!(limited, all[..2].to_vec());
        assert_eq!(matrix.links, before);

        assert!(matrix.search_limited(0).is_empty());
        assert_eq!(matrix.search_limited(10), all);
    }

    #[test]
    fn closure_visitor_can_stop() {
        let (choices, payloads) = all_subsets();
        let mut matrix = Matrix::new(&choices, &["0", "1", "2"], &payloads).unwrap();

        let mut seen = Vec::new();
        let flow = matrix.for_each_solution(|selection| {
            seen.push(selection.payloads().copied().collect::<Vec<_>>());
            if seen.len() == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert!(flow.is_break());
        assert_eq!(seen.len(), 3);
        assert_eq!(matrix.count_solutions(), 5);
    }

    #[test]
    fn refusing_to_enter_finds_nothing() {
        let (choices, payloads) = knuth_rows();
        let mut matrix = Matrix::new(&choices, &KNUTH_COLUMNS, &payloads).unwrap();
        let before = matrix.links.clone();

        let mut limit = StepLimit::new(
            FnVisitor(|_: &Selection<'_, '_, &str>| ControlFlow::Continue(())),
            0,
        );
        let flow = matrix.search_with(&mut limit);

        assert!(flow.is_break());
        assert!(limit.is_exhausted());
        assert_eq!(matrix.links, before);
    }

    #[test]
    fn step_limit_large_enough_completes() {
        let (choices, payloads) = all_subsets();
        let mut matrix = Matrix::new(&choices, &["0", "1", "2"], &payloads).unwrap();

        let collector = Collector {
            map: |selection: &Selection<'_, '_, u8>| selection.rows().to_vec(),
            limit: None,
            found: Vec::new(),
        };
        let mut limit = StepLimit::new(collector, 1_000);
        let flow = matrix.search_with(&mut limit);

        assert!(flow.is_continue());
        assert!(!limit.is_exhausted());
        assert_eq!(limit.into_inner().found.len(), 5);
    }
}
