use std::collections::BTreeSet;

use dancing_matrix::pentomino::{Board, Coordinate, Pentomino, Solution};

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build the `rows` × `columns` boolean matrix whose cells are the low bits of
/// `bits`, in row-major order.
#[allow(dead_code)]
pub fn matrix_from_bits(bits: u32, rows: usize, columns: usize) -> Vec<Vec<bool>> {
    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| bits & (1 << (row * columns + column)) != 0)
                .collect()
        })
        .collect()
}

/// Return true if the selected rows cover every column exactly once.
#[allow(dead_code)]
pub fn is_exact_cover(choices: &[Vec<bool>], num_columns: usize, rows: &[usize]) -> bool {
    (0..num_columns).all(|column| {
        rows.iter()
            .filter(|&&row| choices[row][column])
            .count()
            == 1
    })
}

/// Enumerate every exact cover by checking all subsets of rows.
///
/// Rows without any `true` cell are never part of a solution, matching the
/// linked structure where such a row has no nodes to select.
#[allow(dead_code)]
pub fn brute_force(choices: &[Vec<bool>], num_columns: usize) -> BTreeSet<Vec<usize>> {
    let candidates: Vec<usize> = (0..choices.len())
        .filter(|&row| choices[row].iter().any(|cell| *cell))
        .collect();

    (0u32..1 << candidates.len())
        .map(|subset| {
            candidates
                .iter()
                .enumerate()
                .filter(|(bit, _)| subset & (1 << bit) != 0)
                .map(|(_, &row)| row)
                .collect::<Vec<_>>()
        })
        .filter(|rows| is_exact_cover(choices, num_columns, rows))
        .collect()
}

/// Normalise solver output to sorted row lists so it can be compared with
/// [`brute_force`].
#[allow(dead_code)]
pub fn normalise(solutions: Vec<Vec<usize>>) -> BTreeSet<Vec<usize>> {
    solutions
        .into_iter()
        .map(|mut rows| {
            rows.sort_unstable();
            rows
        })
        .collect()
}

/// Panic unless `solution` places every piece once and covers each open cell
/// of `board` exactly once.
#[allow(dead_code)]
pub fn assert_valid_tiling(pieces: &[Pentomino], board: &Board, solution: &Solution) {
    assert_eq!(solution.placements().len(), pieces.len());
    for piece in pieces {
        let placement = solution
            .placement(*piece)
            .unwrap_or_else(|| panic!("piece {piece} was not placed"));
        assert_eq!(placement.pentomino, *piece);
    }

    let mut covered = BTreeSet::new();
    for placement in solution.placements().values() {
        for cell in placement.cells() {
            assert!(
                cell.x < board.width() && cell.y < board.height(),
                "{cell} is off the board"
            );
            assert!(!board.is_blocked(cell), "{cell} is blocked");
            assert!(covered.insert(cell), "{cell} is covered twice");
        }
    }

    let open: BTreeSet<Coordinate> = board.empty_cells().collect();
    assert_eq!(covered, open);
}
