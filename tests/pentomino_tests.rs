mod common;

use std::collections::HashSet;

use common::{assert_valid_tiling, init_logging};
use dancing_matrix::pentomino::{Board, Pentomino, Puzzle};

#[test]
fn three_by_twenty() {
    init_logging();

    let board = Board::rectangle(3, 20);
    let puzzle = Puzzle::new(Pentomino::ALL, board.clone()).unwrap();

    let solutions = puzzle.solve_for_multiple(None).unwrap();

    // Two tilings, each seen in the four orientations of the rectangle.
    assert_eq!(solutions.len(), 8);
    for solution in &solutions {
        log::debug!("Found tiling:\n{}", solution);
        assert_valid_tiling(&Pentomino::ALL, &board, solution);
    }

    let drawings: HashSet<String> = solutions.iter().map(ToString::to_string).collect();
    assert_eq!(drawings.len(), 8);

    assert_eq!(puzzle.count_solutions().unwrap(), 8);
}

#[test]
fn limit_stops_the_search() {
    init_logging();

    let puzzle = Puzzle::new(Pentomino::ALL, Board::rectangle(3, 20)).unwrap();

    let first_three = puzzle.solve_for_multiple(Some(3)).unwrap();
    let all = puzzle.solve_for_multiple(None).unwrap();

    assert_eq!(first_three.len(), 3);
    // Searching is deterministic, so the limited run is a prefix of the full
    // one.
    assert_eq!(first_three[..], all[..3]);
    assert_eq!(puzzle.solve().unwrap().as_ref(), all.first());
}

#[test]
fn blocked_centre_of_eight_by_eight() {
    init_logging();

    // The classic Scott's puzzle board: 8x8 with the central 2x2 removed.
    let mut rows = vec![vec![false; 8]; 8];
    for row in &mut rows[3..5] {
        row[3] = true;
        row[4] = true;
    }
    let board = Board::from_rows(&rows).unwrap();
    let puzzle = Puzzle::new(Pentomino::ALL, board.clone()).unwrap();

    let solution = puzzle.solve().unwrap().expect("the board can be tiled");

    assert_valid_tiling(&Pentomino::ALL, &board, &solution);
    log::debug!("Found tiling:\n{}", solution);
}

#[test]
fn narrow_board_has_no_tiling() {
    // Sixty cells, but the X pentomino needs three rows.
    let puzzle = Puzzle::new(Pentomino::ALL, Board::rectangle(2, 30)).unwrap();

    assert_eq!(puzzle.solve().unwrap(), None);
}

#[test]
#[ignore = "takes several minutes when not built in release mode"]
fn six_by_ten() {
    init_logging();

    let puzzle = Puzzle::new(Pentomino::ALL, Board::rectangle(6, 10)).unwrap();

    // 2339 tilings up to symmetry.
    assert_eq!(puzzle.count_solutions().unwrap(), 9356);
}

#[test]
#[ignore = "takes several minutes when not built in release mode"]
fn diamond_board() {
    init_logging();

    // Rows grow from one open cell to eleven and back down, 60 cells in all.
    let rows: Vec<Vec<bool>> = (0..10usize)
        .map(|row| {
            let margin = row.abs_diff(5);
            (0..11).map(|column| column < margin || column > 10 - margin).collect()
        })
        .collect();
    let board = Board::from_rows(&rows).unwrap();
    assert_eq!(board.empty_cells().count(), 60);
    let puzzle = Puzzle::new(Pentomino::ALL, board.clone()).unwrap();

    for solution in puzzle.solve_for_multiple(Some(10)).unwrap() {
        assert_valid_tiling(&Pentomino::ALL, &board, &solution);
    }
}
