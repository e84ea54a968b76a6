//! Run the pentomino tiling solver on an open rectangle.
//! Usage:
//!
//! ```bash
//! cargo run --release --example pentomino 6 10 [limit]
//! ```

use dancing_matrix::pentomino::{Board, Pentomino, Puzzle};

fn parse_arg(args: &[String], index: usize, what: &str) -> Option<usize> {
    let arg = args.get(index)?;
    match arg.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("invalid {what}: {arg}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (Some(height), Some(width)) = (parse_arg(&args, 1, "height"), parse_arg(&args, 2, "width"))
    else {
        eprintln!("board height and width needed");
        std::process::exit(1);
    };
    let limit = parse_arg(&args, 3, "limit");

    let puzzle = match Puzzle::new(Pentomino::ALL, Board::rectangle(height, width)) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let solutions = match puzzle.solve_for_multiple(limit) {
        Ok(solutions) => solutions,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    for solution in &solutions {
        println!("{solution}");
    }
    println!("{} solution(s)", solutions.len());
}
