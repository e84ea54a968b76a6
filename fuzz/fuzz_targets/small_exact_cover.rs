#![no_main]

use dancing_matrix::{ColumnChoice, Matrix};
use libfuzzer_sys::fuzz_target;

const MAX_ROWS: usize = 10;
const MAX_COLUMNS: usize = 8;

#[derive(Debug)]
struct SmallMatrixInput {
    choices: Vec<Vec<bool>>,
    num_columns: usize,
    first_live: bool,
}

impl<'a> arbitrary::Arbitrary<'a> for SmallMatrixInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_rows = u.int_in_range(0..=MAX_ROWS)?;
        let num_columns = u.int_in_range(0..=MAX_COLUMNS)?;
        let choices = (0..num_rows)
            .map(|_| {
                (0..num_columns)
                    .map(|_| u.arbitrary::<bool>())
                    .collect::<arbitrary::Result<Vec<_>>>()
            })
            .collect::<arbitrary::Result<Vec<_>>>()?;

        Ok(SmallMatrixInput {
            choices,
            num_columns,
            first_live: u.arbitrary()?,
        })
    }
}

fuzz_target!(|data: SmallMatrixInput| {
    let names: Vec<String> = (0..data.num_columns).map(|c| format!("c{c}")).collect();
    let payloads: Vec<usize> = (0..data.choices.len()).collect();
    let column_choice = if data.first_live {
        ColumnChoice::FirstLive
    } else {
        ColumnChoice::MinimumSize
    };

    let mut matrix = Matrix::new(&data.choices, &names, &payloads)
        .unwrap()
        .with_column_choice(column_choice);
    let before = format!("{matrix:?}");

    for rows in matrix.search_rows() {
        for column in 0..data.num_columns {
            let hits = rows.iter().filter(|&&row| data.choices[row][column]).count();
            assert_eq!(hits, 1, "column {column} covered {hits} times by {rows:?}");
        }
    }

    assert_eq!(format!("{matrix:?}"), before);
});
