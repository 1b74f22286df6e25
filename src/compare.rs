//! Row comparison across sources.
//!
//! Rows are aligned positionally: row `i` of every source is compared with
//! row `i` of every other source, column by column through a
//! [`ColumnIndexMap`]. A row is *divergent* when any source lacks it, or when
//! the string forms of any aligned column differ.

mod accumulator;

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

pub use accumulator::{DiffAccumulator, DiffMap};

use crate::column_map::ColumnIndexMap;
use crate::value::{Value, cell_text};

/// Verdict for one row position across all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowVerdict {
    row_diff: bool,
    cell_flags: Vec<Vec<bool>>,
}

impl RowVerdict {
    /// Whether the row differs across sources.
    #[must_use]
    pub fn is_divergent(&self) -> bool {
        self.row_diff
    }

    /// Per-cell divergence flags of one source, one entry per cell of that
    /// source's row. Empty when the source has no row at this position.
    #[must_use]
    pub fn cell_flags(&self, source: usize) -> &[bool] {
        self.cell_flags.get(source).map_or(&[][..], Vec::as_slice)
    }

    /// Column indexes of the flagged cells of one source, ascending.
    pub fn flagged_cells(&self, source: usize) -> impl Iterator<Item = usize> + '_ {
        self.cell_flags(source)
            .iter()
            .enumerate()
            .filter_map(|(column, &flagged)| flagged.then_some(column))
    }

    /// Number of sources this verdict covers.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.cell_flags.len()
    }
}

/// Compare the rows found at one position in every source.
///
/// `rows[s]` is `None` when source `s` has no row at this position.
///
/// # Example
///
/// ```
/// use result_diff_rs::{ColumnIndexMap, Field, Value, compare::compare_row};
///
/// let fields = [Field::new("id"), Field::new("name")];
/// let map = ColumnIndexMap::build(&[Some(&fields[..]), Some(&fields[..])]);
///
/// let ora = [Value::from(2), Value::from("Bob")];
/// let pg = [Value::from("2"), Value::from("Bobby")];
/// let verdict = compare_row(&[Some(&ora[..]), Some(&pg[..])], &map);
///
/// assert!(verdict.is_divergent());
/// assert_eq!(verdict.cell_flags(0), [false, true]);
/// assert_eq!(verdict.cell_flags(1), [false, true]);
/// ```
#[must_use]
pub fn compare_row(rows: &[Option<&[Value]>], map: &ColumnIndexMap) -> RowVerdict {
    compare_row_with(rows, map, |_, _, _| {})
}

/// Compare one row position, reporting every present cell to `visit` as
/// `(source, column index, string form)`.
///
/// Each present cell is visited exactly once, so callers can track column
/// widths without rendering the cell a second time.
pub fn compare_row_with<'a, F>(
    rows: &[Option<&'a [Value]>],
    map: &ColumnIndexMap,
    mut visit: F,
) -> RowVerdict
where
    F: FnMut(usize, usize, &str),
{
    let mut row_diff = rows.iter().any(Option::is_none);
    let mut cell_flags: Vec<Vec<bool>> = rows
        .iter()
        .map(|row| vec![false; row.map_or(0, <[Value]>::len)])
        .collect();
    let mut texts: Vec<Cow<'a, str>> = Vec::with_capacity(rows.len());

    for (_, indexes) in map.iter() {
        texts.clear();
        for (source, row) in rows.iter().copied().enumerate() {
            let column = indexes.get(source).copied().flatten();
            let cell = match (row, column) {
                (Some(row), Some(column)) => row.get(column),
                _ => None,
            };
            let text = cell_text(cell);
            if let (Some(_), Some(column)) = (cell, column) {
                visit(source, column, &*text);
            }
            texts.push(text);
        }

        if texts.windows(2).all(|pair| pair[0] == pair[1]) {
            continue;
        }

        row_diff = true;
        for (source, row) in rows.iter().enumerate() {
            if row.is_none() {
                continue;
            }
            let Some(column) = indexes.get(source).copied().flatten() else {
                continue;
            };
            if let Some(flag) = cell_flags[source].get_mut(column) {
                *flag = true;
            }
        }
    }

    RowVerdict {
        row_diff,
        cell_flags,
    }
}
