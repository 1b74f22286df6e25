//! Behavioral properties of the differ, checked through the public API.
//!
//! Every property is exercised through the chunked scan and, where the
//! property concerns rendering, through the view materializer as well, since
//! both must agree on what diverges.

use result_diff_rs::{
    ColumnIndexMap, ColumnWidthTracker, Field, MonospaceMeasure, ResultSet, ScanOptions, Value,
    ViewMaterializer, diff_all, view::DEFAULT_CELL_PADDING, view::DEFAULT_HEADER_FONT,
    view::DEFAULT_HEADER_PADDING, view::DEFAULT_ROW_FONT,
};

// =============================================================================
// Helpers
// =============================================================================

fn fields(names: &[&str]) -> Vec<Field> {
    names.iter().copied().map(Field::new).collect()
}

fn single_column(values: &[Value]) -> ResultSet {
    ResultSet::read(
        fields(&["v"]),
        values.iter().cloned().map(|value| vec![value]).collect(),
    )
}

fn materializer() -> ViewMaterializer<MonospaceMeasure> {
    ViewMaterializer::new(MonospaceMeasure::new(10.0))
}

// =============================================================================
// Column alignment
// =============================================================================

#[test]
fn test_column_alignment_ignores_case() {
    let upper = fields(&["ID"]);
    let lower = fields(&["id"]);
    let map = ColumnIndexMap::build(&[Some(upper.as_slice()), Some(lower.as_slice())]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("id"), Some(&[Some(0), Some(0)][..]));
}

#[test]
fn test_same_source_duplicates_get_distinct_entries() {
    let dup = fields(&["x", "x"]);
    let other = fields(&["x"]);
    let map = ColumnIndexMap::build(&[Some(dup.as_slice()), Some(other.as_slice())]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("x"), Some(&[Some(0), Some(0)][..]));
    assert_eq!(map.get("x-0"), Some(&[Some(1), None][..]));
}

// =============================================================================
// Row comparison
// =============================================================================

#[test]
fn test_missing_row_is_divergent() {
    let a = single_column(&[Value::from(1)]);
    let b = single_column(&[]);
    let result = diff_all(vec![a, b], ScanOptions::default()).unwrap();
    assert_eq!(result.row_count, 1);
    assert_eq!(result.diff_row_count, 1);
    assert!(result.is_divergent(0));
    assert_eq!(result.flagged_cells(0, 0), [0]);
    assert!(result.flagged_cells(1, 0).is_empty());
}

#[test]
fn test_number_and_numeric_text_compare_equal() {
    let a = single_column(&[Value::from(42)]);
    let b = single_column(&[Value::from("42")]);
    let result = diff_all(vec![a.clone(), b.clone()], ScanOptions::default()).unwrap();
    assert!(result.is_identical());

    let view = materializer().diff_and_map_to_view(a, b);
    assert_eq!(view.diff_count, 0);
    assert!(view.view_values[0].rows[0].error_array.is_none());
}

#[test]
fn test_extreme_reals_match_their_exponent_text() {
    let a = single_column(&[Value::from(1e21), Value::from(1e-7), Value::from(1.5e-10)]);
    let b = single_column(&[
        Value::from("1e+21"),
        Value::from("1e-7"),
        Value::from("1.5e-10"),
    ]);
    let result = diff_all(vec![a, b], ScanOptions::default()).unwrap();
    assert_eq!(result.diff_row_count, 0);

    let plain = single_column(&[Value::from("1000000000000000000000")]);
    let result = diff_all(
        vec![single_column(&[Value::from(1e21)]), plain],
        ScanOptions::default(),
    )
    .unwrap();
    assert_eq!(result.diff_row_count, 1);
}

#[test]
fn test_null_and_missing_cell_differ() {
    let a = ResultSet::read(fields(&["a", "b"]), vec![vec![Value::from(1), Value::Null]]);
    let b = ResultSet::read(fields(&["a"]), vec![vec![Value::from(1)]]);
    let result = diff_all(vec![a, b], ScanOptions::default()).unwrap();
    assert_eq!(result.diff_row_count, 1);
    assert_eq!(result.flagged_cells(0, 0), [1]);
}

#[test]
fn test_diff_is_idempotent() {
    let a = single_column(&[Value::from(3), Value::from("x"), Value::Null]);
    let b = single_column(&[Value::from(3), Value::from("y")]);
    let first = diff_all(vec![a.clone(), b.clone()], ScanOptions::default()).unwrap();
    let second = diff_all(vec![a, b], ScanOptions::default()).unwrap();
    assert_eq!(first.diff_row_count, second.diff_row_count);
    assert_eq!(first.divergent_rows, second.divergent_rows);
    assert_eq!(first.diff_maps, second.diff_maps);
}

#[test]
fn test_sort_preserves_row_count_and_columns() {
    let a = single_column(&[Value::from("c"), Value::from("a"), Value::from("b")]);
    let b = single_column(&[Value::from("a"), Value::from("b")]);

    let unsorted = diff_all(vec![a.clone(), b.clone()], ScanOptions::default()).unwrap();
    let sorted = diff_all(vec![a, b], ScanOptions::default().with_sort(true)).unwrap();

    assert_eq!(unsorted.row_count, 3);
    assert_eq!(sorted.row_count, 3);
    for (before, after) in unsorted.sources.iter().zip(&sorted.sources) {
        assert_eq!(before.fields, after.fields);
        assert_eq!(before.diff_row_count(), after.diff_row_count());
    }
    // after sorting only the trailing "c" lacks a partner
    assert_eq!(unsorted.diff_row_count, 3);
    assert_eq!(sorted.diff_row_count, 1);
    assert!(sorted.is_divergent(2));
}

// =============================================================================
// Column widths
// =============================================================================

#[test]
fn test_widths_grow_monotonically() {
    let measure = MonospaceMeasure::new(10.0);
    let header = fields(&["v"]);
    let mut tracker =
        ColumnWidthTracker::seed(&header, &measure, DEFAULT_HEADER_FONT, DEFAULT_HEADER_PADDING);
    let header_width = tracker.width(0).unwrap();
    for text in ["a", "abcdefghij"] {
        tracker.observe(0, text, &measure, DEFAULT_ROW_FONT, DEFAULT_CELL_PADDING);
    }
    let width = tracker.width(0).unwrap();
    assert!(width >= header_width);
    assert!(width >= 100 + DEFAULT_CELL_PADDING);

    let view = materializer().diff_and_map_to_view(
        single_column(&[Value::from("a"), Value::from("abcdefghij")]),
        single_column(&[]),
    );
    assert_eq!(view.view_values[0].columns[1].width, width);
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_end_to_end_changed_name() {
    let people = |second: &str| {
        ResultSet::read(
            fields(&["id", "name"]),
            vec![
                vec![Value::from(1), Value::from("Alice")],
                vec![Value::from(2), Value::from(second)],
            ],
        )
    };
    let view = materializer().diff_and_map_to_view(people("Bob"), people("Bobby"));
    assert_eq!(view.diff_count, 1);
    assert_eq!(view.row_count, 2);
    for side in &view.view_values {
        assert!(!side.rows[0].contains_error);
        assert!(side.rows[1].contains_error);
        assert_eq!(side.rows[1].error_array, Some(vec![false, false, true]));
    }

    let result = diff_all(vec![people("Bob"), people("Bobby")], ScanOptions::default()).unwrap();
    assert_eq!(result.diff_row_count, 1);
    assert_eq!(result.flagged_cells(0, 1), [1]);
    assert_eq!(result.flagged_cells(1, 1), [1]);
}

#[test]
fn test_end_to_end_missing_column() {
    let with_email = ResultSet::read(
        fields(&["id", "name", "email"]),
        vec![
            vec![Value::from(1), Value::from("Alice"), Value::from("a@x.org")],
            vec![Value::from(2), Value::from("Bob"), Value::Null],
        ],
    );
    let without_email = ResultSet::read(
        fields(&["id", "name"]),
        vec![
            vec![Value::from(1), Value::from("Alice")],
            vec![Value::from(2), Value::from("Bob")],
        ],
    );

    let result = diff_all(
        vec![with_email.clone(), without_email.clone()],
        ScanOptions::default(),
    )
    .unwrap();
    assert_eq!(result.diff_row_count, 2);
    for row in 0..2 {
        assert_eq!(result.flagged_cells(0, row), [2]);
        assert!(result.flagged_cells(1, row).is_empty());
    }

    let view = materializer().diff_and_map_to_view(with_email, without_email);
    let [left, right] = &view.view_values;
    assert!(left.rows.iter().all(|row| row.is_cell_divergent(2)));
    assert!(left.rows.iter().all(|row| !row.is_cell_divergent(1)));
    assert!(right.rows.iter().all(|row| row.contains_error));
    assert!(
        right
            .rows
            .iter()
            .all(|row| !row.is_cell_divergent(0) && !row.is_cell_divergent(1))
    );
}

#[test]
fn test_empty_inputs() {
    let empty = || ResultSet::read(Vec::new(), Vec::new());
    let result = diff_all(vec![empty(), empty()], ScanOptions::default()).unwrap();
    assert_eq!(result.diff_row_count, 0);
    assert_eq!(result.row_count, 0);
    assert!(result.diff_maps.is_none());

    let view = materializer().diff_and_map_to_view(empty(), empty());
    assert_eq!(view.diff_count, 0);
    assert_eq!(view.row_count, 0);
    for side in &view.view_values {
        assert!(side.rows.is_empty());
        assert!(side.columns.is_empty());
    }

    let view = materializer().diff_and_map_to_view(ResultSet::empty(), ResultSet::empty());
    assert_eq!(view.row_count, 0);
}
