//! Render-ready side-by-side views of a diff.
//!
//! Where the chunked scan only keeps sparse divergence maps, the view
//! materializer produces a row for *every* position of every source, each
//! annotated with its verdict, plus column descriptors whose widths fit the
//! widest cell seen. A virtualized grid can paint the result directly.
//!
//! Each source keeps its own columns in its own order and gets its own
//! widths: the tables render next to each other, not merged.

mod options;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::iter;

pub use options::{
    DEFAULT_CELL_PADDING, DEFAULT_HEADER_FONT, DEFAULT_HEADER_PADDING, DEFAULT_ROW_FONT,
    ViewOptions,
};

use crate::column_map::ColumnIndexMap;
use crate::compare::compare_row_with;
use crate::result_set::{Field, ResultSet, SourceError};
use crate::scan::DiffResult;
use crate::value::Value;
use crate::width::{ColumnWidthTracker, TextMeasure};

/// Id of the synthetic leading row-number column.
pub const ROW_NUMBER_COLUMN_ID: &str = "-1";

/// Edge a column sticks to while the grid scrolls horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Sticky {
    /// Pinned to the left edge.
    Left,
}

/// Descriptor of one rendered column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ViewColumn {
    /// Header text.
    pub name: String,
    /// Column id: the source column index, or `"-1"` for the row number.
    pub id: String,
    /// Width in pixels.
    pub width: u32,
    /// Set on the row-number column.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sticky: Option<Sticky>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct ViewRow {
    /// The 1-based row number followed by the row's raw cells.
    pub data: Vec<Value>,
    /// Whether the row differs across sources.
    pub contains_error: bool,
    /// Per-cell divergence flags aligned with `data` (the row-number slot is
    /// always `false`). Only present on divergent rows.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_array: Option<Vec<bool>>,
}

impl ViewRow {
    fn new(row_index: usize, cells: &[Value], contains_error: bool, flags: &[bool]) -> Self {
        let number = i64::try_from(row_index + 1).unwrap_or(i64::MAX);
        let mut data = Vec::with_capacity(cells.len() + 1);
        data.push(Value::Integer(number));
        data.extend_from_slice(cells);
        Self {
            data,
            contains_error,
            error_array: contains_error
                .then(|| iter::once(false).chain(flags.iter().copied()).collect()),
        }
    }

    /// The 1-based row number.
    #[must_use]
    pub fn row_number(&self) -> Option<i64> {
        match self.data.first() {
            Some(Value::Integer(number)) => Some(*number),
            _ => None,
        }
    }

    /// The raw cells, without the row number.
    #[must_use]
    pub fn cells(&self) -> &[Value] {
        self.data.get(1..).unwrap_or_default()
    }

    /// Whether cell `column` (a source column index) diverged.
    #[must_use]
    pub fn is_cell_divergent(&self, column: usize) -> bool {
        self.error_array
            .as_ref()
            .and_then(|flags| flags.get(column + 1))
            .copied()
            .unwrap_or(false)
    }
}

/// Render-ready view of one source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct ViewResult {
    /// Whether the source ran without an engine error.
    pub success: bool,
    /// Column descriptors, led by the row-number column. Empty for failed
    /// and write-only results.
    pub columns: Vec<ViewColumn>,
    /// One entry per row of the source.
    pub rows: Vec<ViewRow>,
    /// The source's engine error, forwarded untouched.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<SourceError>,
    /// The source's affected row count, forwarded untouched.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub rows_affected: Option<u64>,
}

/// Views of all sources of one diff, with the aggregate counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct DiffResultView<const N: usize = 2> {
    /// Number of divergent rows.
    pub diff_count: usize,
    /// Number of row positions: the longest source's row count.
    pub row_count: usize,
    /// One view per source, in input order.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_views"))]
    pub view_values: [ViewResult; N],
}

#[cfg(feature = "serde")]
fn serialize_views<S: serde::Serializer, const N: usize>(
    views: &[ViewResult; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(views)
}

/// Builds [`DiffResultView`]s, measuring text with `M`.
#[derive(Debug, Clone)]
pub struct ViewMaterializer<M> {
    measure: M,
    options: ViewOptions,
}

impl<M: TextMeasure> ViewMaterializer<M> {
    /// Create a materializer with default options.
    #[must_use]
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            options: ViewOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Diff two sources and build both side-by-side views.
    ///
    /// # Example
    ///
    /// ```
    /// use result_diff_rs::{Field, MonospaceMeasure, ResultSet, Value, ViewMaterializer};
    ///
    /// let fields = || vec![Field::new("id"), Field::new("name")];
    /// let ora = ResultSet::read(fields(), vec![
    ///     vec![Value::from(1), Value::from("Alice")],
    ///     vec![Value::from(2), Value::from("Bob")],
    /// ]);
    /// let pg = ResultSet::read(fields(), vec![
    ///     vec![Value::from(1), Value::from("Alice")],
    ///     vec![Value::from(2), Value::from("Bobby")],
    /// ]);
    ///
    /// let view = ViewMaterializer::new(MonospaceMeasure::default()).diff_and_map_to_view(ora, pg);
    /// assert_eq!(view.diff_count, 1);
    /// assert_eq!(view.row_count, 2);
    ///
    /// let [ora_view, pg_view] = &view.view_values;
    /// assert!(!ora_view.rows[0].contains_error);
    /// assert!(ora_view.rows[1].is_cell_divergent(1));
    /// assert!(pg_view.rows[1].is_cell_divergent(1));
    /// ```
    #[must_use]
    pub fn diff_and_map_to_view(&self, a: ResultSet, b: ResultSet) -> DiffResultView {
        self.materialize([a, b])
    }

    /// Diff any fixed number of sources and build one view per source.
    #[must_use]
    pub fn materialize<const N: usize>(&self, mut sources: [ResultSet; N]) -> DiffResultView<N> {
        if self.options.sort_results {
            for source in &mut sources {
                source.sort_rows();
            }
        }
        let columns = ColumnIndexMap::from_result_sets(&sources);
        let mut widths: [ColumnWidthTracker; N] =
            core::array::from_fn(|s| self.seed_widths(source_fields(&sources[s])));
        let mut rows: [Vec<ViewRow>; N] = core::array::from_fn(|s| {
            Vec::with_capacity(sources[s].diff_row_count())
        });
        let row_count = sources
            .iter()
            .map(ResultSet::diff_row_count)
            .max()
            .unwrap_or(0);
        tracing::debug!(
            sources = N,
            columns = columns.len(),
            rows = row_count,
            sorted = self.options.sort_results,
            "materializing diff view"
        );

        let mut diff_count = 0;
        for row in 0..row_count {
            let cells: [Option<&[Value]>; N] = core::array::from_fn(|s| sources[s].diff_row(row));
            let verdict = compare_row_with(&cells, &columns, |source, column, text| {
                self.observe(&mut widths[source], column, text);
            });
            if verdict.is_divergent() {
                diff_count += 1;
            }
            for (source, cells) in cells.iter().enumerate() {
                if let Some(cells) = cells {
                    rows[source].push(ViewRow::new(
                        row,
                        cells,
                        verdict.is_divergent(),
                        verdict.cell_flags(source),
                    ));
                }
            }
        }

        let view_values = core::array::from_fn(|s| {
            self.finish_view(
                &sources[s],
                core::mem::take(&mut widths[s]),
                core::mem::take(&mut rows[s]),
            )
        });
        tracing::debug!(diff_rows = diff_count, "diff view materialized");

        DiffResultView {
            diff_count,
            row_count,
            view_values,
        }
    }

    /// Build one view per source of a finished chunked scan.
    ///
    /// Verdicts come from the scan's sparse maps; nothing is compared again.
    #[must_use]
    pub fn map_to_view(&self, result: &DiffResult) -> Vec<ViewResult> {
        result
            .sources
            .iter()
            .enumerate()
            .map(|(source_index, source)| {
                let mut widths = self.seed_widths(source_fields(source));
                let rows = source
                    .diff_rows()
                    .unwrap_or_default()
                    .iter()
                    .enumerate()
                    .map(|(row, cells)| {
                        for (column, cell) in cells.iter().enumerate() {
                            self.observe(&mut widths, column, &cell.to_text());
                        }
                        let mut flags = alloc::vec![false; cells.len()];
                        for &column in result.flagged_cells(source_index, row) {
                            if let Some(flag) = flags.get_mut(column) {
                                *flag = true;
                            }
                        }
                        ViewRow::new(row, cells, result.is_divergent(row), &flags)
                    })
                    .collect();
                self.finish_view(source, widths, rows)
            })
            .collect()
    }

    fn seed_widths(&self, fields: &[Field]) -> ColumnWidthTracker {
        ColumnWidthTracker::seed(
            fields,
            &self.measure,
            &self.options.header_font,
            self.options.header_padding,
        )
    }

    fn observe(&self, widths: &mut ColumnWidthTracker, column: usize, text: &str) {
        widths.observe(
            column,
            text,
            &self.measure,
            &self.options.row_font,
            self.options.cell_padding,
        );
    }

    fn finish_view(
        &self,
        source: &ResultSet,
        widths: ColumnWidthTracker,
        rows: Vec<ViewRow>,
    ) -> ViewResult {
        let fields = source_fields(source);
        let mut view = ViewResult {
            success: !source.is_failed(),
            columns: Vec::new(),
            rows: Vec::new(),
            error: source.error.clone(),
            rows_affected: source.rows_affected,
        };
        if fields.is_empty() {
            return view;
        }

        let row_number_width = self
            .measure
            .measure(&rows.len().to_string(), &self.options.header_font)
            .saturating_add(self.options.cell_padding);
        view.columns.reserve(fields.len() + 1);
        view.columns.push(ViewColumn {
            name: String::new(),
            id: ROW_NUMBER_COLUMN_ID.into(),
            width: row_number_width,
            sticky: Some(Sticky::Left),
        });
        view.columns.extend(
            fields
                .iter()
                .zip(widths.into_widths())
                .enumerate()
                .map(|(index, (field, width))| ViewColumn {
                    name: field.name.clone(),
                    id: index.to_string(),
                    width,
                    sticky: None,
                }),
        );
        view.rows = rows;
        view
    }
}

/// Fields a view renders: none for failed sources.
fn source_fields(source: &ResultSet) -> &[Field] {
    source.diff_fields().unwrap_or_default()
}
