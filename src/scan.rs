//! Chunked N-way diff driver.
//!
//! [`ScanDriver`] compares any number of result sets positionally and yields
//! one [`ChunkResult`] per chunk of rows. The consumer pulls chunks at its own
//! pace, so a host event loop can render progress between chunks or drop the
//! driver to cancel. Chunk boundaries never affect verdicts: folding the
//! chunks with [`DiffAccumulator::merge`] gives the same state as a single
//! pass.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::ops::Range;

use crate::column_map::ColumnIndexMap;
use crate::compare::{DiffAccumulator, DiffMap, compare_row};
use crate::errors::Error;
use crate::result_set::ResultSet;
use crate::value::Value;

/// Default number of rows compared per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Configuration of a chunked scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ScanOptions {
    /// Rows compared per chunk. Must be at least one.
    pub chunk_size: usize,
    /// Sort every source's rows before aligning them.
    pub sort_before_diff: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sort_before_diff: false,
        }
    }
}

impl ScanOptions {
    /// Set the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sort rows before diffing.
    ///
    /// Results the engines returned in different orders can then be compared
    /// positionally. Rows are sorted independently per source; there is no
    /// key-based join.
    #[must_use]
    pub const fn with_sort(mut self, sort_before_diff: bool) -> Self {
        self.sort_before_diff = sort_before_diff;
        self
    }
}

/// Diff state of one chunk of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    /// Row positions covered by this chunk.
    pub range: Range<usize>,
    /// Verdicts of the rows in `range`, reduced.
    pub diff: DiffAccumulator,
}

/// Outcome of a full scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct DiffResult {
    /// Number of divergent rows across the whole scan.
    pub diff_row_count: usize,
    /// Number of row positions scanned: the longest source's row count.
    pub row_count: usize,
    /// The compared sources, sorted if sorting was requested.
    pub sources: Vec<ResultSet>,
    /// Per-source sparse divergence maps, `None` when nothing diverged.
    pub diff_maps: Option<Vec<DiffMap>>,
    /// Indexes of the divergent rows, ascending.
    pub divergent_rows: BTreeSet<usize>,
}

impl DiffResult {
    /// Whether every row matched.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.diff_row_count == 0
    }

    /// Whether row `row` diverged.
    #[must_use]
    pub fn is_divergent(&self, row: usize) -> bool {
        self.divergent_rows.contains(&row)
    }

    /// Divergent cell indexes of `source` in row `row`.
    #[must_use]
    pub fn flagged_cells(&self, source: usize, row: usize) -> &[usize] {
        self.diff_maps
            .as_ref()
            .and_then(|maps| maps.get(source))
            .and_then(|map| map.get(&row))
            .map_or(&[][..], Vec::as_slice)
    }
}

/// Pull-based chunked diff over N result sets.
///
/// # Example
///
/// ```
/// use result_diff_rs::{Field, ResultSet, ScanDriver, ScanOptions, Value};
///
/// let fields = || vec![Field::new("id")];
/// let ora = ResultSet::read(fields(), (0..5).map(|i| vec![Value::from(i)]).collect());
/// let pg = ResultSet::read(fields(), (0..4).map(|i| vec![Value::from(i)]).collect());
///
/// let mut scan = ScanDriver::new(vec![ora, pg], ScanOptions::default().with_chunk_size(2)).unwrap();
/// let mut ranges = Vec::new();
/// let mut acc = scan.accumulator();
/// for chunk in &mut scan {
///     ranges.push(chunk.range.clone());
///     acc = acc.merge(chunk.diff);
/// }
/// let result = scan.finish(acc);
///
/// assert_eq!(ranges, [0..2, 2..4, 4..5]);
/// assert_eq!(result.diff_row_count, 1);
/// assert!(result.is_divergent(4));
/// ```
#[derive(Debug, Clone)]
pub struct ScanDriver {
    sources: Vec<ResultSet>,
    columns: ColumnIndexMap,
    row_count: usize,
    next_row: usize,
    chunk_size: usize,
}

impl ScanDriver {
    /// Prepare a scan: sort if requested, align columns, size the scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] when `options.chunk_size` is zero.
    pub fn new(mut sources: Vec<ResultSet>, options: ScanOptions) -> Result<Self, Error> {
        if options.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        if options.sort_before_diff {
            for source in &mut sources {
                source.sort_rows();
            }
        }
        for (index, source) in sources.iter().enumerate() {
            if let Some(error) = &source.error {
                tracing::warn!(source = index, %error, "source failed, its rows are treated as missing");
            }
        }

        let columns = ColumnIndexMap::from_result_sets(&sources);
        let row_count = sources
            .iter()
            .map(ResultSet::diff_row_count)
            .max()
            .unwrap_or(0);
        tracing::debug!(
            sources = sources.len(),
            columns = columns.len(),
            rows = row_count,
            chunk_size = options.chunk_size,
            sorted = options.sort_before_diff,
            "starting result scan"
        );

        Ok(Self {
            sources,
            columns,
            row_count,
            next_row: 0,
            chunk_size: options.chunk_size,
        })
    }

    /// Number of sources being compared.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of row positions the scan covers.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of row positions already compared.
    #[must_use]
    pub fn rows_done(&self) -> usize {
        self.next_row
    }

    /// The column alignment used by this scan.
    #[must_use]
    pub fn columns(&self) -> &ColumnIndexMap {
        &self.columns
    }

    /// An empty accumulator sized for this scan's sources.
    #[must_use]
    pub fn accumulator(&self) -> DiffAccumulator {
        DiffAccumulator::new(self.sources.len())
    }

    /// Compare the rows in `range` without advancing the scan.
    #[must_use]
    pub fn diff_range(&self, range: Range<usize>) -> DiffAccumulator {
        let mut rows: Vec<Option<&[Value]>> = Vec::with_capacity(self.sources.len());
        range.fold(self.accumulator(), |acc, row| {
            rows.clear();
            rows.extend(self.sources.iter().map(|source| source.diff_row(row)));
            acc.push(row, &compare_row(&rows, &self.columns))
        })
    }

    /// Finish the scan, packaging the sources with the accumulated state.
    #[must_use]
    pub fn finish(self, diff: DiffAccumulator) -> DiffResult {
        let diff_row_count = diff.diff_row_count();
        let (divergent_rows, diff_maps) = diff.into_parts();
        tracing::debug!(
            rows = self.row_count,
            diff_rows = diff_row_count,
            "result scan finished"
        );
        DiffResult {
            diff_row_count,
            row_count: self.row_count,
            sources: self.sources,
            diff_maps: (diff_row_count > 0).then_some(diff_maps),
            divergent_rows,
        }
    }
}

impl Iterator for ScanDriver {
    type Item = ChunkResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.row_count {
            return None;
        }
        let end = self.row_count.min(self.next_row + self.chunk_size);
        let range = self.next_row..end;
        let diff = self.diff_range(range.clone());
        tracing::trace!(
            start = range.start,
            end = range.end,
            diff_rows = diff.diff_row_count(),
            "chunk compared"
        );
        self.next_row = end;
        Some(ChunkResult { range, diff })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.row_count - self.next_row).div_ceil(self.chunk_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScanDriver {}

/// Diff `sources` in one go, folding every chunk.
///
/// # Errors
///
/// Returns [`Error::InvalidChunkSize`] when `options.chunk_size` is zero.
pub fn diff_all(sources: Vec<ResultSet>, options: ScanOptions) -> Result<DiffResult, Error> {
    let mut scan = ScanDriver::new(sources, options)?;
    let mut diff = scan.accumulator();
    for chunk in &mut scan {
        diff = diff.merge(chunk.diff);
    }
    Ok(scan.finish(diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_set::{Field, SourceError};
    use alloc::vec;

    fn ids(n: i64) -> ResultSet {
        ResultSet::read(
            vec![Field::new("id")],
            (0..n).map(|i| vec![Value::from(i)]).collect(),
        )
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let err = ScanDriver::new(vec![ids(1), ids(1)], ScanOptions::default().with_chunk_size(0));
        assert_eq!(err.unwrap_err(), Error::InvalidChunkSize);
    }

    #[test]
    fn test_identical_sources_have_no_maps() {
        let result = diff_all(vec![ids(2500), ids(2500)], ScanOptions::default()).unwrap();
        assert_eq!(result.row_count, 2500);
        assert!(result.is_identical());
        assert!(result.diff_maps.is_none());
    }

    #[test]
    fn test_chunks_cover_every_row_once() {
        let scan = ScanDriver::new(vec![ids(2500), ids(10)], ScanOptions::default()).unwrap();
        assert_eq!(scan.len(), 3);
        let ranges: Vec<_> = scan.map(|chunk| chunk.range).collect();
        assert_eq!(ranges, [0..1000, 1000..2000, 2000..2500]);
    }

    #[test]
    fn test_chunk_size_does_not_change_result() {
        let mut b = ids(50);
        if let Some(rows) = &mut b.rows {
            rows[7][0] = Value::from("seven");
            rows.truncate(40);
        }
        let whole = diff_all(vec![ids(50), b.clone()], ScanOptions::default()).unwrap();
        let chunked = diff_all(
            vec![ids(50), b],
            ScanOptions::default().with_chunk_size(3),
        )
        .unwrap();
        assert_eq!(whole, chunked);
        assert_eq!(whole.diff_row_count, 11);
        assert_eq!(whole.flagged_cells(1, 7), [0]);
    }

    #[test]
    fn test_failed_source_makes_every_row_divergent() {
        let failed = ResultSet::failed(SourceError::new("ORA-00942"));
        let result = diff_all(vec![ids(3), failed], ScanOptions::default()).unwrap();
        assert_eq!(result.row_count, 3);
        assert_eq!(result.diff_row_count, 3);
        assert_eq!(result.flagged_cells(0, 2), [0]);
        assert!(result.flagged_cells(1, 2).is_empty());
    }

    #[test]
    fn test_sort_before_diff_aligns_reordered_rows() {
        let mut reversed = ids(5);
        if let Some(rows) = &mut reversed.rows {
            rows.reverse();
        }
        let unsorted = diff_all(vec![ids(5), reversed.clone()], ScanOptions::default()).unwrap();
        let sorted = diff_all(
            vec![ids(5), reversed],
            ScanOptions::default().with_sort(true),
        )
        .unwrap();
        assert_eq!(unsorted.diff_row_count, 4);
        assert_eq!(sorted.diff_row_count, 0);
        assert_eq!(unsorted.row_count, sorted.row_count);
    }

    #[test]
    fn test_no_sources() {
        let result = diff_all(Vec::new(), ScanOptions::default()).unwrap();
        assert_eq!(result.row_count, 0);
        assert!(result.is_identical());
    }
}
