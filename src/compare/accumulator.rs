//! Reduction of row verdicts into aggregate diff state.
//!
//! [`DiffAccumulator`] is a pure reducer: [`DiffAccumulator::push`] folds one
//! verdict in and returns the new state, and [`DiffAccumulator::merge`]
//! combines the states of two disjoint row ranges. Merging is associative
//! with [`DiffAccumulator::default`] as identity, so chunks can be reduced in
//! any grouping.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use super::RowVerdict;

/// Sparse per-source divergence map: row index to the ascending column
/// indexes of that source's divergent cells in the row.
pub type DiffMap = BTreeMap<usize, Vec<usize>>;

/// Aggregate state of a diff pass over some rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffAccumulator {
    rows_compared: usize,
    divergent_rows: BTreeSet<usize>,
    diff_maps: Vec<DiffMap>,
}

impl DiffAccumulator {
    /// Create an empty accumulator for `source_count` sources.
    #[must_use]
    pub fn new(source_count: usize) -> Self {
        Self {
            rows_compared: 0,
            divergent_rows: BTreeSet::new(),
            diff_maps: alloc::vec![DiffMap::new(); source_count],
        }
    }

    /// Fold the verdict for row `row_index` into the state.
    #[must_use]
    pub fn push(mut self, row_index: usize, verdict: &RowVerdict) -> Self {
        self.rows_compared += 1;
        if !verdict.is_divergent() {
            return self;
        }
        self.divergent_rows.insert(row_index);
        if self.diff_maps.len() < verdict.source_count() {
            self.diff_maps
                .resize_with(verdict.source_count(), DiffMap::new);
        }
        for (source, diff_map) in self.diff_maps.iter_mut().enumerate() {
            let cells: Vec<usize> = verdict.flagged_cells(source).collect();
            if !cells.is_empty() {
                diff_map.insert(row_index, cells);
            }
        }
        self
    }

    /// Combine with the state of another, disjoint, row range.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.rows_compared += other.rows_compared;
        self.divergent_rows.extend(other.divergent_rows);
        if self.diff_maps.len() < other.diff_maps.len() {
            self.diff_maps.resize_with(other.diff_maps.len(), DiffMap::new);
        }
        for (mine, theirs) in self.diff_maps.iter_mut().zip(other.diff_maps) {
            for (row, mut cells) in theirs {
                let entry = mine.entry(row).or_default();
                entry.append(&mut cells);
                entry.sort_unstable();
                entry.dedup();
            }
        }
        self
    }

    /// Number of divergent rows.
    #[must_use]
    pub fn diff_row_count(&self) -> usize {
        self.divergent_rows.len()
    }

    /// Number of row positions folded in.
    #[must_use]
    pub fn rows_compared(&self) -> usize {
        self.rows_compared
    }

    /// Indexes of the divergent rows, ascending.
    #[must_use]
    pub fn divergent_rows(&self) -> &BTreeSet<usize> {
        &self.divergent_rows
    }

    /// Per-source sparse divergence maps.
    #[must_use]
    pub fn diff_maps(&self) -> &[DiffMap] {
        &self.diff_maps
    }

    /// Split into `(divergent rows, per-source maps)`.
    #[must_use]
    pub fn into_parts(self) -> (BTreeSet<usize>, Vec<DiffMap>) {
        (self.divergent_rows, self.diff_maps)
    }
}
