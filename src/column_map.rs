//! Column alignment across result sources.
//!
//! Each source reports its own columns in its own order. [`ColumnIndexMap`]
//! resolves, for every distinct (case-folded) column name, the position of
//! that column in each source, or `None` where a source lacks it.
//!
//! # Disambiguation
//!
//! A source may report the same name twice (`SELECT a.x, b.x ...`). The
//! second occurrence would otherwise overwrite the first, so it is re-keyed
//! as `"<name>-<source index>"` and tracked as a separate column.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

use crate::result_set::{Field, ResultSet};

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// Per-source column positions of one aligned column.
pub type SourceIndexes = Vec<Option<usize>>;

/// Mapping from normalized column name to per-source column positions.
///
/// Keys iterate in insertion order: first-seen source first, then field
/// order. That order only drives display defaults, never diff verdicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndexMap {
    columns: IndexMap<String, SourceIndexes>,
    source_count: usize,
}

impl ColumnIndexMap {
    /// Build the map from one optional field list per source.
    ///
    /// Sources without a field list contribute nothing; their slot stays
    /// `None` in every entry.
    ///
    /// # Example
    ///
    /// ```
    /// use result_diff_rs::{ColumnIndexMap, Field};
    ///
    /// let ora = [Field::new("ID"), Field::new("NAME")];
    /// let pg = [Field::new("name"), Field::new("id"), Field::new("email")];
    /// let map = ColumnIndexMap::build(&[Some(&ora[..]), Some(&pg[..])]);
    ///
    /// assert_eq!(map.get("id"), Some(&[Some(0), Some(1)][..]));
    /// assert_eq!(map.get("email"), Some(&[None, Some(2)][..]));
    /// ```
    #[must_use]
    pub fn build(sources: &[Option<&[Field]>]) -> Self {
        let source_count = sources.len();
        let mut columns: IndexMap<String, SourceIndexes> = IndexMap::default();

        for (source, fields) in sources.iter().enumerate() {
            let Some(fields) = fields else {
                continue;
            };
            for (index, field) in fields.iter().enumerate() {
                let mut key = field.name.to_lowercase();
                let taken = columns
                    .get(&key)
                    .is_some_and(|indexes| indexes[source].is_some());
                if taken {
                    key = format!("{key}-{source}");
                }
                columns
                    .entry(key)
                    .or_insert_with(|| vec![None; source_count])[source] = Some(index);
            }
        }

        Self {
            columns,
            source_count,
        }
    }

    /// Build the map from the fields of each result set.
    ///
    /// Failed result sets contribute no columns.
    #[must_use]
    pub fn from_result_sets(sources: &[ResultSet]) -> Self {
        let fields: Vec<Option<&[Field]>> = sources.iter().map(ResultSet::diff_fields).collect();
        Self::build(&fields)
    }

    /// Number of sources each entry has a slot for.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Number of aligned columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no source reported any column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Per-source positions of the column with the given normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Option<usize>]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Iterate the normalized keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate `(key, per-source positions)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<usize>])> {
        self.columns
            .iter()
            .map(|(key, indexes)| (key.as_str(), indexes.as_slice()))
    }
}
