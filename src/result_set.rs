//! Query results as produced by one engine for one statement.
//!
//! A [`ResultSet`] is either a read (fields and rows), a write (an affected
//! row count) or a failure (an engine error). The differ never assumes fields
//! or rows are present: a failed source simply contributes no rows.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::value::Value;

/// A single result row, positionally aligned with the fields of its own
/// result set.
pub type Row = Vec<Value>;

/// Description of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Field {
    /// Column name as reported by the engine.
    pub name: String,
    /// Engine type name, opaque to the differ.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub type_name: Option<String>,
    /// Whether the engine reports the column as nullable.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub nullable: Option<bool>,
}

impl Field {
    /// Create a field with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            nullable: None,
        }
    }

    /// Set the engine type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the nullability flag.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An error reported by a database engine. Forwarded to the view untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceError {
    /// Human-readable message.
    pub message: String,
    /// Engine error code (`ORA-00942`, `42P01`, ...).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub code: Option<String>,
}

impl SourceError {
    /// Create an error with a message and no code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Attach an engine error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl core::error::Error for SourceError {}

/// The primary outcome of a result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<'a> {
    /// Rows were read.
    Read {
        /// Result columns.
        fields: &'a [Field],
        /// Result rows.
        rows: &'a [Row],
    },
    /// A write statement affected this many rows.
    Write(u64),
    /// The engine reported an error.
    Failed(&'a SourceError),
    /// Nothing was produced.
    Empty,
}

/// The result of running one statement against one engine.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ResultSet {
    /// Result columns, absent for failures and writes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Option<Vec<Field>>,
    /// Result rows, absent for failures and writes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rows: Option<Vec<Row>>,
    /// Engine error, if the statement failed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<SourceError>,
    /// Affected row count, for write statements.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rows_affected: Option<u64>,
}

impl ResultSet {
    /// A successful read.
    #[must_use]
    pub fn read(fields: Vec<Field>, rows: Vec<Row>) -> Self {
        Self {
            fields: Some(fields),
            rows: Some(rows),
            error: None,
            rows_affected: None,
        }
    }

    /// A successful write.
    #[must_use]
    pub fn write(rows_affected: u64) -> Self {
        Self {
            fields: Some(Vec::new()),
            rows: Some(Vec::new()),
            error: None,
            rows_affected: Some(rows_affected),
        }
    }

    /// A failed statement.
    #[must_use]
    pub fn failed(error: SourceError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// A result set with no fields, rows, count or error.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the primary outcome.
    ///
    /// An error wins over everything else, then an affected row count, then
    /// rows.
    #[must_use]
    pub fn outcome(&self) -> Outcome<'_> {
        if let Some(error) = &self.error {
            return Outcome::Failed(error);
        }
        if let Some(count) = self.rows_affected {
            return Outcome::Write(count);
        }
        match (&self.fields, &self.rows) {
            (None, None) => Outcome::Empty,
            (fields, rows) => Outcome::Read {
                fields: fields.as_deref().unwrap_or_default(),
                rows: rows.as_deref().unwrap_or_default(),
            },
        }
    }

    /// Whether the engine reported an error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The fields the differ aligns on, `None` for failed sources.
    #[must_use]
    pub fn diff_fields(&self) -> Option<&[Field]> {
        if self.is_failed() {
            return None;
        }
        self.fields.as_deref()
    }

    /// The rows the differ compares, `None` for failed sources.
    #[must_use]
    pub fn diff_rows(&self) -> Option<&[Row]> {
        if self.is_failed() {
            return None;
        }
        self.rows.as_deref()
    }

    /// The row at `index`, if this source has one to compare.
    #[must_use]
    pub fn diff_row(&self, index: usize) -> Option<&[Value]> {
        self.diff_rows()
            .and_then(|rows| rows.get(index))
            .map(Vec::as_slice)
    }

    /// Number of rows the differ will compare.
    #[must_use]
    pub fn diff_row_count(&self) -> usize {
        self.diff_rows().map_or(0, <[Row]>::len)
    }

    /// Sort the rows in place by their default string key.
    ///
    /// The key of a row is its cells' string forms joined by `,`, with
    /// `Null` contributing an empty string, compared by UTF-16 code units.
    /// The sort is stable. Rows whose cells stringify ambiguously (`10`
    /// against `"9"`) order by text, not by number.
    pub fn sort_rows(&mut self) {
        if let Some(rows) = &mut self.rows {
            rows.sort_by_cached_key(|row| row_sort_key(row));
        }
    }
}

/// Builds the default sort key of a row.
fn row_sort_key(row: &[Value]) -> Vec<u16> {
    let mut key = Vec::new();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            key.push(u16::from(b','));
        }
        key.extend(cell.to_sort_text().encode_utf16());
    }
    key
}

/// Compares two rows by their default sort key.
#[must_use]
pub fn compare_rows(a: &[Value], b: &[Value]) -> Ordering {
    row_sort_key(a).cmp(&row_sort_key(b))
}
