//! Cell values and their string form.
//!
//! Result sets coming from different engines disagree on types (Oracle
//! `NUMBER` against Postgres `numeric`, `DATE` against `timestamp`, ...), so the
//! differ never compares values by type. Every cell is reduced to its *string
//! form* and two cells are equal exactly when their string forms are equal:
//!
//! | Value | String form |
//! |-------|-------------|
//! | `Null` | `null` |
//! | `Bool(true)` | `true` |
//! | `Integer(42)` | `42` |
//! | `Real(1.5)` | `1.5` |
//! | `Real(1e21)` | `1e+21` |
//! | `Real(1e-7)` | `1e-7` |
//! | `Real(NaN)` | `NaN` |
//! | `Text("42")` | `42` |
//! | absent cell | `undefined` |

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use core::num::FpCategory;

/// String form of a cell that does not exist: the column is missing from the
/// source, or the source has no row at this position.
pub const MISSING_CELL_TEXT: &str = "undefined";

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Floating point
    Real(f64),
    /// Text, including dates and numbers the engine already rendered
    Text(String),
}

impl Value {
    /// Returns the string form used for comparison and width measurement.
    ///
    /// Text borrows; every other variant allocates.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Integer(i) => Cow::Owned(i.to_string()),
            Value::Real(f) => Cow::Owned(real_to_text(*f)),
        }
    }

    /// Returns the text used when this value is part of a row sort key.
    ///
    /// Identical to [`Value::to_text`] except that `Null` contributes nothing.
    pub(crate) fn to_sort_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            other => other.to_text(),
        }
    }

    /// Check if the value is Null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Returns the string form of an optional cell, with the missing-cell
/// sentinel standing in for `None`.
#[must_use]
pub fn cell_text(cell: Option<&Value>) -> Cow<'_, str> {
    cell.map_or(Cow::Borrowed(MISSING_CELL_TEXT), Value::to_text)
}

fn real_to_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".into()
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            "Infinity".into()
        } else {
            "-Infinity".into()
        }
    } else if f.classify() == FpCategory::Zero {
        // covers -0.0
        "0".into()
    } else if f >= 1e21 || f <= -1e21 || (f > -1e-6 && f < 1e-6) {
        exponent_text(f)
    } else {
        f.to_string()
    }
}

/// Shortest exponent form with an explicit sign on the exponent: `1e+21`,
/// `1.5e-10`.
fn exponent_text(f: f64) -> String {
    let mut text = format!("{f:e}");
    match text.find('e') {
        Some(e) if !text[e + 1..].starts_with('-') => text.insert(e + 1, '+'),
        _ => {}
    }
    text
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Real(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_forms() {
        assert_eq!(Value::Null.to_text(), "null");
        assert_eq!(Value::Bool(false).to_text(), "false");
        assert_eq!(Value::Integer(-7).to_text(), "-7");
        assert_eq!(Value::Real(1.5).to_text(), "1.5");
        assert_eq!(Value::Real(2.0).to_text(), "2");
        assert_eq!(Value::Real(-0.0).to_text(), "0");
        assert_eq!(Value::Real(f64::NAN).to_text(), "NaN");
        assert_eq!(Value::Real(f64::NEG_INFINITY).to_text(), "-Infinity");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_extreme_reals_use_exponent_form() {
        assert_eq!(Value::Real(1e21).to_text(), "1e+21");
        assert_eq!(Value::Real(-2.5e22).to_text(), "-2.5e+22");
        assert_eq!(Value::Real(1e-7).to_text(), "1e-7");
        assert_eq!(Value::Real(1.5e-10).to_text(), "1.5e-10");
        assert_eq!(Value::Real(1e20).to_text(), "100000000000000000000");
        assert_eq!(Value::Real(0.000_001).to_text(), "0.000001");
        assert_eq!(Value::Real(1e-7).to_sort_text(), "1e-7");
    }

    #[test]
    fn test_number_and_text_share_string_form() {
        assert_eq!(Value::Integer(42).to_text(), Value::from("42").to_text());
        assert_eq!(Value::Real(42.0).to_text(), Value::Integer(42).to_text());
        assert_ne!(Value::from("1.0").to_text(), Value::Integer(1).to_text());
    }

    #[test]
    fn test_missing_cell_sentinel() {
        assert_eq!(cell_text(None), MISSING_CELL_TEXT);
        assert_eq!(cell_text(Some(&Value::Null)), "null");
    }

    #[test]
    fn test_sort_text_drops_null() {
        assert_eq!(Value::Null.to_sort_text(), "");
        assert_eq!(Value::Integer(3).to_sort_text(), "3");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
