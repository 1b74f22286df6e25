#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;
// `arbitrary::Arbitrary` derive output references `::std`.
#[cfg(feature = "arbitrary")]
extern crate std;

pub mod column_map;
pub mod compare;
pub mod errors;
pub mod result_set;
pub mod run;
pub mod scan;
pub mod value;
pub mod view;
pub mod width;

// Re-export main types
pub use column_map::ColumnIndexMap;
pub use compare::{DiffAccumulator, DiffMap, RowVerdict, compare_row};
pub use result_set::{Field, Outcome, ResultSet, Row, SourceError};
pub use run::{DiffRun, PageOutcome, RunError, RunPolicy, RunSummary};
pub use scan::{ChunkResult, DiffResult, ScanDriver, ScanOptions, diff_all};
pub use value::{MISSING_CELL_TEXT, Value};
pub use view::{DiffResultView, Sticky, ViewColumn, ViewMaterializer, ViewOptions, ViewResult, ViewRow};
pub use width::{ColumnWidthTracker, MonospaceMeasure, TextMeasure};

// Re-export errors
pub use errors::Error;
