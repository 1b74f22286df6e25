//! Rendering options of the view materializer.

use alloc::string::String;

/// Font headers are measured in.
pub const DEFAULT_HEADER_FONT: &str = "700 14px monospace";
/// Font cells are measured in.
pub const DEFAULT_ROW_FONT: &str = "400 14px monospace";
/// Pixels added to a measured header (sort and resize affordances).
pub const DEFAULT_HEADER_PADDING: u32 = 40;
/// Pixels added to a measured cell.
pub const DEFAULT_CELL_PADDING: u32 = 41;

/// Fonts, paddings and ordering used when materializing views.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ViewOptions {
    /// CSS font shorthand for header text.
    pub header_font: String,
    /// CSS font shorthand for cell text.
    pub row_font: String,
    /// Added to every measured header width.
    pub header_padding: u32,
    /// Added to every measured cell width, and to the row-number column.
    pub cell_padding: u32,
    /// Sort each source's rows before diffing.
    pub sort_results: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            header_font: DEFAULT_HEADER_FONT.into(),
            row_font: DEFAULT_ROW_FONT.into(),
            header_padding: DEFAULT_HEADER_PADDING,
            cell_padding: DEFAULT_CELL_PADDING,
            sort_results: false,
        }
    }
}

impl ViewOptions {
    /// Set both fonts.
    #[must_use]
    pub fn with_fonts(mut self, header_font: impl Into<String>, row_font: impl Into<String>) -> Self {
        self.header_font = header_font.into();
        self.row_font = row_font.into();
        self
    }

    /// Set both paddings.
    #[must_use]
    pub fn with_padding(mut self, header_padding: u32, cell_padding: u32) -> Self {
        self.header_padding = header_padding;
        self.cell_padding = cell_padding;
        self
    }

    /// Sort rows before diffing.
    #[must_use]
    pub fn with_sort(mut self, sort_results: bool) -> Self {
        self.sort_results = sort_results;
        self
    }
}
