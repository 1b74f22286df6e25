//! Column display widths.
//!
//! Widths are seeded from the header text and grow as wider cells are
//! observed during the same diff pass; they never shrink within a pass and a
//! new tracker is seeded for every pass. Pixel measurement itself belongs to
//! the host (a canvas, a font rasterizer, a terminal) and is reached through
//! [`TextMeasure`].

use alloc::vec::Vec;

use crate::result_set::Field;

/// Pixel width of a string rendered in a font.
///
/// Implemented for any `Fn(&str, &str) -> u32`, so a closure wrapping the
/// host's text metrics is enough.
pub trait TextMeasure {
    /// Width in pixels of `text` rendered in `font` (a CSS font shorthand
    /// such as `"700 14px monospace"`).
    fn measure(&self, text: &str, font: &str) -> u32;
}

impl<F: Fn(&str, &str) -> u32> TextMeasure for F {
    #[inline]
    fn measure(&self, text: &str, font: &str) -> u32 {
        self(text, font)
    }
}

/// Measures every character as the same fixed width, ignoring the font.
///
/// Matches monospace rendering and keeps tests independent of any host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance width of one character, in pixels.
    pub char_width: f32,
}

impl MonospaceMeasure {
    /// Create a measure with the given per-character advance.
    #[must_use]
    pub const fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl Default for MonospaceMeasure {
    /// 14px monospace advances roughly 8.4px per character.
    fn default() -> Self {
        Self::new(8.4)
    }
}

impl TextMeasure for MonospaceMeasure {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn measure(&self, text: &str, _font: &str) -> u32 {
        let chars = text.chars().count() as f32;
        // ceil without std
        let width = chars * self.char_width;
        let whole = width as u32;
        if (whole as f32) < width {
            whole.saturating_add(1)
        } else {
            whole
        }
    }
}

/// Running per-column widths of one source for one diff pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnWidthTracker {
    widths: Vec<u32>,
}

impl ColumnWidthTracker {
    /// Seed one width per field from its header text.
    pub fn seed<M: TextMeasure + ?Sized>(
        fields: &[Field],
        measure: &M,
        header_font: &str,
        header_padding: u32,
    ) -> Self {
        Self {
            widths: fields
                .iter()
                .map(|field| {
                    measure
                        .measure(&field.name, header_font)
                        .saturating_add(header_padding)
                })
                .collect(),
        }
    }

    /// Widen `column` to fit `text` if it is wider than the current width.
    ///
    /// Columns beyond the seeded ones (ragged rows) are ignored.
    pub fn observe<M: TextMeasure + ?Sized>(
        &mut self,
        column: usize,
        text: &str,
        measure: &M,
        row_font: &str,
        cell_padding: u32,
    ) {
        if let Some(width) = self.widths.get_mut(column) {
            let needed = measure.measure(text, row_font).saturating_add(cell_padding);
            *width = (*width).max(needed);
        }
    }

    /// Current width of `column`.
    #[must_use]
    pub fn width(&self, column: usize) -> Option<u32> {
        self.widths.get(column).copied()
    }

    /// Current widths, one per seeded column.
    #[must_use]
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Consume the tracker, returning the final widths.
    #[must_use]
    pub fn into_widths(self) -> Vec<u32> {
        self.widths
    }
}
