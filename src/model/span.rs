//! Positioned text runs consumed by the classifier.

use serde::{Deserialize, Serialize};

/// One line-level run of text with font metadata and position.
///
/// Spans are produced once by a span source and read-only afterwards.
/// `y_position` is in PDF user space, which grows bottom-up: a larger value
/// means higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Text content of the line
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Font family name (e.g., "Helvetica-Bold")
    pub font_name: String,

    /// Effective font size in points
    pub font_size: f32,

    /// Whether the font is bold
    pub bold: bool,

    /// Whether the font is italic
    pub italic: bool,

    /// Baseline y coordinate in PDF user space
    pub y_position: f32,
}

impl TextSpan {
    /// Create a span with the given text, page, font name, and size.
    ///
    /// Style flags default to false and the position to 0.0; use the
    /// chaining helpers to set them.
    pub fn new(
        text: impl Into<String>,
        page: u32,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            text: text.into(),
            page,
            font_name: font_name.into(),
            font_size,
            bold: false,
            italic: false,
            y_position: 0.0,
        }
    }

    /// Mark the span bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the span italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the baseline y coordinate.
    pub fn at_y(mut self, y: f32) -> Self {
        self.y_position = y;
        self
    }
}
