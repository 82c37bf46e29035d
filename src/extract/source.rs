//! The span source seam.
//!
//! Everything downstream of extraction (statistics, scoring, hierarchy,
//! title selection) consumes positioned [`TextSpan`]s and never touches PDF
//! bytes. Implementing [`SpanSource`] is all it takes to feed the engine
//! from a different parser, or from fixtures in tests.

use crate::config::Limits;
use crate::error::Result;
use crate::model::TextSpan;

/// The spans of one document, in document order.
#[derive(Debug, Clone)]
pub struct SpanPages {
    /// Total pages in the document, regardless of how many were read
    pub total_pages: u32,

    /// Page height in PDF user-space units, for relative positioning.
    /// Taken from the first page; 792.0 (US Letter) when unknown.
    pub page_height: f32,

    /// Line-level spans ordered by page, then top-down within a page
    pub spans: Vec<TextSpan>,

    /// True when not every page was read, because the page cap or the
    /// time budget cut extraction short
    pub truncated: bool,
}

/// A producer of positioned text spans for one document.
pub trait SpanSource {
    /// Extract all spans, honoring the given limits.
    ///
    /// The file-size ceiling rejects the document before any page is
    /// read. The page cap and the time budget truncate instead: the
    /// result carries the spans gathered so far with `truncated` set.
    /// Unreadable input fails with an error for which
    /// [`crate::Error::is_unreadable`] returns true.
    fn extract(&self, limits: &Limits) -> Result<SpanPages>;
}
