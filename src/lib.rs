//! # pdftoc
//!
//! PDF outline extraction library for Rust.
//!
//! This library derives a structured outline from a PDF's visual
//! typography: a document title plus H1/H2/H3 headings with page numbers,
//! classified from font sizes, boldness, and text patterns. No bookmarks
//! or tagged structure are required.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftoc::extract_outline_from_file;
//!
//! fn main() -> pdftoc::Result<()> {
//!     let outline = extract_outline_from_file("document.pdf")?;
//!
//!     println!("{}", outline.title);
//!     for entry in &outline.outline {
//!         println!("{} {} (p. {})", entry.level, entry.text, entry.page);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Per-document thresholds**: body size and heading minimums computed
//!   from the font-size distribution, not hard-coded
//! - **Pattern scoring**: chapter/section numbering, structural keywords,
//!   ALL-CAPS lines
//! - **Hierarchy correction**: running-header removal, level-jump capping,
//!   duplicate collapsing
//! - **Title selection**: most prominent first-page line, with a cleaned
//!   filename as fallback
//! - **Batch mode**: Rayon worker pool across documents
//! - **Bounded processing**: page and file-size limits, optional wall-clock
//!   budget with partial results

pub mod batch;
pub mod classify;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;

// Re-export commonly used types
pub use config::{ExtractOptions, Limits, ScoringConfig};
pub use detect::{ensure_pdf, header_version, is_pdf_bytes};
pub use engine::OutlineEngine;
pub use error::{Error, Result};
pub use extract::{LopdfSource, SpanPages, SpanSource};
pub use model::{
    DocumentOutline, FontProfile, HeadingLevel, OutlineEntry, OutlineMetadata, TextSpan,
};

use std::path::Path;
use std::time::Duration;

/// Extract the outline of a PDF given as bytes.
///
/// `filename` seeds the fallback title for documents without a usable
/// first-page heading.
///
/// # Example
///
/// ```no_run
/// use pdftoc::extract_outline;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = extract_outline(&data, "document.pdf").unwrap();
/// println!("{} headings", outline.outline.len());
/// ```
pub fn extract_outline(data: &[u8], filename: &str) -> Result<DocumentOutline> {
    extract_outline_with_options(data, filename, &ExtractOptions::default())
}

/// Extract the outline of a PDF with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{extract_outline_with_options, ExtractOptions};
/// use std::time::Duration;
///
/// let options = ExtractOptions::new()
///     .with_max_pages(10)
///     .with_time_budget(Duration::from_secs(5));
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = extract_outline_with_options(&data, "document.pdf", &options).unwrap();
/// ```
pub fn extract_outline_with_options(
    data: &[u8],
    filename: &str,
    options: &ExtractOptions,
) -> Result<DocumentOutline> {
    let engine = OutlineEngine::new(options.clone());
    engine.extract(&LopdfSource::new(data), filename)
}

/// Extract the outline of a PDF file on disk.
///
/// The file name becomes the fallback title seed.
///
/// # Example
///
/// ```no_run
/// use pdftoc::extract_outline_from_file;
///
/// let outline = extract_outline_from_file("report.pdf").unwrap();
/// println!("{}", serde_json::to_string_pretty(&outline).unwrap());
/// ```
pub fn extract_outline_from_file<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("document"));
    extract_outline(&data, &filename)
}

/// Builder for outline extraction.
///
/// # Example
///
/// ```no_run
/// use pdftoc::Pdftoc;
/// use std::time::Duration;
///
/// let outline = Pdftoc::new()
///     .with_max_pages(25)
///     .with_time_budget(Duration::from_secs(10))
///     .extract_file("document.pdf")?;
/// # Ok::<(), pdftoc::Error>(())
/// ```
pub struct Pdftoc {
    options: ExtractOptions,
}

impl Pdftoc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Replace the scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.options = self.options.with_scoring(scoring);
        self
    }

    /// Cap the number of pages read.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.options = self.options.with_max_pages(max_pages);
        self
    }

    /// Cap the input file size in bytes.
    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.options.limits = self.options.limits.with_max_file_bytes(max_file_bytes);
        self
    }

    /// Set a wall-clock budget; extraction past it returns a truncated
    /// outline instead of failing.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.options = self.options.with_time_budget(budget);
        self
    }

    /// The options accumulated so far.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the outline of a file on disk.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("document"));
        self.extract_bytes(&data, &filename)
    }

    /// Extract the outline of in-memory PDF bytes.
    pub fn extract_bytes(&self, data: &[u8], filename: &str) -> Result<DocumentOutline> {
        extract_outline_with_options(data, filename, &self.options)
    }
}

impl Default for Pdftoc {
    fn default() -> Self {
        Self::new()
    }
}
