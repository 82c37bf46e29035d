//! Data model for outline extraction.
//!
//! `TextSpan` is the input side: positioned text runs handed over by a span
//! source. `DocumentOutline` and its parts are the output side, carrying
//! the externally visible serialization contract.

mod outline;
mod span;

pub use outline::{DocumentOutline, FontProfile, HeadingLevel, OutlineEntry, OutlineMetadata};
pub use span::TextSpan;
