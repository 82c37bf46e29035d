//! Text span extraction from PDF bytes.

mod lopdf_source;
mod source;

pub use lopdf_source::LopdfSource;
pub use source::{SpanPages, SpanSource};
