//! Heading classification pipeline.

mod fonts;
mod hierarchy;
mod score;
mod title;

pub use fonts::{FontStats, SizeThresholds};
pub use hierarchy::HierarchyEnforcer;
pub use score::{CandidateScorer, HeadingCandidate, ScoreBreakdown};
pub use title::{select_title, title_from_filename, UNTITLED};
