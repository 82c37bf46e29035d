//! Per-span heading scoring.
//!
//! Each span gets an additive score from three signals: text pattern
//! (0-2), font-size class (0-3), and bold style (0-1). The total maps to a
//! provisional level through the configured cutoffs; a total sitting
//! exactly on a cutoff resolves to the senior level.

use regex::Regex;

use crate::classify::fonts::SizeThresholds;
use crate::config::ScoringConfig;
use crate::model::{HeadingLevel, TextSpan};

/// Whole-line structural keywords, matched case-insensitively with an
/// optional trailing colon.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "introduction",
    "overview",
    "background",
    "summary",
    "conclusion",
    "conclusions",
    "abstract",
    "references",
    "bibliography",
    "appendix",
    "acknowledgments",
    "acknowledgements",
    "methodology",
    "results",
    "discussion",
    "contents",
    "glossary",
];

/// A span that scored high enough to be a heading, before hierarchy
/// correction.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// The underlying span
    pub span: TextSpan,
    /// Total score at classification time
    pub score: u32,
    /// Provisional level; the hierarchy pass may demote it
    pub level: HeadingLevel,
}

/// Score components for one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Pattern-rule score (0-2)
    pub pattern: u32,
    /// Font-size class score (0-3)
    pub size: u32,
    /// Style score (0-1)
    pub style: u32,
}

impl ScoreBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> u32 {
        self.pattern + self.size + self.style
    }
}

/// Scores spans against pattern, size, and style rules.
///
/// Compiles its regexes once at construction; build one scorer per
/// document (or share one, it is read-only after construction).
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    config: ScoringConfig,
    chapter_re: Regex,
    dotted_re: Regex,
    numbered_re: Regex,
    page_number_re: Regex,
}

impl CandidateScorer {
    /// Build a scorer from the given tuning.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
            // "Chapter 3", "Section 12", "Part 2" (case-insensitive)
            chapter_re: Regex::new(r"(?i)^(chapter|section|part)\s+\d+").unwrap(),
            // Dotted multi-level numbering: "2.1", "3.4.5 Title"
            dotted_re: Regex::new(r"^\d+(\.\d+)+\.?(\s+.*)?$").unwrap(),
            // Single-number headings: "1. Introduction", "2 Scope"
            numbered_re: Regex::new(r"^\d+\.?\s+\S+").unwrap(),
            // Bare page numbers: "14", "Page 7"
            page_number_re: Regex::new(r"^(?:\d+$|(?i:page)\s+\d+)").unwrap(),
        }
    }

    /// Whether the text is filtered out before scoring: blank, longer than
    /// the heading cap, or a page-number artifact.
    pub fn is_rejected(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return true;
        }
        if trimmed.chars().count() > self.config.max_heading_chars {
            return true;
        }
        self.page_number_re.is_match(trimmed)
    }

    /// Pattern score for the trimmed text. Rules are tried in priority
    /// order and only the single best match counts; sub-scores never stack.
    pub fn pattern_score(&self, text: &str) -> u32 {
        if self.chapter_re.is_match(text) {
            return 2;
        }
        if self.dotted_re.is_match(text) {
            return 2;
        }
        if self.numbered_re.is_match(text) {
            return 2;
        }
        if self.is_structural_keyword(text) {
            return 1;
        }
        if self.is_all_caps_line(text) {
            return 1;
        }
        0
    }

    /// Score components for a span, or `None` if a rejection filter fires.
    pub fn breakdown(&self, span: &TextSpan, thresholds: &SizeThresholds) -> Option<ScoreBreakdown> {
        if self.is_rejected(&span.text) {
            return None;
        }
        Some(ScoreBreakdown {
            pattern: self.pattern_score(span.text.trim()),
            size: thresholds.size_score(span.font_size),
            style: u32::from(span.bold),
        })
    }

    /// Map a total score to a provisional level.
    pub fn level_for(&self, total: u32) -> Option<HeadingLevel> {
        if total >= self.config.h1_cutoff {
            Some(HeadingLevel::H1)
        } else if total >= self.config.h2_cutoff {
            Some(HeadingLevel::H2)
        } else if total >= self.config.h3_cutoff {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }

    /// Full classification of one span: `None` when it is rejected or does
    /// not reach the H3 cutoff.
    pub fn classify(&self, span: &TextSpan, thresholds: &SizeThresholds) -> Option<HeadingCandidate> {
        let total = self.breakdown(span, thresholds)?.total();
        let level = self.level_for(total)?;
        Some(HeadingCandidate {
            span: span.clone(),
            score: total,
            level,
        })
    }

    fn is_structural_keyword(&self, text: &str) -> bool {
        let normalized = text.trim_end_matches(':').trim().to_lowercase();
        STRUCTURAL_KEYWORDS.contains(&normalized.as_str())
    }

    /// ALL-CAPS short line: letters and spaces only, no lowercase, at
    /// least three characters, at most `max_caps_words` words.
    fn is_all_caps_line(&self, text: &str) -> bool {
        let words = text.split_whitespace().count();
        if words == 0 || words > self.config.max_caps_words {
            return false;
        }
        if text.chars().count() < 3 {
            return false;
        }
        let mut has_letter = false;
        for ch in text.chars() {
            if ch.is_alphabetic() {
                if ch.is_lowercase() {
                    return false;
                }
                has_letter = true;
            } else if !ch.is_whitespace() {
                return false;
            }
        }
        has_letter
    }
}
