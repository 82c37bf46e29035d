//! Classification tuning and resource limits.
//!
//! The scoring heuristics rest on hand-tuned constants (percentile ranks,
//! point deltas, score cutoffs). They are kept here as named, overridable
//! fields rather than inlined literals so they can be re-tuned against a
//! labeled corpus without touching classifier code.

use std::time::Duration;

/// Default page cap; extraction reads at most this many pages.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Default file-size ceiling in bytes (50 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Tuning constants for heading scoring and hierarchy cleanup.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Percentile rank of the size distribution anchoring the H1 threshold
    pub h1_percentile: f64,
    /// Percentile rank anchoring the H2 threshold
    pub h2_percentile: f64,
    /// Percentile rank anchoring the H3 threshold
    pub h3_percentile: f64,

    /// Minimum point delta of H1 text above body size
    pub h1_size_delta: f32,
    /// Minimum point delta of H2 text above body size
    pub h2_size_delta: f32,
    /// Minimum point delta of H3 text above body size
    pub h3_size_delta: f32,

    /// Total score at or above which a candidate is H1
    pub h1_cutoff: u32,
    /// Total score at or above which a candidate is H2
    pub h2_cutoff: u32,
    /// Total score at or above which a candidate is H3
    pub h3_cutoff: u32,

    /// Maximum candidate text length; longer lines are body paragraphs
    pub max_heading_chars: usize,

    /// Maximum word count for the ALL-CAPS pattern rule
    pub max_caps_words: usize,

    /// Distinct-page count at which identical text in the same vertical
    /// band is treated as a running header or footer
    pub repeat_page_threshold: usize,

    /// Number of horizontal bands the page height is divided into for
    /// running-header detection
    pub band_count: u32,
}

impl ScoringConfig {
    /// Create a scoring configuration with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the percentile ranks for the H1/H2/H3 size thresholds.
    pub fn with_percentiles(mut self, h1: f64, h2: f64, h3: f64) -> Self {
        self.h1_percentile = h1;
        self.h2_percentile = h2;
        self.h3_percentile = h3;
        self
    }

    /// Set the minimum point deltas above body size per level.
    pub fn with_size_deltas(mut self, h1: f32, h2: f32, h3: f32) -> Self {
        self.h1_size_delta = h1;
        self.h2_size_delta = h2;
        self.h3_size_delta = h3;
        self
    }

    /// Set the total-score cutoffs per level.
    pub fn with_score_cutoffs(mut self, h1: u32, h2: u32, h3: u32) -> Self {
        self.h1_cutoff = h1;
        self.h2_cutoff = h2;
        self.h3_cutoff = h3;
        self
    }

    /// Set the maximum heading text length in characters.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the word cap for the ALL-CAPS pattern rule.
    pub fn with_max_caps_words(mut self, words: usize) -> Self {
        self.max_caps_words = words;
        self
    }

    /// Set the repeated-header page threshold.
    pub fn with_repeat_page_threshold(mut self, pages: usize) -> Self {
        self.repeat_page_threshold = pages;
        self
    }

    /// Set the vertical band count for running-header detection.
    pub fn with_band_count(mut self, bands: u32) -> Self {
        self.band_count = bands;
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            h1_percentile: 95.0,
            h2_percentile: 85.0,
            h3_percentile: 70.0,
            h1_size_delta: 4.0,
            h2_size_delta: 2.0,
            h3_size_delta: 1.0,
            h1_cutoff: 4,
            h2_cutoff: 3,
            h3_cutoff: 2,
            max_heading_chars: 200,
            max_caps_words: 8,
            repeat_page_threshold: 3,
            band_count: 20,
        }
    }
}

/// Resource ceilings enforced before and during span extraction.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Page cap; longer documents are read up to the cap and the result
    /// is marked truncated
    pub max_pages: u32,

    /// Maximum input size in bytes; larger inputs are rejected
    pub max_file_bytes: u64,

    /// Wall-clock budget per document. Extraction checks it between pages
    /// and stops early when exceeded; the result is marked truncated.
    pub time_budget: Option<Duration>,
}

impl Limits {
    /// Create limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the file-size ceiling in bytes.
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Set the wall-clock budget per document.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            time_budget: None,
        }
    }
}

/// Options for outline extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Scoring and hierarchy tuning
    pub scoring: ScoringConfig,

    /// Resource ceilings
    pub limits: Limits,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Replace the resource limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.limits.max_pages = pages;
        self
    }

    /// Set the wall-clock budget per document.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.limits.time_budget = Some(budget);
        self
    }
}
