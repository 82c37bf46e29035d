//! Font statistics and size thresholds.
//!
//! One pass over all of a document's spans yields two things: per-font
//! [`FontProfile`]s for the result metadata, and [`SizeThresholds`] for the
//! scorer. The modal font size is taken as the body-text baseline; the
//! per-level minimums anchor to both a percentile of the size distribution
//! and an absolute delta above the body size, so documents with few
//! distinct sizes still separate headings from body text.

use std::collections::{BTreeMap, HashMap};

use crate::config::ScoringConfig;
use crate::model::{FontProfile, TextSpan};

/// Size buckets are a tenth of a point wide.
const SIZE_BUCKET_SCALE: f32 = 10.0;

/// Per-document font-size thresholds, computed once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeThresholds {
    /// Modal font size, the body-text baseline
    pub body_size: f32,
    /// Minimum size for the H1 size class
    pub h1_min: f32,
    /// Minimum size for the H2 size class
    pub h2_min: f32,
    /// Minimum size for the H3 size class
    pub h3_min: f32,
    /// True when the document has a single size bucket. Size carries no
    /// signal then; the engine emits no entries for such documents.
    pub degenerate: bool,
}

impl SizeThresholds {
    /// Size-class score for a font size: 3 at or above `h1_min` down to 0
    /// below `h3_min`. Always 0 for degenerate documents, where no size
    /// stands out from the body text.
    pub fn size_score(&self, size: f32) -> u32 {
        if self.degenerate {
            return 0;
        }
        if size >= self.h1_min {
            3
        } else if size >= self.h2_min {
            2
        } else if size >= self.h3_min {
            1
        } else {
            0
        }
    }
}

fn bucket(size: f32) -> i32 {
    (size * SIZE_BUCKET_SCALE).round() as i32
}

fn bucket_size(bucket: i32) -> f32 {
    bucket as f32 / SIZE_BUCKET_SCALE
}

#[derive(Debug, Clone, Default)]
struct FontAccum {
    sum: f64,
    min: f32,
    max: f32,
    count: u32,
}

/// Accumulates font observations across a whole document.
#[derive(Debug, Clone, Default)]
pub struct FontStats {
    sizes: Vec<f32>,
    histogram: HashMap<i32, u32>,
    fonts: HashMap<String, FontAccum>,
}

impl FontStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics from a span slice in one pass.
    pub fn from_spans(spans: &[TextSpan]) -> Self {
        let mut stats = Self::new();
        for span in spans {
            stats.observe(span);
        }
        stats
    }

    /// Record one span.
    pub fn observe(&mut self, span: &TextSpan) {
        self.sizes.push(span.font_size);
        *self.histogram.entry(bucket(span.font_size)).or_insert(0) += 1;

        let accum = self
            .fonts
            .entry(span.font_name.clone())
            .or_insert_with(|| FontAccum {
                sum: 0.0,
                min: f32::MAX,
                max: f32::MIN,
                count: 0,
            });
        accum.sum += span.font_size as f64;
        accum.min = accum.min.min(span.font_size);
        accum.max = accum.max.max(span.font_size);
        accum.count += 1;
    }

    /// Whether no spans have been observed.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// The modal font size. Ties resolve to the smaller size so the body
    /// baseline never drifts upward on ambiguous documents.
    pub fn body_size(&self) -> f32 {
        let mut best: Option<(i32, u32)> = None;
        for (&b, &count) in &self.histogram {
            best = match best {
                None => Some((b, count)),
                Some((best_b, best_count)) => {
                    if count > best_count || (count == best_count && b < best_b) {
                        Some((b, count))
                    } else {
                        Some((best_b, best_count))
                    }
                }
            };
        }
        best.map(|(b, _)| bucket_size(b)).unwrap_or(0.0)
    }

    /// Derive the per-level size thresholds.
    pub fn thresholds(&self, config: &ScoringConfig) -> SizeThresholds {
        let body_size = self.body_size();

        if self.histogram.len() <= 1 {
            // A single size everywhere: thresholds collapse to the body
            // size and the size class carries no signal.
            return SizeThresholds {
                body_size,
                h1_min: body_size,
                h2_min: body_size,
                h3_min: body_size,
                degenerate: true,
            };
        }

        let mut sorted = self.sizes.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let h1 = percentile(&sorted, config.h1_percentile).max(body_size + config.h1_size_delta);
        let h2 = percentile(&sorted, config.h2_percentile).max(body_size + config.h2_size_delta);
        let h3 = percentile(&sorted, config.h3_percentile).max(body_size + config.h3_size_delta);

        // Enforce h1 >= h2 >= h3 >= body. A violated pair collapses to
        // equality; the order is never inverted.
        let h3_min = h3.max(body_size);
        let h2_min = h2.max(h3_min);
        let h1_min = h1.max(h2_min);

        SizeThresholds {
            body_size,
            h1_min,
            h2_min,
            h3_min,
            degenerate: false,
        }
    }

    /// Per-font profiles for the result metadata, deterministically ordered.
    pub fn profiles(&self) -> BTreeMap<String, FontProfile> {
        self.fonts
            .iter()
            .map(|(name, accum)| {
                let avg = (accum.sum / accum.count.max(1) as f64) as f32;
                (
                    name.clone(),
                    FontProfile {
                        avg_size: avg.clamp(accum.min, accum.max),
                        max_size: accum.max,
                        min_size: accum.min,
                        count: accum.count,
                    },
                )
            })
            .collect()
    }
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[f32], rank: f64) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((rank / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
