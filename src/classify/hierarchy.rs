//! Outline ordering and level-consistency pass.
//!
//! Candidates arrive with provisional levels assigned in isolation. This
//! pass orders them by document position, drops running headers that
//! repeat across pages, caps level jumps at one step deeper than the last
//! emitted entry, and collapses consecutive duplicates.

use std::collections::{HashMap, HashSet};

use crate::classify::score::HeadingCandidate;
use crate::config::ScoringConfig;
use crate::model::{HeadingLevel, OutlineEntry};

/// Applies document-order hierarchy rules to scored candidates.
#[derive(Debug, Clone)]
pub struct HierarchyEnforcer {
    repeat_page_threshold: usize,
    band_count: u32,
}

impl HierarchyEnforcer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            repeat_page_threshold: config.repeat_page_threshold,
            band_count: config.band_count,
        }
    }

    /// Produce the final ordered outline from scored candidates.
    ///
    /// `page_height` locates the vertical band of each candidate for
    /// running-header detection.
    pub fn enforce(
        &self,
        mut candidates: Vec<HeadingCandidate>,
        page_height: f32,
    ) -> Vec<OutlineEntry> {
        // Document order: ascending page, top of page first. PDF y grows
        // upward, so larger y sorts earlier within a page.
        candidates.sort_by(|a, b| {
            a.span
                .page
                .cmp(&b.span.page)
                .then(b.span.y_position.total_cmp(&a.span.y_position))
        });

        let repeated = self.repeated_headers(&candidates, page_height);

        let mut entries: Vec<OutlineEntry> = Vec::new();
        let mut last_level: Option<HeadingLevel> = None;
        for candidate in candidates {
            let key = (
                candidate.span.text.clone(),
                self.band(candidate.span.y_position, page_height),
            );
            if repeated.contains(&key) {
                continue;
            }

            let level = match last_level {
                None => candidate.level,
                Some(prev) if candidate.level.depth() > prev.depth() + 1 => prev.deeper(),
                Some(_) => candidate.level,
            };

            if let Some(last) = entries.last() {
                if last.level == level && last.text == candidate.span.text {
                    continue;
                }
            }

            last_level = Some(level);
            entries.push(OutlineEntry::new(level, candidate.span.text, candidate.span.page));
        }
        entries
    }

    /// Text-and-band keys seen on enough distinct pages to count as a
    /// running header. Every occurrence of such a key is dropped.
    fn repeated_headers(
        &self,
        candidates: &[HeadingCandidate],
        page_height: f32,
    ) -> HashSet<(String, u32)> {
        let mut pages_by_key: HashMap<(String, u32), HashSet<u32>> = HashMap::new();
        for candidate in candidates {
            let key = (
                candidate.span.text.clone(),
                self.band(candidate.span.y_position, page_height),
            );
            pages_by_key.entry(key).or_default().insert(candidate.span.page);
        }
        pages_by_key
            .into_iter()
            .filter(|(_, pages)| pages.len() >= self.repeat_page_threshold)
            .map(|(key, _)| key)
            .collect()
    }

    fn band(&self, y: f32, page_height: f32) -> u32 {
        if page_height <= 0.0 {
            return 0;
        }
        let fraction = (y / page_height).clamp(0.0, 1.0);
        let band = (fraction * self.band_count as f32).floor() as u32;
        band.min(self.band_count.saturating_sub(1))
    }
}
