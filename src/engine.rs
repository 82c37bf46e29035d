//! Outline assembly pipeline.
//!
//! [`OutlineEngine`] runs the full sequence over one document: font
//! statistics, per-span scoring, hierarchy enforcement, title selection,
//! and metadata stamping. It works against any [`SpanSource`], so the
//! pipeline is testable without PDF bytes.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::classify::{
    select_title, title_from_filename, CandidateScorer, FontStats, HierarchyEnforcer,
};
use crate::config::ExtractOptions;
use crate::error::{Error, Result};
use crate::extract::{SpanPages, SpanSource};
use crate::model::{DocumentOutline, OutlineMetadata};

/// Turns extracted text spans into a [`DocumentOutline`].
#[derive(Debug, Clone, Default)]
pub struct OutlineEngine {
    options: ExtractOptions,
}

impl OutlineEngine {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract spans from `source` and assemble the outline.
    ///
    /// A document with no extractable text is not an error at this level:
    /// the result is an empty outline titled from `filename`.
    pub fn extract(&self, source: &dyn SpanSource, filename: &str) -> Result<DocumentOutline> {
        let started = Instant::now();
        let pages = source.extract(&self.options.limits)?;
        match self.assemble_at(&pages, filename, started) {
            Err(Error::EmptyDocument) => {
                log::debug!("no text spans extracted; falling back to filename title");
                Ok(self.empty_outline(&pages, filename, started))
            }
            other => other,
        }
    }

    /// Assemble an outline from already-extracted spans.
    ///
    /// Fails with [`Error::EmptyDocument`] when `pages` holds no spans;
    /// [`OutlineEngine::extract`] maps that case to an empty outline.
    pub fn assemble(&self, pages: &SpanPages, filename: &str) -> Result<DocumentOutline> {
        self.assemble_at(pages, filename, Instant::now())
    }

    fn assemble_at(
        &self,
        pages: &SpanPages,
        filename: &str,
        started: Instant,
    ) -> Result<DocumentOutline> {
        if pages.spans.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let stats = FontStats::from_spans(&pages.spans);
        let thresholds = stats.thresholds(&self.options.scoring);
        log::debug!(
            "font analysis: {} spans, body {:.1}pt, level minimums {:.1}/{:.1}/{:.1}",
            pages.spans.len(),
            thresholds.body_size,
            thresholds.h1_min,
            thresholds.h2_min,
            thresholds.h3_min
        );

        let (title, entries) = if thresholds.degenerate {
            log::debug!("single-size font distribution; no headings classified");
            (title_from_filename(filename), Vec::new())
        } else {
            let scorer = CandidateScorer::new(&self.options.scoring);
            let candidates: Vec<_> = pages
                .spans
                .iter()
                .filter_map(|span| scorer.classify(span, &thresholds))
                .collect();
            log::debug!(
                "{} heading candidates from {} spans",
                candidates.len(),
                pages.spans.len()
            );
            let enforcer = HierarchyEnforcer::new(&self.options.scoring);
            let entries = enforcer.enforce(candidates, pages.page_height);
            let title = select_title(&pages.spans, &scorer, &thresholds, filename);
            (title, entries)
        };

        Ok(DocumentOutline {
            title,
            outline: entries,
            metadata: OutlineMetadata {
                total_pages: pages.total_pages,
                processing_time_ms: elapsed_ms(started),
                truncated: pages.truncated,
                font_metrics: stats.profiles(),
            },
        })
    }

    fn empty_outline(&self, pages: &SpanPages, filename: &str, started: Instant) -> DocumentOutline {
        DocumentOutline {
            title: title_from_filename(filename),
            outline: Vec::new(),
            metadata: OutlineMetadata {
                total_pages: pages.total_pages,
                processing_time_ms: elapsed_ms(started),
                truncated: pages.truncated,
                font_metrics: BTreeMap::new(),
            },
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
