//! Benchmarks for outline extraction performance.
//!
//! Run with: cargo bench
//!
//! The engine benchmarks run over synthetic span sets, so they measure
//! classification throughput rather than PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdftoc::classify::{CandidateScorer, FontStats};
use pdftoc::{
    ExtractOptions, Limits, OutlineEngine, Result, ScoringConfig, SpanPages, SpanSource, TextSpan,
};

struct FixedSource {
    pages: SpanPages,
}

impl SpanSource for FixedSource {
    fn extract(&self, _limits: &Limits) -> Result<SpanPages> {
        Ok(self.pages.clone())
    }
}

/// Synthetic document: one chapter heading per page, a bold subheading
/// every tenth line, body text in between.
fn synthetic_spans(pages: u32, lines_per_page: u32) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for page in 1..=pages {
        spans.push(
            TextSpan::new(
                format!("Chapter {page}: Synthetic Section"),
                page,
                "Helvetica-Bold",
                24.0,
            )
            .bold()
            .at_y(750.0),
        );
        for line in 0..lines_per_page {
            let y = 720.0 - 14.0 * line as f32;
            if line % 10 == 5 {
                spans.push(
                    TextSpan::new(
                        format!("{page}.{line} Subtopic"),
                        page,
                        "Helvetica-Bold",
                        16.0,
                    )
                    .bold()
                    .at_y(y),
                );
            } else {
                spans.push(
                    TextSpan::new(
                        "body text line with ordinary words in it",
                        page,
                        "Helvetica",
                        12.0,
                    )
                    .at_y(y),
                );
            }
        }
    }
    spans
}

fn source_for(pages: u32, lines_per_page: u32) -> FixedSource {
    FixedSource {
        pages: SpanPages {
            total_pages: pages,
            page_height: 792.0,
            spans: synthetic_spans(pages, lines_per_page),
            truncated: false,
        },
    }
}

/// Benchmark the full pipeline at various document sizes.
fn bench_outline_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_extraction");

    for pages in [5u32, 25, 50] {
        let source = source_for(pages, 40);
        let engine = OutlineEngine::new(ExtractOptions::default());

        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| engine.extract(black_box(&source), "bench.pdf").unwrap());
        });
    }

    group.finish();
}

/// Benchmark font statistics and threshold computation alone.
fn bench_font_statistics(c: &mut Criterion) {
    let spans = synthetic_spans(25, 40);
    let config = ScoringConfig::default();

    c.bench_function("font_statistics", |b| {
        b.iter(|| {
            let stats = FontStats::from_spans(black_box(&spans));
            black_box(stats.thresholds(&config));
        });
    });
}

/// Benchmark per-span scoring with a prepared scorer.
fn bench_span_scoring(c: &mut Criterion) {
    let spans = synthetic_spans(10, 40);
    let config = ScoringConfig::default();
    let thresholds = FontStats::from_spans(&spans).thresholds(&config);
    let scorer = CandidateScorer::new(&config);

    c.bench_function("span_scoring", |b| {
        b.iter(|| {
            let candidates: usize = spans
                .iter()
                .filter_map(|span| scorer.classify(black_box(span), &thresholds))
                .count();
            black_box(candidates)
        });
    });
}

/// Benchmark PDF magic detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_header = b"%PDF-1.7\n% synthetic header bytes";
    let non_pdf = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdftoc::is_pdf_bytes(black_box(pdf_header)));
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| pdftoc::is_pdf_bytes(black_box(non_pdf)));
    });
}

criterion_group!(
    benches,
    bench_outline_extraction,
    bench_font_statistics,
    bench_span_scoring,
    bench_format_detection,
);
criterion_main!(benches);
