//! Integration tests for the classification components with custom
//! configuration.

use pdftoc::classify::{
    select_title, title_from_filename, CandidateScorer, FontStats, HeadingCandidate,
    HierarchyEnforcer,
};
use pdftoc::{HeadingLevel, ScoringConfig, TextSpan};

const PAGE_HEIGHT: f32 = 792.0;

/// 100 body spans at 12pt plus a few larger ones, enough for stable
/// thresholds (body 12, h1 18, h2 14, h3 13 under defaults).
fn reference_spans() -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for i in 0..100 {
        spans.push(TextSpan::new("body text", 1, "Helvetica", 12.0).at_y(700.0 - i as f32));
    }
    for _ in 0..5 {
        spans.push(TextSpan::new("large", 1, "Helvetica", 18.0));
    }
    for _ in 0..3 {
        spans.push(TextSpan::new("larger", 1, "Helvetica", 24.0));
    }
    spans
}

#[test]
fn test_score_cutoffs_are_configurable() {
    let spans = reference_spans();
    let span = TextSpan::new("2.1 Procedure", 1, "Helvetica", 14.0);

    let default_config = ScoringConfig::default();
    let thresholds = FontStats::from_spans(&spans).thresholds(&default_config);
    let scorer = CandidateScorer::new(&default_config);
    // pattern 2 + size 2 = 4: H1 under the default cutoffs.
    let candidate = scorer.classify(&span, &thresholds).unwrap();
    assert_eq!(candidate.score, 4);
    assert_eq!(candidate.level, HeadingLevel::H1);

    let strict = ScoringConfig::new().with_score_cutoffs(5, 4, 3);
    let thresholds = FontStats::from_spans(&spans).thresholds(&strict);
    let scorer = CandidateScorer::new(&strict);
    let candidate = scorer.classify(&span, &thresholds).unwrap();
    assert_eq!(candidate.level, HeadingLevel::H2);
}

#[test]
fn test_percentiles_are_configurable() {
    let spans = reference_spans();

    let config = ScoringConfig::new().with_percentiles(99.0, 95.0, 90.0);
    let thresholds = FontStats::from_spans(&spans).thresholds(&config);

    // p99 of the reference distribution is 24pt, p95 is 18pt.
    assert_eq!(thresholds.h1_min, 24.0);
    assert_eq!(thresholds.h2_min, 18.0);
    assert!(thresholds.h3_min >= 13.0);
}

#[test]
fn test_every_structural_keyword_scores() {
    let config = ScoringConfig::default();
    let scorer = CandidateScorer::new(&config);
    let keywords = [
        "Introduction",
        "Overview",
        "Background",
        "Summary",
        "Conclusion",
        "Conclusions",
        "Abstract",
        "References",
        "Bibliography",
        "Appendix",
        "Acknowledgments",
        "Acknowledgements",
        "Methodology",
        "Results",
        "Discussion",
        "Contents",
        "Glossary",
    ];
    for keyword in keywords {
        assert_eq!(scorer.pattern_score(keyword), 1, "keyword {keyword}");
        let with_colon = format!("{keyword}:");
        assert_eq!(scorer.pattern_score(&with_colon), 1, "keyword {with_colon}");
    }
    assert_eq!(scorer.pattern_score("Introductions"), 0);
}

#[test]
fn test_caps_word_cap_is_configurable() {
    let default_scorer = CandidateScorer::new(&ScoringConfig::default());
    assert_eq!(default_scorer.pattern_score("THREE WORD TITLE"), 1);

    let narrow = ScoringConfig::new().with_max_caps_words(2);
    let narrow_scorer = CandidateScorer::new(&narrow);
    assert_eq!(narrow_scorer.pattern_score("THREE WORD TITLE"), 0);
    assert_eq!(narrow_scorer.pattern_score("TWO WORDS"), 1);
}

#[test]
fn test_heading_length_cap_counts_chars_not_bytes() {
    let scorer = CandidateScorer::new(&ScoringConfig::default());
    // 200 two-byte characters stay under the 200-char cap.
    let exactly_200 = "é".repeat(200);
    assert!(!scorer.is_rejected(&exactly_200));
    let over = "é".repeat(201);
    assert!(scorer.is_rejected(&over));
}

#[test]
fn test_repeat_threshold_is_configurable() {
    let config = ScoringConfig::new().with_repeat_page_threshold(2);
    let enforcer = HierarchyEnforcer::new(&config);

    let header = |page: u32| HeadingCandidate {
        span: TextSpan::new("DRAFT COPY", page, "Helvetica-Bold", 14.0)
            .bold()
            .at_y(780.0),
        score: 4,
        level: HeadingLevel::H1,
    };
    let entries = enforcer.enforce(vec![header(1), header(2)], PAGE_HEIGHT);
    // Two pages already hit the lowered threshold.
    assert!(entries.is_empty());
}

#[test]
fn test_single_band_treats_whole_page_as_one_region() {
    let config = ScoringConfig::new().with_band_count(1);
    let enforcer = HierarchyEnforcer::new(&config);

    let at = |page: u32, y: f32| HeadingCandidate {
        span: TextSpan::new("Company Name", page, "Helvetica-Bold", 14.0)
            .bold()
            .at_y(y),
        score: 4,
        level: HeadingLevel::H1,
    };
    // Same text at scattered heights on three pages; with one band they
    // all collide and count as a running header.
    let entries = enforcer.enforce(vec![at(1, 780.0), at(2, 400.0), at(3, 100.0)], PAGE_HEIGHT);
    assert!(entries.is_empty());
}

#[test]
fn test_title_can_qualify_on_pattern_alone() {
    // Page 1 carries only body-sized text; the chapter line still
    // qualifies for the title through its pattern score.
    let spans = vec![
        TextSpan::new("Chapter 1: The Only Heading", 1, "Helvetica", 12.0).at_y(750.0),
        TextSpan::new("ordinary first line of text", 1, "Helvetica", 12.0).at_y(700.0),
        TextSpan::new("later body text", 2, "Helvetica", 12.0).at_y(700.0),
        TextSpan::new("more later body text", 2, "Helvetica", 12.0).at_y(680.0),
        TextSpan::new("Large Later Heading", 2, "Helvetica", 18.0).at_y(760.0),
        TextSpan::new("Another Large Heading", 2, "Helvetica", 18.0).at_y(400.0),
    ];
    let config = ScoringConfig::default();
    let thresholds = FontStats::from_spans(&spans).thresholds(&config);
    let scorer = CandidateScorer::new(&config);

    let title = select_title(&spans, &scorer, &thresholds, "flat.pdf");
    assert_eq!(title, "Chapter 1: The Only Heading");
}

#[test]
fn test_filename_title_table() {
    assert_eq!(title_from_filename("2024_Q3-report.pdf"), "2024 Q3 Report");
    assert_eq!(title_from_filename("résumé.pdf"), "Résumé");
    assert_eq!(title_from_filename("a.pdf"), "A");
    assert_eq!(
        title_from_filename("meeting minutes 2025.pdf"),
        "Meeting Minutes 2025"
    );
}
