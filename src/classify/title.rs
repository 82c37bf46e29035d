//! Document title selection.
//!
//! The title is the most prominent qualifying line on the first page. A
//! line qualifies when it passes the rejection filters and shows at least
//! one positive signal (pattern or size). Documents with no qualifying
//! line fall back to a cleaned-up form of the filename.

use std::path::Path;

use crate::classify::fonts::SizeThresholds;
use crate::classify::score::CandidateScorer;
use crate::model::TextSpan;

/// Title used when neither the first page nor the filename yields one.
pub const UNTITLED: &str = "Untitled Document";

/// Pick the document title from first-page spans, falling back to the
/// filename when nothing qualifies.
///
/// Prominence is largest font size first; a size tie goes to the span
/// nearest the top of the page.
pub fn select_title(
    spans: &[TextSpan],
    scorer: &CandidateScorer,
    thresholds: &SizeThresholds,
    filename: &str,
) -> String {
    let mut best: Option<&TextSpan> = None;
    for span in spans.iter().filter(|s| s.page == 1) {
        let breakdown = match scorer.breakdown(span, thresholds) {
            Some(b) => b,
            None => continue,
        };
        if breakdown.pattern == 0 && breakdown.size == 0 {
            continue;
        }
        best = match best {
            None => Some(span),
            Some(current) => {
                let bigger = span.font_size > current.font_size;
                let same_size_higher = span.font_size == current.font_size
                    && span.y_position > current.y_position;
                if bigger || same_size_higher {
                    Some(span)
                } else {
                    Some(current)
                }
            }
        };
    }

    match best {
        Some(span) => span.text.clone(),
        None => title_from_filename(filename),
    }
}

/// Derive a display title from a file name: strip the extension, turn
/// separators into spaces, Title Case each word.
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let cleaned = stem.replace(['_', '-'], " ");
    let title = cleaned
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fonts::FontStats;
    use crate::config::ScoringConfig;

    fn setup() -> (CandidateScorer, SizeThresholds) {
        let config = ScoringConfig::default();
        let mut spans = Vec::new();
        for _ in 0..50 {
            spans.push(TextSpan::new("body", 1, "Helvetica", 12.0));
        }
        for _ in 0..4 {
            spans.push(TextSpan::new("head", 1, "Helvetica", 18.0));
        }
        let thresholds = FontStats::from_spans(&spans).thresholds(&config);
        (CandidateScorer::new(&config), thresholds)
    }

    #[test]
    fn test_largest_first_page_span_wins() {
        let (scorer, thresholds) = setup();
        let spans = vec![
            TextSpan::new("Subtitle text", 1, "Helvetica", 18.0).at_y(650.0),
            TextSpan::new("The Big Title", 1, "Helvetica-Bold", 28.0)
                .bold()
                .at_y(700.0),
            TextSpan::new("Body paragraph starts here with detail.", 1, "Helvetica", 12.0)
                .at_y(600.0),
        ];
        let title = select_title(&spans, &scorer, &thresholds, "input.pdf");
        assert_eq!(title, "The Big Title");
    }

    #[test]
    fn test_size_tie_goes_to_topmost() {
        let (scorer, thresholds) = setup();
        let spans = vec![
            TextSpan::new("Lower banner", 1, "Helvetica", 24.0).at_y(500.0),
            TextSpan::new("Upper banner", 1, "Helvetica", 24.0).at_y(720.0),
        ];
        let title = select_title(&spans, &scorer, &thresholds, "input.pdf");
        assert_eq!(title, "Upper banner");
    }

    #[test]
    fn test_later_pages_ignored() {
        let (scorer, thresholds) = setup();
        let spans = vec![
            TextSpan::new("Modest Heading", 1, "Helvetica", 18.0).at_y(700.0),
            TextSpan::new("Huge But Page Two", 2, "Helvetica", 40.0).at_y(700.0),
        ];
        let title = select_title(&spans, &scorer, &thresholds, "input.pdf");
        assert_eq!(title, "Modest Heading");
    }

    #[test]
    fn test_rejected_spans_never_title() {
        let (scorer, thresholds) = setup();
        // A giant page number is still a page number.
        let spans = vec![TextSpan::new("14", 1, "Helvetica", 36.0).at_y(700.0)];
        let title = select_title(&spans, &scorer, &thresholds, "report.pdf");
        assert_eq!(title, "Report");
    }

    #[test]
    fn test_body_sized_unpatterned_text_never_title() {
        let (scorer, thresholds) = setup();
        let spans = vec![
            TextSpan::new("Just some opening words on the page.", 1, "Helvetica", 12.0).at_y(700.0),
        ];
        let title = select_title(&spans, &scorer, &thresholds, "quarterly_results.pdf");
        assert_eq!(title, "Quarterly Results");
    }

    #[test]
    fn test_filename_cleanup() {
        assert_eq!(title_from_filename("my_report-v2.pdf"), "My Report V2");
        assert_eq!(title_from_filename("ANNUAL_REPORT.PDF"), "Annual Report");
        assert_eq!(title_from_filename("/tmp/docs/white paper.pdf"), "White Paper");
        assert_eq!(title_from_filename("notes"), "Notes");
    }

    #[test]
    fn test_degenerate_filenames_fall_back_to_untitled() {
        assert_eq!(title_from_filename(""), UNTITLED);
        assert_eq!(title_from_filename("___.pdf"), UNTITLED);
        assert_eq!(title_from_filename("--"), UNTITLED);
    }
}
