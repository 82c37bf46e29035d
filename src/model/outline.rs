//! Outline result types and their serialization contract.
//!
//! The JSON shape produced here is consumed by downstream document
//! pipelines and is fixed: top-level metadata keys are camelCase while the
//! per-font metric keys are snake_case. Both casings are part of the
//! published contract and must not be "cleaned up".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Heading nesting level. `H1` is the most senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Nesting depth: 1 for H1 through 3 for H3.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// The level one step deeper, saturating at H3.
    pub fn deeper(self) -> HeadingLevel {
        match self {
            HeadingLevel::H1 => HeadingLevel::H2,
            HeadingLevel::H2 => HeadingLevel::H3,
            HeadingLevel::H3 => HeadingLevel::H3,
        }
    }

    /// The level's wire name ("H1", "H2", "H3").
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified heading in the final outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,

    /// Trimmed heading text, never empty
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Aggregated size statistics for one font family.
///
/// Invariant: `min_size <= avg_size <= max_size` and `count >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontProfile {
    /// Mean observed size in points
    pub avg_size: f32,

    /// Largest observed size
    pub max_size: f32,

    /// Smallest observed size
    pub min_size: f32,

    /// Number of spans observed with this font
    pub count: u32,
}

/// Processing metadata attached to every outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineMetadata {
    /// Total pages in the document
    pub total_pages: u32,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f64,

    /// Whether the outline covers fewer pages than the document has
    /// because the time budget ran out
    pub truncated: bool,

    /// Per-font size statistics, keyed by font name.
    ///
    /// A `BTreeMap` keeps serialization order deterministic, so identical
    /// input always yields identical output bytes.
    pub font_metrics: BTreeMap<String, FontProfile>,
}

/// The complete result of outline extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title
    pub title: String,

    /// Ordered heading entries
    pub outline: Vec<OutlineEntry>,

    /// Processing metadata
    pub metadata: OutlineMetadata,
}

impl DocumentOutline {
    /// Whether the outline has no heading entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of heading entries.
    pub fn len(&self) -> usize {
        self.outline.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_depth_and_deeper() {
        assert_eq!(HeadingLevel::H1.depth(), 1);
        assert_eq!(HeadingLevel::H3.depth(), 3);
        assert_eq!(HeadingLevel::H1.deeper(), HeadingLevel::H2);
        assert_eq!(HeadingLevel::H3.deeper(), HeadingLevel::H3);
        assert!(HeadingLevel::H1 < HeadingLevel::H2);
    }

    #[test]
    fn test_level_serializes_as_wire_name() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
    }

    #[test]
    fn test_serialization_contract() {
        let mut font_metrics = BTreeMap::new();
        font_metrics.insert(
            "Helvetica-Bold".to_string(),
            FontProfile {
                avg_size: 18.0,
                max_size: 24.0,
                min_size: 14.0,
                count: 12,
            },
        );
        let outline = DocumentOutline {
            title: "Sample".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, "Introduction", 1)],
            metadata: OutlineMetadata {
                total_pages: 5,
                processing_time_ms: 12.5,
                truncated: false,
                font_metrics,
            },
        };

        let value = serde_json::to_value(&outline).unwrap();

        // Top-level keys.
        assert!(value.get("title").is_some());
        assert!(value.get("outline").is_some());
        let meta = value.get("metadata").unwrap();

        // Metadata keys are camelCase.
        assert_eq!(meta.get("totalPages").unwrap(), 5);
        assert_eq!(meta.get("processingTimeMs").unwrap(), 12.5);
        assert_eq!(meta.get("truncated").unwrap(), false);
        let fonts = meta.get("fontMetrics").unwrap();

        // Per-font keys are snake_case.
        let profile = fonts.get("Helvetica-Bold").unwrap();
        assert_eq!(profile.get("avg_size").unwrap(), 18.0);
        assert_eq!(profile.get("max_size").unwrap(), 24.0);
        assert_eq!(profile.get("min_size").unwrap(), 14.0);
        assert_eq!(profile.get("count").unwrap(), 12);

        // Entry keys.
        let entry = &value["outline"][0];
        assert_eq!(entry.get("level").unwrap(), "H1");
        assert_eq!(entry.get("text").unwrap(), "Introduction");
        assert_eq!(entry.get("page").unwrap(), 1);
    }

    #[test]
    fn test_font_metrics_order_deterministic() {
        let mut font_metrics = BTreeMap::new();
        font_metrics.insert(
            "Zapf".to_string(),
            FontProfile {
                avg_size: 10.0,
                max_size: 10.0,
                min_size: 10.0,
                count: 1,
            },
        );
        font_metrics.insert(
            "Arial".to_string(),
            FontProfile {
                avg_size: 12.0,
                max_size: 12.0,
                min_size: 12.0,
                count: 2,
            },
        );
        let metadata = OutlineMetadata {
            total_pages: 1,
            processing_time_ms: 0.0,
            truncated: false,
            font_metrics,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        let arial = json.find("Arial").unwrap();
        let zapf = json.find("Zapf").unwrap();
        assert!(arial < zapf);
    }
}
