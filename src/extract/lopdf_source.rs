//! lopdf-backed span source.
//!
//! Walks each page's content stream with a reduced PDF text-state machine,
//! collects positioned text runs, and merges runs that share a baseline
//! into line-level [`TextSpan`]s. Only the operators that affect text
//! position, font, or size are interpreted; graphics state is ignored.

use std::collections::HashMap;
use std::time::Instant;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::config::Limits;
use crate::detect;
use crate::error::{Error, Result};
use crate::extract::source::{SpanPages, SpanSource};
use crate::model::TextSpan;

/// Page height when no MediaBox is present (US Letter).
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Approximate glyph width as a fraction of font size. Used for advance
/// estimation since glyph metrics are not loaded.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Baseline tolerance when merging runs into a line, as a fraction of the
/// run's font size.
const LINE_TOLERANCE_RATIO: f32 = 0.3;

/// Horizontal gap between adjacent runs, as a fraction of the average
/// character width, above which a space is inserted.
const WORD_GAP_RATIO: f32 = 0.2;

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Span source reading a PDF from an in-memory byte slice.
pub struct LopdfSource<'a> {
    data: &'a [u8],
}

impl<'a> LopdfSource<'a> {
    /// Create a source over the given PDF bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl SpanSource for LopdfSource<'_> {
    fn extract(&self, limits: &Limits) -> Result<SpanPages> {
        if self.data.len() as u64 > limits.max_file_bytes {
            return Err(Error::TooLarge(format!(
                "{} bytes exceeds limit of {} bytes",
                self.data.len(),
                limits.max_file_bytes
            )));
        }
        detect::ensure_pdf(self.data)?;

        let doc = Document::load_mem(self.data)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = doc.get_pages();
        let total_pages = pages.len() as u32;

        let page_height = pages
            .values()
            .next()
            .and_then(|&id| page_height(&doc, id))
            .unwrap_or(DEFAULT_PAGE_HEIGHT);

        let deadline = limits.time_budget.map(|budget| Instant::now() + budget);
        let mut spans = Vec::new();
        // Documents over the page cap are truncated, not refused.
        let mut truncated = total_pages > limits.max_pages;
        if truncated {
            log::warn!(
                "document has {} pages, reading the first {}",
                total_pages,
                limits.max_pages
            );
        }

        for (&page_num, &page_id) in pages.iter().take(limits.max_pages as usize) {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    log::warn!(
                        "time budget exhausted at page {} of {}, returning partial spans",
                        page_num,
                        total_pages
                    );
                    truncated = true;
                    break;
                }
            }

            match extract_page_runs(&doc, page_id) {
                Ok(runs) => spans.extend(assemble_lines(runs, page_num)),
                // A single malformed page does not fail the document.
                Err(err) => log::debug!("skipping page {}: {}", page_num, err),
            }
        }

        log::debug!(
            "extracted {} spans from {} pages (height {:.0})",
            spans.len(),
            total_pages,
            page_height
        );

        Ok(SpanPages {
            total_pages,
            page_height,
            spans,
            truncated,
        })
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Resolved font attributes for one resource-dictionary entry.
#[derive(Debug, Clone)]
struct FontInfo {
    name: String,
    bold: bool,
    italic: bool,
    encoding: Option<String>,
}

impl FontInfo {
    fn from_name(name: String, encoding: Option<String>) -> Self {
        let (bold, italic) = style_from_name(&name);
        Self {
            name,
            bold,
            italic,
            encoding,
        }
    }
}

/// Derive bold/italic flags from a base font name.
fn style_from_name(name: &str) -> (bool, bool) {
    let upper = name.to_uppercase();
    let bold = upper.contains("BOLD") || upper.contains("BLACK") || upper.contains("HEAVY");
    let italic = upper.contains("ITALIC") || upper.contains("OBLIQUE");
    (bold, italic)
}

/// Build the resource-name to font-attribute table for one page.
fn page_font_table(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, FontInfo> {
    let mut table = HashMap::new();
    let fonts = match doc.get_page_fonts(page_id) {
        Ok(fonts) => fonts,
        Err(_) => return table,
    };
    for (key, dict) in &fonts {
        table.insert(key.clone(), font_info_from_dict(dict, key));
    }
    table
}

fn font_info_from_dict(dict: &Dictionary, key: &[u8]) -> FontInfo {
    let name = dict
        .get(b"BaseFont")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_else(|| String::from_utf8_lossy(key).into_owned());

    let encoding = dict.get(b"Encoding").ok().and_then(|o| match o {
        Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
        _ => None,
    });

    FontInfo::from_name(name, encoding)
}

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

/// Height of a page from its MediaBox, walking up the page tree if the box
/// is inherited from a parent node.
fn page_height(doc: &Document, page_id: ObjectId) -> Option<f32> {
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let corners = find_media_box(doc, dict)?;
    if corners.len() < 4 {
        return None;
    }
    let height = corners[3] - corners[1];
    if height > 0.0 {
        Some(height)
    } else {
        None
    }
}

fn find_media_box(doc: &Document, dict: &Dictionary) -> Option<Vec<f32>> {
    if let Ok(obj) = dict.get(b"MediaBox") {
        let arr = match obj {
            Object::Array(arr) => Some(arr.clone()),
            Object::Reference(id) => doc
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_array().ok())
                .cloned(),
            _ => None,
        };
        if let Some(arr) = arr {
            return Some(arr.iter().filter_map(object_number).collect());
        }
    }

    // MediaBox is inheritable through Parent.
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    let parent = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    find_media_box(doc, parent)
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Text-state machine
// ---------------------------------------------------------------------------

/// One positioned run of decoded text, before line assembly.
#[derive(Debug, Clone)]
struct RawRun {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    size: f32,
    font: FontInfo,
}

/// Text-rendering state tracked across a page's content operators.
#[derive(Debug, Clone)]
struct TextState {
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    font: FontInfo,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horiz_scale: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            font: FontInfo::from_name(String::new(), None),
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horiz_scale: 1.0,
            rise: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5] + self.rise
    }

    /// Rendered size: nominal size scaled by the text matrix's vertical
    /// component, `font_size * sqrt(b^2 + d^2)`.
    fn effective_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Translate the line matrix by (tx, ty) and restart the text matrix
    /// from it. Implements Td; TD and T* are expressed through this.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    /// Advance the text position horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Estimated advance for showing `text`, including Tc/Tw spacing.
    fn advance_for(&self, text: &str) -> f32 {
        let mut dx = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale;
            dx += self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        dx
    }
}

/// Walks one page's operations, accumulating text runs.
struct PageWalker<'f> {
    fonts: &'f HashMap<Vec<u8>, FontInfo>,
    state: TextState,
    runs: Vec<RawRun>,
}

impl<'f> PageWalker<'f> {
    fn new(fonts: &'f HashMap<Vec<u8>, FontInfo>) -> Self {
        Self {
            fonts,
            state: TextState::default(),
            runs: Vec::new(),
        }
    }

    fn walk(mut self, ops: &[Operation]) -> Vec<RawRun> {
        for op in ops {
            self.apply(op);
        }
        self.runs
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                self.state.text_matrix = IDENTITY_MATRIX;
                self.state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state is kept across text objects; some producers set it
            // once and reuse it.
            "ET" => {}

            "Tf" => self.set_font(operands),
            "Tm" => {
                let vals: Vec<f32> = operands.iter().filter_map(object_number).collect();
                if vals.len() >= 6 {
                    self.state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
                    self.state.line_matrix = self.state.text_matrix;
                }
            }
            "Td" => {
                if operands.len() >= 2 {
                    let tx = object_number(&operands[0]).unwrap_or(0.0);
                    let ty = object_number(&operands[1]).unwrap_or(0.0);
                    self.state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // tx ty TD  ==  -ty TL ; tx ty Td
                if operands.len() >= 2 {
                    let tx = object_number(&operands[0]).unwrap_or(0.0);
                    let ty = object_number(&operands[1]).unwrap_or(0.0);
                    self.state.leading = -ty;
                    self.state.translate_line(tx, ty);
                }
            }
            "T*" => {
                let leading = self.state.leading;
                self.state.translate_line(0.0, -leading);
            }
            "TL" => {
                if let Some(v) = operands.first().and_then(object_number) {
                    self.state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = operands.first().and_then(object_number) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operands.first().and_then(object_number) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operands.first().and_then(object_number) {
                    self.state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = operands.first().and_then(object_number) {
                    self.state.rise = v;
                }
            }

            "Tj" => {
                if let Some(obj) = operands.first() {
                    self.show(obj);
                }
            }
            "TJ" => {
                if let Some(Object::Array(arr)) = operands.first() {
                    self.show_array(arr);
                }
            }
            "'" => {
                let leading = self.state.leading;
                self.state.translate_line(0.0, -leading);
                if let Some(obj) = operands.first() {
                    self.show(obj);
                }
            }
            "\"" => {
                // aw ac string "  ==  aw Tw ; ac Tc ; string '
                if operands.len() >= 3 {
                    if let Some(aw) = object_number(&operands[0]) {
                        self.state.word_spacing = aw;
                    }
                    if let Some(ac) = object_number(&operands[1]) {
                        self.state.char_spacing = ac;
                    }
                    let leading = self.state.leading;
                    self.state.translate_line(0.0, -leading);
                    self.show(&operands[2]);
                }
            }

            _ => {}
        }
    }

    fn set_font(&mut self, operands: &[Object]) {
        if operands.len() < 2 {
            return;
        }
        let key = match &operands[0] {
            Object::Name(n) => n.as_slice(),
            _ => return,
        };
        self.state.font = match self.fonts.get(key) {
            Some(info) => info.clone(),
            // Not in the resource dictionary; fall back to the key itself.
            None => FontInfo::from_name(String::from_utf8_lossy(key).into_owned(), None),
        };
        self.state.font_size = object_number(&operands[1]).unwrap_or(0.0);
    }

    /// Show a single string operand (Tj, ', ").
    fn show(&mut self, obj: &Object) {
        let Object::String(bytes, _) = obj else {
            return;
        };
        let text = decode_string(bytes, &self.state.font);
        if text.is_empty() {
            return;
        }
        let x = self.state.x();
        self.emit(text.clone(), x);
        let advance = self.state.advance_for(&text);
        self.state.advance_x(advance);
    }

    /// Show a TJ array: strings interleaved with kerning adjustments in
    /// thousandths of text space. Large rightward jumps become spaces.
    fn show_array(&mut self, arr: &[Object]) {
        let mut buf = String::new();
        let start_x = self.state.x();

        for elem in arr {
            match elem {
                Object::String(bytes, _) => {
                    let fragment = decode_string(bytes, &self.state.font);
                    buf.push_str(&fragment);
                    let advance = self.state.advance_for(&fragment);
                    self.state.advance_x(advance);
                }
                other => {
                    if let Some(adj) = object_number(other) {
                        let dx = -adj / 1000.0 * self.state.font_size * self.state.horiz_scale;
                        let gap = self.state.font_size
                            * APPROX_CHAR_WIDTH_RATIO
                            * self.state.horiz_scale
                            * WORD_GAP_RATIO;
                        if dx > gap && !buf.is_empty() && !buf.ends_with(' ') {
                            buf.push(' ');
                        }
                        self.state.advance_x(dx);
                    }
                }
            }
        }

        if !buf.trim().is_empty() {
            self.emit(buf, start_x);
        }
    }

    fn emit(&mut self, text: String, x: f32) {
        let size = self.state.effective_size();
        if size <= 0.0 {
            return;
        }
        let width =
            text.chars().count() as f32 * size * APPROX_CHAR_WIDTH_RATIO * self.state.horiz_scale;
        self.runs.push(RawRun {
            text,
            x,
            y: self.state.y(),
            width,
            size,
            font: self.state.font.clone(),
        });
    }
}

/// Extract the raw text runs of one page.
fn extract_page_runs(doc: &Document, page_id: ObjectId) -> Result<Vec<RawRun>> {
    let fonts = page_font_table(doc, page_id);
    let content = doc.get_page_content(page_id)?;
    let content = Content::decode(&content)?;
    Ok(PageWalker::new(&fonts).walk(&content.operations))
}

// ---------------------------------------------------------------------------
// String decoding
// ---------------------------------------------------------------------------

/// Decode string bytes using the font's declared encoding as a hint.
fn decode_string(bytes: &[u8], font: &FontInfo) -> String {
    // Identity-H/V fonts carry 2-byte codes that are usually Unicode.
    if let Some(enc) = &font.encoding {
        if enc.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
            let units: Vec<u16> = bytes
                .chunks(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&units);
            if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Best-effort decoding without encoding information: UTF-16BE with BOM,
/// then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// Line assembly
// ---------------------------------------------------------------------------

/// Merge raw runs into line-level spans for one page.
///
/// Runs are sorted top-down then left-to-right, grouped by baseline within
/// a tolerance proportional to font size, and joined with spaces where the
/// horizontal gap between runs looks like a word break. The line's font
/// size is the largest run size, which is what heading classification
/// keys on; its font name follows the same run.
fn assemble_lines(runs: Vec<RawRun>, page: u32) -> Vec<TextSpan> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut runs = runs;
    runs.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<TextSpan> = Vec::new();
    let mut current: Vec<RawRun> = Vec::new();
    let mut current_y = runs[0].y;

    for run in runs {
        let tolerance = run.size * LINE_TOLERANCE_RATIO;
        if current.is_empty() || (run.y - current_y).abs() <= tolerance {
            if current.is_empty() {
                current_y = run.y;
            }
            current.push(run);
        } else {
            if let Some(span) = line_to_span(&current, page) {
                lines.push(span);
            }
            current_y = run.y;
            current = vec![run];
        }
    }
    if let Some(span) = line_to_span(&current, page) {
        lines.push(span);
    }

    lines
}

/// Collapse one line's runs into a `TextSpan`, or `None` if the text is
/// blank after normalization.
fn line_to_span(runs: &[RawRun], page: u32) -> Option<TextSpan> {
    let first = runs.first()?;

    let mut text = String::new();
    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            let prev = &runs[i - 1];
            let gap = run.x - (prev.x + prev.width);
            let chars = run.text.chars().count();
            let avg_char_width = if chars > 0 && run.width > 0.0 {
                run.width / chars as f32
            } else {
                run.size * APPROX_CHAR_WIDTH_RATIO
            };
            if gap > avg_char_width * WORD_GAP_RATIO && !text.ends_with(' ') {
                text.push(' ');
            }
        }
        text.push_str(&run.text);
    }

    let text: String = text.nfkc().collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // The dominant run decides the line's size, font, and style.
    let dominant = runs
        .iter()
        .max_by(|a, b| a.size.partial_cmp(&b.size).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(first);

    Some(TextSpan {
        text: trimmed.to_string(),
        page,
        font_name: dominant.font.name.clone(),
        font_size: dominant.size,
        bold: runs.iter().any(|r| r.font.bold),
        italic: runs.iter().any(|r| r.font.italic),
        y_position: first.y,
    })
}
