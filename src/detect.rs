//! PDF input validation.
//!
//! Cheap header sniffing used at the extraction boundary, before any PDF
//! object parsing happens. Uploads and batch files are rejected here when
//! they are not PDFs at all, so `Error::UnknownFormat` stays distinct from
//! structural parse failures.

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check that `data` starts with a PDF header.
///
/// # Returns
/// * `Ok(())` if the data begins with `%PDF-`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn ensure_pdf(data: &[u8]) -> Result<()> {
    if data.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if bytes begin with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Extract the header version string (e.g., "1.7" from "%PDF-1.7").
///
/// Returns `None` when the header is absent or the version field is not in
/// `digit.digit` form. Informational only; extraction does not gate on it.
pub fn header_version(data: &[u8]) -> Option<String> {
    if !data.starts_with(PDF_MAGIC) || data.len() < PDF_MAGIC.len() + VERSION_LEN {
        return None;
    }
    let raw = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = std::str::from_utf8(raw).ok()?;
    let chars: Vec<char> = version.chars().collect();
    if chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit() {
        Some(version.to_string())
    } else {
        None
    }
}
