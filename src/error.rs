//! Error types for the pdftoc library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a document outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF document is encrypted; decryption is not supported.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Input exceeds the configured file-size limit.
    #[error("Document too large: {0}")]
    TooLarge(String),

    /// The document contains no extractable text spans.
    ///
    /// The high-level API never surfaces this variant: `extract_outline`
    /// converts it into an empty outline with a filename-derived title.
    #[error("Document has no extractable text")]
    EmptyDocument,
}

impl Error {
    /// Whether this error means the input could not be read as a PDF at all
    /// (corrupt, encrypted, or not a PDF). Limit violations and empty
    /// documents are not unreadable input.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat | Error::Encrypted | Error::PdfParse(_)
        )
    }
}

// Encrypted documents are detected up front via `Document::is_encrypted`,
// so every lopdf failure reaching this point is a structural one.
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::TooLarge("60000000 bytes exceeds limit of 52428800 bytes".to_string());
        assert_eq!(
            err.to_string(),
            "Document too large: 60000000 bytes exceeds limit of 52428800 bytes"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_unreadable() {
        assert!(Error::UnknownFormat.is_unreadable());
        assert!(Error::Encrypted.is_unreadable());
        assert!(Error::PdfParse("bad xref".to_string()).is_unreadable());

        assert!(!Error::TooLarge("x".to_string()).is_unreadable());
        assert!(!Error::EmptyDocument.is_unreadable());
        let io_err = io::Error::new(io::ErrorKind::Other, "disk");
        assert!(!Error::Io(io_err).is_unreadable());
    }
}
