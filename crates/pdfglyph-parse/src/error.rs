//! Error types for the font adapter and collector layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps lopdf and metrics failures and converts them to [`PdfError`].

use pdfglyph_core::PdfError;
use thiserror::Error;

/// Error type for reading fonts and metrics out of a parsed document.
///
/// Converts into [`PdfError`] so callers see one error type.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A PDF object is missing or has the wrong type.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading a metrics file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font dictionary or metrics file is malformed.
    #[error("font error: {0}")]
    Font(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::ParseError(format!("font: {msg}")),
            BackendError::Core(e) => e,
        }
    }
}
