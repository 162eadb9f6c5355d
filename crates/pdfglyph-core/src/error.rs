//! Error and warning types for pdfglyph.
//!
//! Provides [`PdfError`] for failures that abort the current font or page,
//! [`ErrorKind`] for telling configuration problems apart from bad input,
//! [`ExtractWarning`] for non-fatal issues reported alongside a result, and
//! [`ExtractOptions`] for configuring limits and asset locations.
//!
//! Data gaps (an unmapped byte, a code with no width entry) are not errors:
//! they are recovered where they happen and never reach this module.

use std::fmt;
use std::path::PathBuf;

use crate::unicode_norm::UnicodeNorm;

/// Fatal error types for glyph resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// A named encoding is not one of the supported encodings.
    UnknownEncoding(String),
    /// A 2-byte encoding was asked to decode text without a CMap.
    MissingCMap {
        /// Name of the encoding that needs the CMap (e.g., "Identity-H").
        encoding: String,
    },
    /// Glyph names were requested from an encoding that has no name table.
    UnsupportedMapping {
        /// Name of the encoding lacking a glyph-name table.
        encoding: String,
    },
    /// No built-in metrics exist for the requested base font.
    UnsupportedFont(String),
    /// A Differences array does not follow the code/name directive shape.
    InvalidDifferences(String),
    /// A bundled or configured asset is malformed.
    InvalidAsset(String),
    /// A font object could not be parsed.
    ParseError(String),
    /// I/O error reading an asset.
    IoError(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_recursion_depth").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
}

/// Broad category of a [`PdfError`].
///
/// Callers use this to decide whether to retry under a different encoding
/// assumption, skip the offending font or page, or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The library or its assets cannot serve the request.
    Configuration,
    /// The document supplied malformed data.
    Input,
    /// A configured limit stopped processing.
    Resource,
}

impl PdfError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfError::UnknownEncoding(_)
            | PdfError::MissingCMap { .. }
            | PdfError::UnsupportedMapping { .. }
            | PdfError::UnsupportedFont(_)
            | PdfError::InvalidAsset(_)
            | PdfError::IoError(_) => ErrorKind::Configuration,
            PdfError::InvalidDifferences(_) | PdfError::ParseError(_) => ErrorKind::Input,
            PdfError::ResourceLimitExceeded { .. } => ErrorKind::Resource,
        }
    }

    /// Returns true for errors caused by missing library support or assets.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Returns true for errors caused by malformed document data.
    pub fn is_input(&self) -> bool {
        self.kind() == ErrorKind::Input
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::UnknownEncoding(name) => write!(f, "unknown encoding: {name}"),
            PdfError::MissingCMap { encoding } => {
                write!(f, "encoding {encoding} requires a ToUnicode CMap")
            }
            PdfError::UnsupportedMapping { encoding } => {
                write!(f, "encoding {encoding} has no glyph name mapping")
            }
            PdfError::UnsupportedFont(name) => write!(f, "no built-in metrics for font {name}"),
            PdfError::InvalidDifferences(msg) => write!(f, "invalid Differences array: {msg}"),
            PdfError::InvalidAsset(msg) => write!(f, "invalid asset: {msg}"),
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// An XObject other than a form or image was invoked and skipped.
    UnsupportedXObject,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::UnsupportedXObject => "UNSUPPORTED_XOBJECT",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while collecting page text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Font name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ExtractWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            font_name: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            font_name: None,
        }
    }

    /// Attach a font name, returning the modified warning (builder pattern).
    pub fn for_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        Ok(())
    }
}

/// Options controlling asset locations, limits and text post-processing.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum recursion depth for nested Form XObjects (default: 10).
    pub max_recursion_depth: usize,
    /// Whether to collect warnings during extraction (default: true).
    pub collect_warnings: bool,
    /// Unicode normalization form applied to each text run (default: None).
    pub unicode_norm: UnicodeNorm,
    /// Directory holding encoding tables and `glyphlist.txt`.
    ///
    /// When `None` (the default) the tables compiled into the library are used.
    pub asset_dir: Option<PathBuf>,
    /// Directory holding `<BaseFont>.afm` metrics files.
    ///
    /// When `None` (the default) the standard 14 font metrics compiled into
    /// the library are used.
    pub metrics_dir: Option<PathBuf>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            collect_warnings: true,
            unicode_norm: UnicodeNorm::None,
            asset_dir: None,
            metrics_dir: None,
        }
    }
}
