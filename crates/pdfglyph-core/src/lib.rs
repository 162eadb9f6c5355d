//! pdfglyph-core: Backend-independent glyph resolution types.
//!
//! This crate provides the encoding tables, the per-font [`Encoding`]
//! resolver, glyph names, text runs and the shared error type used by
//! pdfglyph-rs. It knows nothing about PDF object syntax; the
//! `pdfglyph-parse` crate adapts parsed font dictionaries onto these types.

pub mod assets;
pub mod cache;
pub mod encoding;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod text;
pub mod unicode_norm;

pub use assets::AssetSource;
pub use cache::SingleFlight;
pub use encoding::{
    CONTROL_CODES, Differences, DifferencesToken, Encoding, EncodingName, EncodingSpec,
    EncodingStore, EncodingTable, ToUnicode, UNKNOWN_CHAR,
};
pub use error::{ErrorKind, ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{BBox, Ctm, Point};
pub use glyph::{GlyphList, GlyphName};
pub use text::{PageText, TextRun};
pub use unicode_norm::{UnicodeNorm, normalize_runs};
