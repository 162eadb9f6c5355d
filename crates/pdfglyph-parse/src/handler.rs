//! Content handler callback trait for content stream interpretation.
//!
//! Defines the [`ContentHandler`] trait that a content stream interpreter
//! drives while it walks a page. The interpreter owns graphics and text state
//! and calls handler methods once per positioned glyph and once per `Do`
//! operator; handlers turn those callbacks into extracted objects.

use std::fmt;
use std::sync::Arc;

use pdfglyph_core::{BBox, Ctm, ExtractWarning, PdfError};

use crate::font::Font;

/// One glyph shown by a text-showing operator (Tj, TJ, ', ").
#[derive(Debug, Clone)]
pub struct GlyphEvent {
    /// The character code, already unpacked by the font's encoding.
    pub code: u32,
    /// The text rendering matrix at the glyph origin.
    pub trm: Ctm,
    /// Font size set by the Tf operator.
    pub font_size: f64,
    /// The active font.
    pub font: Arc<Font>,
}

/// Walks a content stream, driving a handler.
///
/// Form XObjects hand one of these to [`ContentHandler::on_xobject`] so the
/// handler can recurse into the form with itself as receiver.
pub trait ContentWalker: Send + Sync {
    fn walk(&self, handler: &mut dyn ContentHandler) -> Result<(), PdfError>;
}

/// The resolved target of a `Do` operator.
#[derive(Clone)]
pub enum XObject {
    /// A form XObject with its own content stream.
    Form(Arc<dyn ContentWalker>),
    /// An image XObject.
    Image,
    /// Any other or unrecognised subtype.
    Other(String),
}

impl fmt::Debug for XObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XObject::Form(_) => f.write_str("Form(..)"),
            XObject::Image => f.write_str("Image"),
            XObject::Other(subtype) => f.debug_tuple("Other").field(subtype).finish(),
        }
    }
}

/// Callback handler for content stream interpretation.
///
/// All methods have default no-op implementations, so implementors only
/// override the callbacks they need.
pub trait ContentHandler {
    /// Called before the first operator of a page.
    fn on_page_start(&mut self, _media_box: BBox) {}

    /// Called once per positioned glyph.
    fn on_glyph(&mut self, _event: GlyphEvent) -> Result<(), PdfError> {
        Ok(())
    }

    /// Called for each `Do` operator with the XObject's resource label.
    fn on_xobject(&mut self, _label: &str, _xobject: &XObject) -> Result<(), PdfError> {
        Ok(())
    }

    /// Called when a non-fatal problem is encountered.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}
