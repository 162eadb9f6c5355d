//! pdfglyph-parse: font dictionaries, glyph metrics and text run collection.
//!
//! This crate reads PDF font dictionaries through lopdf, resolves them into
//! [`Font`]s backed by the encodings in pdfglyph-core and the width strategy
//! that fits the font, and provides the [`ContentHandler`] that a content
//! stream interpreter drives to collect positioned [`TextRun`]s per page.
//!
//! [`TextRun`]: pdfglyph_core::TextRun

pub mod afm;
pub mod cmap;
pub mod collector;
pub mod error;
pub mod font;
pub mod handler;
pub mod resources;
pub mod standard_fonts;
pub mod width;

pub use afm::AfmMetrics;
pub use cmap::CMap;
pub use collector::PageTextCollector;
pub use error::BackendError;
pub use font::{CidWidthInfo, Font, FontDescriptor, FontSubtype};
pub use handler::{ContentHandler, ContentWalker, GlyphEvent, XObject};
pub use pdfglyph_core;
pub use resources::ResourceCache;
pub use standard_fonts::{StandardFont, strip_subset_prefix};
pub use width::{
    BuiltInWidths, CompositeWidths, DEFAULT_CID_WIDTH, DEFAULT_DW2, ExplicitWidths,
    VerticalMetric, WidthCalculator, WidthToken,
};
