//! Text run collection from glyph callbacks.
//!
//! [`PageTextCollector`] is the [`ContentHandler`] that turns positioned
//! glyphs into [`TextRun`]s for one page, recursing into form XObjects so
//! that text drawn by nested forms lands in the same page sequence.

use std::sync::Arc;

use pdfglyph_core::{
    BBox, EncodingName, ExtractOptions, ExtractWarning, ExtractWarningCode, PageText, PdfError,
    TextRun, UNKNOWN_CHAR, UnicodeNorm, normalize_runs,
};

use crate::font::Font;
use crate::handler::{ContentHandler, GlyphEvent, XObject};

/// A UTF-16 high surrogate waiting for its low half.
#[derive(Debug)]
struct PendingSurrogate {
    high: u16,
    run: TextRun,
    font: Arc<Font>,
}

/// Collects the text runs of a single page.
#[derive(Debug)]
pub struct PageTextCollector {
    media_box: BBox,
    runs: Vec<TextRun>,
    warnings: Vec<ExtractWarning>,
    depth: usize,
    max_recursion_depth: usize,
    collect_warnings: bool,
    unicode_norm: UnicodeNorm,
    pending: Option<PendingSurrogate>,
}

impl PageTextCollector {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            media_box: BBox::default(),
            runs: Vec::new(),
            warnings: Vec::new(),
            depth: 0,
            max_recursion_depth: options.max_recursion_depth,
            collect_warnings: options.collect_warnings,
            unicode_norm: options.unicode_norm,
            pending: None,
        }
    }

    /// Runs collected so far, in encounter order.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Current form XObject nesting depth; 0 while in the page's own content.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hand the page's runs over, applying the configured normalization.
    pub fn finish(mut self) -> PageText {
        self.flush_pending();
        let mut runs = self.runs;
        normalize_runs(&mut runs, self.unicode_norm);
        PageText {
            media_box: self.media_box,
            runs,
            warnings: self.warnings,
        }
    }
}

impl PageTextCollector {
    fn run(event: &GlyphEvent, text: &str) -> TextRun {
        let origin = event.trm.origin();
        let width = event.font.glyph_width(event.code) / 1000.0 * event.trm.horizontal_scale();
        TextRun::new(origin.x, origin.y, width, event.font_size, text)
    }

    /// Emit a high surrogate that never got its low half as-is.
    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::trace!(code = pending.high, "unpaired UTF-16 high surrogate");
            self.runs.push(pending.run);
        }
    }

    /// Join a UTF-16 surrogate pair split across two glyphs into one run.
    ///
    /// Each half decodes to U+25AF on its own. A ToUnicode entry for either
    /// half wins over pairing. Returns true when `event` was consumed.
    fn pair_surrogate(&mut self, event: &GlyphEvent) -> Result<bool, PdfError> {
        if event.font.encoding().name() != EncodingName::Utf16 {
            return Ok(false);
        }
        let Some(unit) = u16::try_from(event.code)
            .ok()
            .filter(|u| (0xD800..0xE000).contains(u))
        else {
            return Ok(false);
        };
        let text = event.font.glyph_text(event.code)?;
        if !text.chars().eq(char::from_u32(UNKNOWN_CHAR)) {
            return Ok(false);
        }

        if unit >= 0xDC00 {
            let Some(pending) = self
                .pending
                .take_if(|p| Arc::ptr_eq(&p.font, &event.font))
            else {
                return Ok(false);
            };
            let mut run = pending.run;
            if let Some(Ok(c)) = char::decode_utf16([pending.high, unit]).next() {
                run.text = c.to_string();
            }
            run.width += Self::run(event, "").width;
            self.runs.push(run);
            return Ok(true);
        }

        self.flush_pending();
        self.pending = Some(PendingSurrogate {
            high: unit,
            run: Self::run(event, &text),
            font: Arc::clone(&event.font),
        });
        Ok(true)
    }
}

impl Default for PageTextCollector {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}

impl ContentHandler for PageTextCollector {
    fn on_page_start(&mut self, media_box: BBox) {
        self.media_box = media_box;
        self.runs.clear();
        self.warnings.clear();
        self.depth = 0;
        self.pending = None;
    }

    fn on_glyph(&mut self, event: GlyphEvent) -> Result<(), PdfError> {
        if self.pair_surrogate(&event)? {
            return Ok(());
        }
        self.flush_pending();
        let text = event.font.glyph_text(event.code)?;
        // Spaces only advance the text position, which the interpreter owns.
        if &*text == " " {
            return Ok(());
        }
        self.runs.push(Self::run(&event, &text));
        Ok(())
    }

    fn on_xobject(&mut self, label: &str, xobject: &XObject) -> Result<(), PdfError> {
        self.flush_pending();
        let walker = match xobject {
            XObject::Form(walker) => walker,
            XObject::Image => {
                tracing::trace!(label, "skipping image XObject");
                return Ok(());
            }
            XObject::Other(subtype) => {
                tracing::trace!(label, subtype, "skipping unsupported XObject");
                self.on_warning(ExtractWarning::with_code(
                    ExtractWarningCode::UnsupportedXObject,
                    format!("skipped {subtype} XObject /{label}"),
                ));
                return Ok(());
            }
        };
        let depth = self.depth + 1;
        if depth > self.max_recursion_depth {
            tracing::warn!(
                label,
                depth,
                limit = self.max_recursion_depth,
                "form XObject nesting too deep"
            );
            return Err(PdfError::ResourceLimitExceeded {
                limit_name: "max_recursion_depth".to_string(),
                limit_value: self.max_recursion_depth,
                actual_value: depth,
            });
        }
        self.depth = depth;
        let result = walker.walk(self);
        self.depth = depth - 1;
        result
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        if self.collect_warnings {
            self.warnings.push(warning);
        }
    }
}
