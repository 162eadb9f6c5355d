//! Glyph advance widths and vertical metrics.
//!
//! [`WidthCalculator`] is selected once per font and answers width, height
//! and position-vector queries for character codes. Every query is total:
//! absent or negative codes yield 0, and codes without an entry fall back to
//! the font's declared default. Widths are in 1/1000 text-space units.

use std::sync::Arc;

use pdfglyph_core::{Encoding, PdfError, Point};

use crate::afm::AfmMetrics;
use crate::resources::ResourceCache;

/// Default CID font width when /DW is not specified.
pub const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Default /DW2 `[vy w1y]` for vertical writing.
pub const DEFAULT_DW2: [f64; 2] = [880.0, -1000.0];

/// One element of a /W or /W2 array, with references already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum WidthToken {
    Number(f64),
    Array(Vec<f64>),
}

/// Vertical metrics of one CID from /W2: `w1y vx vy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetric {
    /// Vertical advance (negative moves down the page).
    pub w1y: f64,
    /// Position vector x.
    pub vx: f64,
    /// Position vector y.
    pub vy: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum SpanValues<T> {
    /// Form A: one entry per code starting at `first`.
    Each(Vec<T>),
    /// Form B: one entry for the whole inclusive range.
    Uniform(T),
}

#[derive(Debug, Clone, PartialEq)]
struct Span<T> {
    first: u32,
    last: u32,
    values: SpanValues<T>,
}

/// A disjoint code range served by one span.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    first: u32,
    last: u32,
    span: usize,
}

/// Code-indexed entries decoded from a /W or /W2 array.
///
/// Both compact forms are kept as spans instead of being expanded per code,
/// so a single `0 65535 500` entry costs one span. Overlaps are resolved at
/// parse time, later spans winning, into sorted disjoint segments that
/// lookups binary search.
#[derive(Debug, Clone, PartialEq)]
struct CidTable<T> {
    spans: Vec<Span<T>>,
    segments: Vec<Segment>,
}

impl<T: Copy> CidTable<T> {
    /// Decode `tokens`, grouping `arity` numbers into one entry.
    ///
    /// After a starting code, an array selects form A (`c [v...]`) and a
    /// number selects form B (`c1 c2 v...`). Malformed segments are skipped.
    fn parse(tokens: &[WidthToken], arity: usize, build: impl Fn(&[f64]) -> T) -> Self {
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let WidthToken::Number(first) = tokens[i] else {
                tracing::trace!(index = i, "width array entry is not a starting code");
                i += 1;
                continue;
            };
            let Some(first) = to_code(first) else {
                i += 1;
                continue;
            };

            match tokens.get(i + 1) {
                Some(WidthToken::Array(values)) => {
                    let entries: Vec<T> = values.chunks_exact(arity).map(&build).collect();
                    if let Some(count) = u32::try_from(entries.len()).ok().filter(|n| *n > 0) {
                        spans.push(Span {
                            first,
                            last: first.saturating_add(count - 1),
                            values: SpanValues::Each(entries),
                        });
                    }
                    i += 2;
                }
                Some(WidthToken::Number(last)) => {
                    let values: Option<Vec<f64>> =
                        tokens.get(i + 2..i + 2 + arity).and_then(|group| {
                            group
                                .iter()
                                .map(|t| match t {
                                    WidthToken::Number(v) => Some(*v),
                                    WidthToken::Array(_) => None,
                                })
                                .collect()
                        });
                    let (Some(last), Some(values)) = (to_code(*last), values) else {
                        tracing::trace!(index = i, "truncated width range skipped");
                        break;
                    };
                    if last >= first {
                        spans.push(Span {
                            first,
                            last,
                            values: SpanValues::Uniform(build(&values)),
                        });
                    }
                    i += 2 + arity;
                }
                None => break,
            }
        }

        let mut segments = Vec::with_capacity(spans.len());
        for (index, span) in spans.iter().enumerate() {
            overlay(
                &mut segments,
                Segment {
                    first: span.first,
                    last: span.last,
                    span: index,
                },
            );
        }
        Self { spans, segments }
    }

    fn get(&self, code: u32) -> Option<T> {
        let at = self.segments.partition_point(|s| s.last < code);
        let segment = self.segments.get(at).filter(|s| s.first <= code)?;
        let span = &self.spans[segment.span];
        match &span.values {
            SpanValues::Each(values) => values.get((code - span.first) as usize).copied(),
            SpanValues::Uniform(value) => Some(*value),
        }
    }
}

/// Lay `new` over sorted disjoint `segments`, trimming what it covers.
fn overlay(segments: &mut Vec<Segment>, new: Segment) {
    if segments.last().is_none_or(|s| s.last < new.first) {
        segments.push(new);
        return;
    }
    let start = segments.partition_point(|s| s.last < new.first);
    let end = segments.partition_point(|s| s.first <= new.last);
    let mut replacement = Vec::with_capacity(3);
    if let Some(head) = segments[start..end].first().filter(|h| h.first < new.first) {
        replacement.push(Segment {
            last: new.first - 1,
            ..*head
        });
    }
    replacement.push(new);
    if let Some(tail) = segments[start..end].last().filter(|t| t.last > new.last) {
        replacement.push(Segment {
            first: new.last + 1,
            ..*tail
        });
    }
    segments.splice(start..end, replacement);
}

fn to_code(value: f64) -> Option<u32> {
    (value >= 0.0 && value <= f64::from(u32::MAX) && value.fract() == 0.0).then_some(value as u32)
}

/// Widths from a standard font's AFM metrics.
#[derive(Debug, Clone)]
pub struct BuiltInWidths {
    metrics: Arc<AfmMetrics>,
    encoding: Arc<Encoding>,
}

impl BuiltInWidths {
    pub fn new(metrics: Arc<AfmMetrics>, encoding: Arc<Encoding>) -> Self {
        Self { metrics, encoding }
    }

    pub fn metrics(&self) -> &AfmMetrics {
        &self.metrics
    }

    /// Look up by code first, then by the glyph name the encoding assigns.
    fn width(&self, code: u32) -> f64 {
        if let Some(width) = self.metrics.width_by_code(code) {
            return width;
        }
        let name = self.encoding.int_to_name(code).ok().flatten();
        match name.and_then(|n| self.metrics.width_by_name(n.as_str())) {
            Some(width) => width,
            None => {
                tracing::trace!(code, font = self.metrics.font_name(), "no built-in width");
                0.0
            }
        }
    }
}

/// Widths and vertical metrics of a composite (Type0) font.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeWidths {
    default_width: f64,
    widths: CidTable<f64>,
    /// `[vy w1y]` from /DW2.
    default_vertical: [f64; 2],
    vertical: CidTable<VerticalMetric>,
}

impl CompositeWidths {
    /// Build from the descendant font's /DW, /W, /DW2 and /W2 entries.
    pub fn new(
        default_width: Option<f64>,
        w: &[WidthToken],
        dw2: Option<[f64; 2]>,
        w2: &[WidthToken],
    ) -> Self {
        Self {
            default_width: default_width.unwrap_or(DEFAULT_CID_WIDTH),
            widths: CidTable::parse(w, 1, |v| v[0]),
            default_vertical: dw2.unwrap_or(DEFAULT_DW2),
            vertical: CidTable::parse(w2, 3, |v| VerticalMetric {
                w1y: v[0],
                vx: v[1],
                vy: v[2],
            }),
        }
    }

    pub fn default_width(&self) -> f64 {
        self.default_width
    }

    fn width(&self, code: u32) -> f64 {
        self.widths.get(code).unwrap_or(self.default_width)
    }

    fn height(&self, code: u32) -> f64 {
        self.vertical
            .get(code)
            .map_or(self.default_vertical[1], |m| m.w1y)
    }

    /// Explicit /W2 position, else half the advance width and /DW2 `vy`.
    fn position(&self, code: u32) -> Point {
        match self.vertical.get(code) {
            Some(m) => Point::new(m.vx, m.vy),
            None => Point::new(self.width(code) / 2.0, self.default_vertical[0]),
        }
    }
}

/// Widths from a simple font's /FirstChar and /Widths.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitWidths {
    first_char: i64,
    widths: Vec<f64>,
    missing_width: f64,
}

impl ExplicitWidths {
    pub fn new(first_char: i64, widths: Vec<f64>, missing_width: f64) -> Self {
        Self {
            first_char,
            widths,
            missing_width,
        }
    }

    fn width(&self, code: i64) -> f64 {
        let Some(index) = code.checked_sub(self.first_char) else {
            return self.missing_width;
        };
        if index < 0 || self.widths.is_empty() {
            return self.missing_width;
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.widths.get(i).copied())
            .unwrap_or(self.missing_width)
    }
}

/// Per-font width strategy, chosen once from the font's subtype.
#[derive(Debug, Clone)]
pub enum WidthCalculator {
    /// A standard 14 font without a /Widths array.
    BuiltIn(BuiltInWidths),
    /// A Type0 font with /W and /W2 arrays.
    Composite(CompositeWidths),
    /// Any other simple font (Type1, Type3, TrueType, MMType1).
    TypeOneOrThree(ExplicitWidths),
}

impl WidthCalculator {
    /// Built-in metrics for `base_font`, loaded through the cache.
    ///
    /// Fails with [`PdfError::UnsupportedFont`] if `base_font` is not a
    /// standard font.
    pub fn built_in(
        base_font: &str,
        encoding: Arc<Encoding>,
        cache: &ResourceCache,
    ) -> Result<Self, PdfError> {
        let metrics = cache.standard_metrics(base_font)?;
        Ok(WidthCalculator::BuiltIn(BuiltInWidths::new(metrics, encoding)))
    }

    /// Advance width of a glyph, never negative.
    pub fn glyph_width(&self, code: Option<i64>) -> f64 {
        let Some(code) = code.filter(|c| *c >= 0) else {
            return 0.0;
        };
        let width = match self {
            WidthCalculator::BuiltIn(b) => u32::try_from(code).map_or(0.0, |c| b.width(c)),
            WidthCalculator::Composite(c) => {
                u32::try_from(code).map_or(c.default_width, |code| c.width(code))
            }
            WidthCalculator::TypeOneOrThree(t) => t.width(code),
        };
        width.max(0.0)
    }

    /// Vertical advance of a glyph. Only composite fonts have one.
    pub fn glyph_height(&self, code: Option<i64>) -> f64 {
        let Some(code) = code.filter(|c| *c >= 0) else {
            return 0.0;
        };
        match self {
            WidthCalculator::Composite(c) => {
                u32::try_from(code).map_or(c.default_vertical[1], |code| c.height(code))
            }
            WidthCalculator::BuiltIn(_) | WidthCalculator::TypeOneOrThree(_) => 0.0,
        }
    }

    /// Vertical-writing position vector of a glyph.
    ///
    /// Fonts without vertical metrics always return the origin.
    pub fn glyph_position(&self, code: Option<i64>) -> Point {
        let code = code.filter(|c| *c >= 0).and_then(|c| u32::try_from(c).ok());
        match (self, code) {
            (WidthCalculator::Composite(c), Some(code)) => c.position(code),
            _ => Point::new(0.0, 0.0),
        }
    }
}
