//! Font dictionaries and per-font glyph resolution.
//!
//! [`FontDescriptor::from_lopdf`] reads the entries of a PDF font dictionary
//! that matter for decoding and metrics. [`Font::new`] resolves them once,
//! against a [`ResourceCache`], into an [`Encoding`] and a
//! [`WidthCalculator`] that are then shared read-only for the font's lifetime.

use std::fmt;
use std::sync::Arc;

use pdfglyph_core::{
    DifferencesToken, Encoding, EncodingName, EncodingSpec, GlyphName, PdfError, Point,
    ToUnicode, UNKNOWN_CHAR,
};

use crate::cmap::CMap;
use crate::error::BackendError;
use crate::resources::ResourceCache;
use crate::standard_fonts::StandardFont;
use crate::width::{CompositeWidths, ExplicitWidths, WidthCalculator, WidthToken};

/// The `/Subtype` of a font dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSubtype {
    Type0,
    Type1,
    MmType1,
    Type3,
    TrueType,
    Other(String),
}

impl FontSubtype {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Type0" => FontSubtype::Type0,
            "Type1" => FontSubtype::Type1,
            "MMType1" => FontSubtype::MmType1,
            "Type3" => FontSubtype::Type3,
            "TrueType" => FontSubtype::TrueType,
            other => FontSubtype::Other(other.to_string()),
        }
    }

    pub fn is_composite(&self) -> bool {
        *self == FontSubtype::Type0
    }
}

impl fmt::Display for FontSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontSubtype::Type0 => "Type0",
            FontSubtype::Type1 => "Type1",
            FontSubtype::MmType1 => "MMType1",
            FontSubtype::Type3 => "Type3",
            FontSubtype::TrueType => "TrueType",
            FontSubtype::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// Width entries of a Type0 font's descendant CIDFont.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CidWidthInfo {
    /// `/DW`.
    pub default_width: Option<f64>,
    /// `/W`.
    pub widths: Vec<WidthToken>,
    /// `/DW2` as `[vy w1y]`.
    pub default_vertical: Option<[f64; 2]>,
    /// `/W2`.
    pub vertical: Vec<WidthToken>,
}

/// The decoding-relevant entries of a font dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub subtype: FontSubtype,
    pub base_font: Option<String>,
    /// `/Encoding`, or `None` when the entry is absent.
    pub encoding: Option<EncodingSpec>,
    pub first_char: i64,
    /// `/Widths`, or `None` when the entry is absent.
    pub widths: Option<Vec<f64>>,
    /// `/FontDescriptor/MissingWidth`, 0 when absent.
    pub missing_width: f64,
    pub to_unicode: Option<CMap>,
    /// Present for Type0 fonts.
    pub cid: Option<CidWidthInfo>,
}

impl FontDescriptor {
    /// A descriptor with only a subtype and base font set.
    pub fn new(subtype: FontSubtype, base_font: impl Into<String>) -> Self {
        Self {
            subtype,
            base_font: Some(base_font.into()),
            encoding: None,
            first_char: 0,
            widths: None,
            missing_width: 0.0,
            to_unicode: None,
            cid: None,
        }
    }

    /// Read a font dictionary.
    ///
    /// Malformed Differences arrays and unsupported `/Encoding` values fail;
    /// other malformed entries are treated as absent. An unparsable
    /// `/ToUnicode` stream is dropped with a warning.
    pub fn from_lopdf(
        doc: &lopdf::Document,
        font_dict: &lopdf::Dictionary,
    ) -> Result<Self, BackendError> {
        let subtype = font_dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_name().ok().and_then(|n| std::str::from_utf8(n).ok()))
            .map(FontSubtype::from_name)
            .ok_or_else(|| BackendError::Parse("font dictionary has no /Subtype".to_string()))?;

        let base_font = font_dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_name().ok().and_then(|n| std::str::from_utf8(n).ok()))
            .map(str::to_string);

        let encoding = match font_dict.get(b"Encoding") {
            Ok(obj) => Some(parse_encoding(doc, resolve_object(doc, obj))?),
            Err(_) => None,
        };

        let first_char = font_dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| object_to_f64(resolve_object(doc, o)))
            .map_or(0, |v| v as i64);

        let widths = font_dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| object_to_f64(resolve_object(doc, o)).unwrap_or(0.0))
                    .collect()
            });

        let missing_width = font_dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_dict().ok())
            .and_then(|desc| desc.get(b"MissingWidth").ok())
            .and_then(|o| object_to_f64(resolve_object(doc, o)))
            .unwrap_or(0.0);

        let to_unicode = parse_to_unicode(doc, font_dict, base_font.as_deref());

        let cid = subtype
            .is_composite()
            .then(|| parse_descendant(doc, font_dict));

        Ok(Self {
            subtype,
            base_font,
            encoding,
            first_char,
            widths,
            missing_width,
            to_unicode,
            cid,
        })
    }
}

fn parse_encoding(
    doc: &lopdf::Document,
    obj: &lopdf::Object,
) -> Result<EncodingSpec, BackendError> {
    if let Some(name) = obj.as_name().ok().and_then(|n| std::str::from_utf8(n).ok()) {
        return Ok(EncodingSpec::named(name));
    }
    let Ok(dict) = obj.as_dict() else {
        return Err(PdfError::UnknownEncoding(format!(
            "unsupported /Encoding object of type {}",
            object_kind(obj)
        ))
        .into());
    };

    let base_encoding = dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_name().ok().and_then(|n| std::str::from_utf8(n).ok()))
        .map(str::to_string);

    let differences = match dict.get(b"Differences") {
        Ok(obj) => {
            let arr = resolve_object(doc, obj).as_array().map_err(|_| {
                PdfError::InvalidDifferences("/Differences is not an array".to_string())
            })?;
            let tokens = arr
                .iter()
                .enumerate()
                .map(|(i, o)| match resolve_object(doc, o) {
                    lopdf::Object::Integer(n) => Ok(DifferencesToken::Code(*n)),
                    lopdf::Object::Real(f) if f.fract() == 0.0 => {
                        Ok(DifferencesToken::Code(*f as i64))
                    }
                    lopdf::Object::Name(name) => Ok(DifferencesToken::Name(GlyphName::from(
                        String::from_utf8_lossy(name).into_owned(),
                    ))),
                    other => Err(PdfError::InvalidDifferences(format!(
                        "entry {i} is a {}, expected a code or a glyph name",
                        object_kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(tokens)
        }
        Err(_) => None,
    };

    Ok(EncodingSpec::Dictionary {
        base_encoding,
        differences,
    })
}

fn parse_to_unicode(
    doc: &lopdf::Document,
    font_dict: &lopdf::Dictionary,
    base_font: Option<&str>,
) -> Option<CMap> {
    let obj = resolve_object(doc, font_dict.get(b"ToUnicode").ok()?);
    let stream = obj.as_stream().ok()?;
    let data = if stream.dict.get(b"Filter").is_ok() {
        match stream.decompressed_content() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(font = base_font, error = %e, "cannot decompress /ToUnicode");
                return None;
            }
        }
    } else {
        stream.content.clone()
    };
    match CMap::parse(&data) {
        Ok(cmap) => Some(cmap),
        Err(e) => {
            tracing::warn!(font = base_font, error = %e, "ignoring malformed /ToUnicode");
            None
        }
    }
}

fn parse_descendant(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> CidWidthInfo {
    let descendant = font_dict
        .get(b"DescendantFonts")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_array().ok())
        .and_then(|arr| arr.first())
        .and_then(|o| resolve_object(doc, o).as_dict().ok());
    let Some(cid_font) = descendant else {
        tracing::trace!("Type0 font without a descendant font, using default widths");
        return CidWidthInfo::default();
    };

    let tokens = |key: &[u8]| {
        cid_font
            .get(key)
            .ok()
            .and_then(|o| resolve_object(doc, o).as_array().ok())
            .map(|arr| width_tokens(doc, arr))
            .unwrap_or_default()
    };

    let default_vertical = cid_font
        .get(b"DW2")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_array().ok())
        .and_then(|arr| match arr.as_slice() {
            [vy, w1y] => Some([
                object_to_f64(resolve_object(doc, vy))?,
                object_to_f64(resolve_object(doc, w1y))?,
            ]),
            _ => None,
        });

    CidWidthInfo {
        default_width: cid_font
            .get(b"DW")
            .ok()
            .and_then(|o| object_to_f64(resolve_object(doc, o))),
        widths: tokens(b"W"),
        default_vertical,
        vertical: tokens(b"W2"),
    }
}

/// Flatten a /W or /W2 array, resolving references.
fn width_tokens(doc: &lopdf::Document, objects: &[lopdf::Object]) -> Vec<WidthToken> {
    objects
        .iter()
        .filter_map(|o| match resolve_object(doc, o) {
            lopdf::Object::Array(arr) => Some(WidthToken::Array(
                arr.iter()
                    .map(|v| object_to_f64(resolve_object(doc, v)).unwrap_or(0.0))
                    .collect(),
            )),
            other => object_to_f64(other).map(WidthToken::Number),
        })
        .collect()
}

fn object_kind(obj: &lopdf::Object) -> &'static str {
    match obj {
        lopdf::Object::Null => "null",
        lopdf::Object::Boolean(_) => "boolean",
        lopdf::Object::Integer(_) | lopdf::Object::Real(_) => "number",
        lopdf::Object::Name(_) => "name",
        lopdf::Object::String(..) => "string",
        lopdf::Object::Array(_) => "array",
        lopdf::Object::Dictionary(_) => "dictionary",
        lopdf::Object::Stream(_) => "stream",
        lopdf::Object::Reference(_) => "reference",
    }
}

/// Resolve an indirect reference to the actual object.
fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Convert a lopdf object to f64, returning None if not a number.
fn object_to_f64(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// A resolved font: its encoding, optional ToUnicode map and width strategy.
#[derive(Debug)]
pub struct Font {
    subtype: FontSubtype,
    base_font: Option<String>,
    encoding: Arc<Encoding>,
    to_unicode: Option<CMap>,
    widths: WidthCalculator,
}

impl Font {
    /// Resolve a descriptor against the cache.
    ///
    /// Type0 fonts get composite widths. Simple fonts without `/Widths` whose
    /// base font is a standard font get built-in metrics; all other simple
    /// fonts use their `/Widths` array. Symbol and ZapfDingbats without an
    /// `/Encoding` entry use their own built-in encodings.
    pub fn new(descriptor: FontDescriptor, cache: &ResourceCache) -> Result<Self, PdfError> {
        let FontDescriptor {
            subtype,
            base_font,
            encoding,
            first_char,
            widths,
            missing_width,
            to_unicode,
            cid,
        } = descriptor;

        let standard = base_font.as_deref().and_then(StandardFont::from_base_font);
        let spec = encoding.unwrap_or_else(|| match standard {
            // SymbolEncoding and ZapfDingbatsEncoding are named after the font.
            Some(font) if font.is_symbolic() => {
                EncodingSpec::named(format!("{}Encoding", font.name()))
            }
            _ => EncodingSpec::default(),
        });
        let encoding = Arc::new(Encoding::construct(&spec, cache.encodings())?);

        let widths = match (&subtype, widths, standard, base_font.as_deref()) {
            (FontSubtype::Type0, _, _, _) => {
                let cid = cid.unwrap_or_default();
                WidthCalculator::Composite(CompositeWidths::new(
                    cid.default_width,
                    &cid.widths,
                    cid.default_vertical,
                    &cid.vertical,
                ))
            }
            (_, None, Some(_), Some(name)) => {
                WidthCalculator::built_in(name, Arc::clone(&encoding), cache)?
            }
            (_, widths, _, _) => WidthCalculator::TypeOneOrThree(ExplicitWidths::new(
                first_char,
                widths.unwrap_or_default(),
                missing_width,
            )),
        };

        tracing::debug!(
            font = base_font.as_deref().unwrap_or("<unnamed>"),
            subtype = %subtype,
            encoding = %encoding.name(),
            to_unicode = to_unicode.is_some(),
            "resolved font"
        );

        Ok(Self {
            subtype,
            base_font,
            encoding,
            to_unicode,
            widths,
        })
    }

    /// Read and resolve a font dictionary in one step.
    pub fn from_lopdf(
        doc: &lopdf::Document,
        font_dict: &lopdf::Dictionary,
        cache: &ResourceCache,
    ) -> Result<Self, PdfError> {
        Self::new(FontDescriptor::from_lopdf(doc, font_dict)?, cache)
    }

    pub fn subtype(&self) -> &FontSubtype {
        &self.subtype
    }

    pub fn base_font(&self) -> Option<&str> {
        self.base_font.as_deref()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn width_calculator(&self) -> &WidthCalculator {
        &self.widths
    }

    pub fn has_to_unicode(&self) -> bool {
        self.to_unicode.is_some()
    }

    /// Whether glyphs advance downwards (Identity-V).
    pub fn is_vertical(&self) -> bool {
        self.encoding.name() == EncodingName::IdentityV
    }

    /// Split a shown string into character codes.
    pub fn unpack(&self, bytes: &[u8]) -> Vec<u32> {
        self.encoding.unpack(bytes)
    }

    /// Decode a shown string to UTF-8.
    pub fn to_utf8(&self, bytes: &[u8]) -> Result<String, PdfError> {
        self.encoding.to_utf8(bytes, self.cmap())
    }

    /// The text of one character code.
    ///
    /// The ToUnicode map wins where it has an entry. Identity-encoded fonts
    /// without one fail with [`PdfError::MissingCMap`].
    pub fn glyph_text(&self, code: u32) -> Result<Arc<str>, PdfError> {
        if let Some(text) = self.cmap().and_then(|m| m.lookup(code)) {
            return Ok(Arc::from(text));
        }
        match self.encoding.name() {
            EncodingName::IdentityH | EncodingName::IdentityV => {
                if self.to_unicode.is_none() {
                    return Err(PdfError::MissingCMap {
                        encoding: self.encoding.name().to_string(),
                    });
                }
                tracing::trace!(code, "code missing from /ToUnicode");
                Ok(Arc::from(
                    char::from_u32(UNKNOWN_CHAR)
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                        .to_string(),
                ))
            }
            _ => Ok(self.encoding.int_to_utf8_string(code)),
        }
    }

    /// Advance width in 1/1000 text-space units.
    pub fn glyph_width(&self, code: u32) -> f64 {
        self.widths.glyph_width(Some(i64::from(code)))
    }

    /// Vertical advance in 1/1000 text-space units.
    pub fn glyph_height(&self, code: u32) -> f64 {
        self.widths.glyph_height(Some(i64::from(code)))
    }

    /// Vertical-writing position vector in 1/1000 text-space units.
    pub fn glyph_position(&self, code: u32) -> Point {
        self.widths.glyph_position(Some(i64::from(code)))
    }

    fn cmap(&self) -> Option<&dyn ToUnicode> {
        self.to_unicode.as_ref().map(|c| c as &dyn ToUnicode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object, Stream, dictionary};

    fn name(s: &str) -> Object {
        Object::Name(s.as_bytes().to_vec())
    }

    fn to_unicode_stream(doc: &mut Document, body: &str) -> lopdf::ObjectId {
        doc.add_object(Object::Stream(Stream::new(
            dictionary! {},
            body.as_bytes().to_vec(),
        )))
    }

    fn font(doc: &Document, dict: &lopdf::Dictionary) -> Result<Font, PdfError> {
        Font::from_lopdf(doc, dict, &ResourceCache::default())
    }

    // --- FontDescriptor::from_lopdf ---

    #[test]
    fn reads_simple_font_entries() {
        let mut doc = Document::with_version("1.5");
        let desc_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "MissingWidth" => 250,
        });
        let widths_id = doc.add_object(Object::Array(vec![
            Object::Integer(278),
            Object::Real(355.5),
        ]));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Georgia",
            "Encoding" => "WinAnsiEncoding",
            "FirstChar" => 32,
            "Widths" => widths_id,
            "FontDescriptor" => desc_id,
        };
        let desc = FontDescriptor::from_lopdf(&doc, &dict).unwrap();
        assert_eq!(desc.subtype, FontSubtype::TrueType);
        assert_eq!(desc.base_font.as_deref(), Some("ABCDEF+Georgia"));
        assert_eq!(desc.encoding, Some(EncodingSpec::named("WinAnsiEncoding")));
        assert_eq!(desc.first_char, 32);
        assert_eq!(desc.widths, Some(vec![278.0, 355.5]));
        assert_eq!(desc.missing_width, 250.0);
        assert!(desc.cid.is_none());
    }

    #[test]
    fn reads_encoding_dictionary_with_differences() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => dictionary! {
                "Type" => "Encoding",
                "BaseEncoding" => "MacRomanEncoding",
                "Differences" => vec![Object::Integer(25), name("A"), name("B")],
            },
        };
        let desc = FontDescriptor::from_lopdf(&doc, &dict).unwrap();
        assert_eq!(
            desc.encoding,
            Some(EncodingSpec::Dictionary {
                base_encoding: Some("MacRomanEncoding".to_string()),
                differences: Some(vec![
                    DifferencesToken::Code(25),
                    DifferencesToken::from("A"),
                    DifferencesToken::from("B"),
                ]),
            })
        );
    }

    #[test]
    fn differences_with_string_entry_is_input_error() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "Encoding" => dictionary! {
                "Differences" => vec![Object::Integer(1), Object::string_literal("A")],
            },
        };
        let err: PdfError = FontDescriptor::from_lopdf(&doc, &dict).unwrap_err().into();
        assert!(matches!(err, PdfError::InvalidDifferences(_)));
        assert!(err.is_input());
    }

    #[test]
    fn missing_subtype_is_parse_error() {
        let doc = Document::with_version("1.5");
        let err = FontDescriptor::from_lopdf(&doc, &dictionary! { "BaseFont" => "X" }).unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn reads_descendant_font_widths() {
        let mut doc = Document::with_version("1.5");
        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "DW" => 1000,
            "W" => vec![
                Object::Integer(1),
                Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
                Object::Integer(10),
                Object::Integer(20),
                Object::Real(750.0),
            ],
            "DW2" => vec![Object::Integer(900), Object::Integer(-1000)],
        });
        let dict = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "MSGothic",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        };
        let desc = FontDescriptor::from_lopdf(&doc, &dict).unwrap();
        let cid = desc.cid.unwrap();
        assert_eq!(cid.default_width, Some(1000.0));
        assert_eq!(
            cid.widths,
            vec![
                WidthToken::Number(1.0),
                WidthToken::Array(vec![500.0, 600.0]),
                WidthToken::Number(10.0),
                WidthToken::Number(20.0),
                WidthToken::Number(750.0),
            ]
        );
        assert_eq!(cid.default_vertical, Some([900.0, -1000.0]));
        assert!(cid.vertical.is_empty());
    }

    // --- Font::new variant selection ---

    #[test]
    fn standard_font_without_widths_uses_built_in_metrics() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        };
        let font = font(&doc, &dict).unwrap();
        assert!(matches!(font.width_calculator(), WidthCalculator::BuiltIn(_)));
        assert_eq!(font.to_utf8(b"Hello").unwrap(), "Hello");
        assert_eq!(font.glyph_width(72), 722.0);
        assert_eq!(font.glyph_width(0x80), 556.0);
    }

    #[test]
    fn subset_standard_font_uses_built_in_metrics() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! { "Subtype" => "Type1", "BaseFont" => "XYZABC+Times-Roman" };
        let font = font(&doc, &dict).unwrap();
        assert!(matches!(font.width_calculator(), WidthCalculator::BuiltIn(_)));
        assert_eq!(font.glyph_width(u32::from(b'M')), 889.0);
    }

    #[test]
    fn explicit_widths_win_over_built_in_metrics() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "FirstChar" => 32,
            "Widths" => vec![Object::Integer(300), Object::Integer(400), Object::Integer(500)],
        };
        let font = font(&doc, &dict).unwrap();
        assert!(matches!(
            font.width_calculator(),
            WidthCalculator::TypeOneOrThree(_)
        ));
        assert_eq!(font.glyph_width(34), 500.0);
        assert_eq!(font.glyph_width(65), 0.0);
    }

    #[test]
    fn non_standard_font_without_widths_uses_missing_width() {
        let mut doc = Document::with_version("1.5");
        let desc_id = doc.add_object(dictionary! { "MissingWidth" => 333 });
        let dict = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "Garamond",
            "FontDescriptor" => desc_id,
        };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.glyph_width(65), 333.0);
        assert_eq!(font.glyph_height(65), 0.0);
    }

    #[test]
    fn symbol_font_defaults_to_its_own_encoding() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! { "Subtype" => "Type1", "BaseFont" => "Symbol" };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.encoding().name(), EncodingName::Symbol);
        assert_eq!(font.to_utf8(b"a").unwrap(), "\u{03B1}");
    }

    #[test]
    fn zapf_dingbats_subset_defaults_to_its_own_encoding() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! { "Subtype" => "Type1", "BaseFont" => "ABCDEF+ZapfDingbats" };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.encoding().name(), EncodingName::ZapfDingbats);

        let dict = dictionary! { "Subtype" => "Type1", "BaseFont" => "Courier" };
        let font = self::font(&doc, &dict).unwrap();
        assert_eq!(font.encoding().name(), EncodingName::Standard);
    }

    #[test]
    fn unknown_encoding_name_fails_font_construction() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "KlingonEncoding",
        };
        let err = font(&doc, &dict).unwrap_err();
        assert_eq!(err, PdfError::UnknownEncoding("KlingonEncoding".to_string()));
    }

    #[test]
    fn differences_decode_through_font() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => dictionary! {
                "Differences" => vec![Object::Integer(1), name("H"), name("i")],
            },
        };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.to_utf8(&[1, 2]).unwrap(), "Hi");
        assert_eq!(&*font.glyph_text(1).unwrap(), "H");
        assert_eq!(font.glyph_width(1), 722.0);
    }

    // --- composite fonts ---

    fn identity_font(doc: &mut Document, with_cmap: bool) -> lopdf::Dictionary {
        let cid_font_id = doc.add_object(dictionary! {
            "Subtype" => "CIDFontType2",
            "W" => vec![
                Object::Integer(3),
                Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            ],
        });
        let mut dict = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "ABCDEF+NotoSansCJK",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        };
        if with_cmap {
            let cmap_id = to_unicode_stream(
                doc,
                "beginbfchar\n<0003> <0048>\n<0004> <4E2D>\nendbfchar\n",
            );
            dict.set("ToUnicode", cmap_id);
        }
        dict
    }

    #[test]
    fn identity_font_decodes_through_to_unicode() {
        let mut doc = Document::with_version("1.5");
        let dict = identity_font(&mut doc, true);
        let font = font(&doc, &dict).unwrap();
        assert!(font.has_to_unicode());
        assert_eq!(font.unpack(&[0x00, 0x03, 0x00, 0x04]), vec![3, 4]);
        assert_eq!(font.to_utf8(&[0x00, 0x03, 0x00, 0x04]).unwrap(), "H\u{4E2D}");
        assert_eq!(&*font.glyph_text(4).unwrap(), "\u{4E2D}");
        assert_eq!(&*font.glyph_text(9).unwrap(), "\u{25AF}");
        assert_eq!(font.glyph_width(3), 500.0);
        assert_eq!(font.glyph_width(4), 600.0);
        assert_eq!(font.glyph_width(5), 1000.0);
        assert!(!font.is_vertical());
    }

    #[test]
    fn identity_font_without_to_unicode_is_configuration_error() {
        let mut doc = Document::with_version("1.5");
        let dict = identity_font(&mut doc, false);
        let font = font(&doc, &dict).unwrap();
        let err = font.to_utf8(&[0x00, 0x03]).unwrap_err();
        assert!(matches!(err, PdfError::MissingCMap { .. }));
        assert!(font.glyph_text(3).unwrap_err().is_configuration());
    }

    #[test]
    fn bad_to_unicode_entry_keeps_the_rest_of_the_map() {
        let mut doc = Document::with_version("1.5");
        let mut dict = identity_font(&mut doc, false);
        let cmap_id = to_unicode_stream(
            &mut doc,
            "beginbfchar\n<0003> <0048>\n<0004> <D800>\nendbfchar\n",
        );
        dict.set("ToUnicode", cmap_id);
        let font = font(&doc, &dict).unwrap();
        assert!(font.has_to_unicode());
        assert_eq!(font.to_utf8(&[0x00, 0x03]).unwrap(), "H");
        assert_eq!(&*font.glyph_text(4).unwrap(), "\u{25AF}");
    }

    #[test]
    fn extreme_first_char_falls_back_to_missing_width() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "Garamond",
            "FirstChar" => Object::Integer(i64::MIN),
            "Widths" => vec![Object::Integer(500)],
        };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.glyph_width(0), 0.0);
        assert_eq!(font.glyph_width(65), 0.0);
    }

    #[test]
    fn vertical_font_reports_height_and_position() {
        let mut doc = Document::with_version("1.5");
        let cid_font_id = doc.add_object(dictionary! {
            "Subtype" => "CIDFontType0",
            "W2" => vec![
                Object::Integer(7),
                Object::Array(vec![
                    Object::Integer(-900),
                    Object::Integer(500),
                    Object::Integer(880),
                ]),
            ],
        });
        let dict = dictionary! {
            "Subtype" => "Type0",
            "Encoding" => "Identity-V",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        };
        let font = font(&doc, &dict).unwrap();
        assert!(font.is_vertical());
        assert_eq!(font.glyph_height(7), -900.0);
        assert_eq!(font.glyph_height(8), -1000.0);
        assert_eq!(font.glyph_position(7), Point::new(500.0, 880.0));
        assert_eq!(font.glyph_position(8), Point::new(500.0, 880.0));
    }

    #[test]
    fn to_unicode_overrides_simple_font_encoding() {
        let mut doc = Document::with_version("1.5");
        let cmap_id = to_unicode_stream(&mut doc, "beginbfchar\n<01> <00660069>\nendbfchar\n");
        let dict = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "Calibri",
            "Encoding" => "WinAnsiEncoding",
            "ToUnicode" => cmap_id,
        };
        let font = font(&doc, &dict).unwrap();
        assert_eq!(font.to_utf8(&[0x01, b'x']).unwrap(), "fix");
    }

    #[test]
    fn malformed_to_unicode_is_ignored() {
        let mut doc = Document::with_version("1.5");
        let cmap_id = to_unicode_stream(&mut doc, "beginbfchar\n<ZZ> <0041>\nendbfchar\n");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "ToUnicode" => cmap_id,
        };
        let font = font(&doc, &dict).unwrap();
        assert!(!font.has_to_unicode());
        assert_eq!(font.to_utf8(b"ok").unwrap(), "ok");
    }

    #[test]
    fn font_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Font>();
    }
}
