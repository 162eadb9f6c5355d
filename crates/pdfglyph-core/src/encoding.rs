//! PDF text encodings and glyph resolution.
//!
//! Implements the named simple encodings (StandardEncoding, WinAnsiEncoding,
//! MacRomanEncoding, MacExpertEncoding, PDFDocEncoding, SymbolEncoding,
//! ZapfDingbatsEncoding), the 2-byte Identity-H/V and UTF16Encoding schemes,
//! Differences arrays, and the per-font [`Encoding`] resolver that turns
//! shown byte strings into Unicode text.
//!
//! Tables are loaded lazily through an [`EncodingStore`], which memoizes one
//! immutable [`EncodingTable`] per encoding name.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use crate::assets::{AssetSource, parse_table};
use crate::cache::SingleFlight;
use crate::error::PdfError;
use crate::glyph::{GlyphList, GlyphName};

/// Codepoint substituted for control codes and undecodable input (`▯`).
pub const UNKNOWN_CHAR: u32 = 0x25AF;

/// Control codes normalized to [`UNKNOWN_CHAR`] when no table entry exists.
///
/// Tab, line feed and carriage return are deliberately absent.
pub const CONTROL_CODES: [u32; 29] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28,
    29, 30, 31,
];

fn is_control(code: u32) -> bool {
    CONTROL_CODES.contains(&code)
}

fn unknown_char() -> char {
    char::from_u32(UNKNOWN_CHAR).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// A supported encoding name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingName {
    /// StandardEncoding: Adobe standard Latin encoding.
    Standard,
    /// WinAnsiEncoding: Windows code page 1252 superset.
    WinAnsi,
    /// MacRomanEncoding: Classic Mac OS Roman.
    MacRoman,
    /// MacExpertEncoding: Mac expert glyph set (small caps, fractions, etc.).
    MacExpert,
    /// PDFDocEncoding: the encoding of PDF text strings.
    PdfDoc,
    /// Built-in encoding of the Symbol font.
    Symbol,
    /// Built-in encoding of the ZapfDingbats font.
    ZapfDingbats,
    /// Identity-H: 2-byte codes, horizontal writing.
    IdentityH,
    /// Identity-V: 2-byte codes, vertical writing.
    IdentityV,
    /// UTF16Encoding: 2-byte big-endian UTF-16 code units.
    Utf16,
}

impl EncodingName {
    /// All supported names, single-byte tables first.
    pub const ALL: [EncodingName; 10] = [
        EncodingName::Standard,
        EncodingName::WinAnsi,
        EncodingName::MacRoman,
        EncodingName::MacExpert,
        EncodingName::PdfDoc,
        EncodingName::Symbol,
        EncodingName::ZapfDingbats,
        EncodingName::IdentityH,
        EncodingName::IdentityV,
        EncodingName::Utf16,
    ];

    /// Parse the name as it appears in a PDF `/Encoding` entry.
    pub fn from_pdf_name(name: &str) -> Result<Self, PdfError> {
        let name = match name {
            "StandardEncoding" => EncodingName::Standard,
            "WinAnsiEncoding" => EncodingName::WinAnsi,
            "MacRomanEncoding" => EncodingName::MacRoman,
            "MacExpertEncoding" => EncodingName::MacExpert,
            "PDFDocEncoding" => EncodingName::PdfDoc,
            "SymbolEncoding" => EncodingName::Symbol,
            "ZapfDingbatsEncoding" => EncodingName::ZapfDingbats,
            "Identity-H" => EncodingName::IdentityH,
            "Identity-V" => EncodingName::IdentityV,
            "UTF16Encoding" => EncodingName::Utf16,
            other => return Err(PdfError::UnknownEncoding(other.to_string())),
        };
        Ok(name)
    }

    /// The PDF name of this encoding.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            EncodingName::Standard => "StandardEncoding",
            EncodingName::WinAnsi => "WinAnsiEncoding",
            EncodingName::MacRoman => "MacRomanEncoding",
            EncodingName::MacExpert => "MacExpertEncoding",
            EncodingName::PdfDoc => "PDFDocEncoding",
            EncodingName::Symbol => "SymbolEncoding",
            EncodingName::ZapfDingbats => "ZapfDingbatsEncoding",
            EncodingName::IdentityH => "Identity-H",
            EncodingName::IdentityV => "Identity-V",
            EncodingName::Utf16 => "UTF16Encoding",
        }
    }

    /// Whether shown strings are unpacked as 2-byte big-endian codes.
    pub fn is_two_byte(&self) -> bool {
        matches!(
            self,
            EncodingName::IdentityH | EncodingName::IdentityV | EncodingName::Utf16
        )
    }

    /// Asset path of the backing table, `None` for 2-byte encodings.
    pub fn table_asset(&self) -> Option<&'static str> {
        let path = match self {
            EncodingName::Standard => "encodings/standard.txt",
            EncodingName::WinAnsi => "encodings/win_ansi.txt",
            EncodingName::MacRoman => "encodings/mac_roman.txt",
            EncodingName::MacExpert => "encodings/mac_expert.txt",
            EncodingName::PdfDoc => "encodings/pdf_doc.txt",
            EncodingName::Symbol => "encodings/symbol.txt",
            EncodingName::ZapfDingbats => "encodings/zapf_dingbats.txt",
            EncodingName::IdentityH | EncodingName::IdentityV | EncodingName::Utf16 => {
                return None;
            }
        };
        Some(path)
    }
}

impl FromStr for EncodingName {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pdf_name(s)
    }
}

impl fmt::Display for EncodingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pdf_name())
    }
}

/// The immutable byte table of one named single-byte encoding.
///
/// Maps each byte to a Unicode codepoint and, for encodings whose asset
/// carries glyph names, to a [`GlyphName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingTable {
    name: EncodingName,
    codepoints: Box<[Option<u32>; 256]>,
    glyph_names: Option<BTreeMap<u8, GlyphName>>,
}

impl EncodingTable {
    /// Build a table from asset text. Lines that do not parse are skipped.
    pub fn parse(name: EncodingName, text: &str) -> Result<Self, PdfError> {
        let entries = parse_table(text)?;
        if entries.is_empty() {
            return Err(PdfError::InvalidAsset(format!(
                "encoding table for {name} contains no entries"
            )));
        }

        let mut codepoints = Box::new([None; 256]);
        let mut glyph_names = BTreeMap::new();
        for entry in entries {
            codepoints[usize::from(entry.code)] = Some(entry.codepoint);
            if let Some(glyph) = entry.glyph {
                glyph_names.insert(entry.code, GlyphName::from(glyph));
            }
        }

        Ok(Self {
            name,
            codepoints,
            glyph_names: (!glyph_names.is_empty()).then_some(glyph_names),
        })
    }

    pub fn name(&self) -> EncodingName {
        self.name
    }

    /// The Unicode codepoint recorded for a byte.
    pub fn codepoint(&self, code: u8) -> Option<u32> {
        self.codepoints[usize::from(code)]
    }

    /// The glyph name recorded for a byte.
    pub fn glyph_name(&self, code: u8) -> Option<&GlyphName> {
        self.glyph_names.as_ref()?.get(&code)
    }

    /// Whether this encoding carries a glyph-name table at all.
    pub fn has_glyph_names(&self) -> bool {
        self.glyph_names.is_some()
    }

    /// Number of bytes with a recorded codepoint.
    pub fn len(&self) -> usize {
        self.codepoints.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lazily loaded, memoized encoding tables and glyph list.
///
/// Each table is read from its asset at most once per store, even under
/// concurrent access; later calls share the same [`Arc`]. A store is meant
/// to be scoped to a document or session and passed to whatever builds fonts.
#[derive(Debug, Default)]
pub struct EncodingStore {
    source: AssetSource,
    tables: SingleFlight<EncodingName, EncodingTable>,
    glyphs: SingleFlight<(), GlyphList>,
}

impl EncodingStore {
    pub fn new(source: AssetSource) -> Self {
        Self {
            source,
            tables: SingleFlight::new(),
            glyphs: SingleFlight::new(),
        }
    }

    /// A store backed by the tables compiled into the library.
    pub fn embedded() -> Self {
        Self::new(AssetSource::Embedded)
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Load the table for a single-byte encoding.
    ///
    /// 2-byte encodings have no table and fail with
    /// [`PdfError::UnsupportedMapping`].
    pub fn load(&self, name: EncodingName) -> Result<Arc<EncodingTable>, PdfError> {
        let Some(asset) = name.table_asset() else {
            return Err(PdfError::UnsupportedMapping {
                encoding: name.to_string(),
            });
        };
        self.tables.get_or_try_load(&name, || {
            let table = EncodingTable::parse(name, &self.source.read(asset)?)?;
            tracing::debug!(encoding = %name, entries = table.len(), "loaded encoding table");
            Ok(table)
        })
    }

    /// Load the table for an encoding given by its PDF name.
    pub fn load_named(&self, name: &str) -> Result<Arc<EncodingTable>, PdfError> {
        self.load(EncodingName::from_pdf_name(name)?)
    }

    /// The shared glyph-name to Unicode table.
    pub fn glyph_list(&self) -> Result<Arc<GlyphList>, PdfError> {
        self.glyphs
            .get_or_try_load(&(), || GlyphList::load(&self.source))
    }

    /// Number of assets read so far.
    pub fn loads(&self) -> usize {
        self.tables.loads() + self.glyphs.loads()
    }
}

/// One directive of a `/Differences` array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifferencesToken {
    /// Resets the running byte offset.
    Code(i64),
    /// Assigns a glyph to the running offset, then advances it by one.
    Name(GlyphName),
}

impl From<i64> for DifferencesToken {
    fn from(code: i64) -> Self {
        DifferencesToken::Code(code)
    }
}

impl From<&str> for DifferencesToken {
    fn from(name: &str) -> Self {
        DifferencesToken::Name(GlyphName::from(name))
    }
}

/// A per-font byte to glyph-name override table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Differences {
    entries: BTreeMap<u8, GlyphName>,
}

impl Differences {
    /// Build from directives such as `[25 /A /B 40 /C]`.
    ///
    /// The array must open with a code, codes must lie in 0..=255, and a name
    /// may not be assigned past byte 255. Later assignments to the same byte
    /// win.
    pub fn parse(tokens: &[DifferencesToken]) -> Result<Self, PdfError> {
        let mut entries = BTreeMap::new();
        let mut offset: Option<u32> = None;

        for (i, token) in tokens.iter().enumerate() {
            match token {
                DifferencesToken::Code(code) => {
                    let code = u8::try_from(*code).map_err(|_| {
                        PdfError::InvalidDifferences(format!(
                            "code {code} at index {i} is outside 0..=255"
                        ))
                    })?;
                    offset = Some(u32::from(code));
                }
                DifferencesToken::Name(name) => {
                    let Some(current) = offset else {
                        return Err(PdfError::InvalidDifferences(format!(
                            "glyph /{name} at index {i} is not preceded by a code"
                        )));
                    };
                    let code = u8::try_from(current).map_err(|_| {
                        PdfError::InvalidDifferences(format!(
                            "glyph /{name} at index {i} runs past code 255"
                        ))
                    })?;
                    entries.insert(code, name.clone());
                    offset = Some(current + 1);
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, code: u8) -> Option<&GlyphName> {
        self.entries.get(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &GlyphName)> {
        self.entries.iter().map(|(&code, name)| (code, name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A font's `/Encoding` entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingSpec {
    /// A bare name such as `/WinAnsiEncoding` or `/Identity-H`.
    Named(String),
    /// An encoding dictionary. A missing base means StandardEncoding.
    Dictionary {
        base_encoding: Option<String>,
        differences: Option<Vec<DifferencesToken>>,
    },
}

impl Default for EncodingSpec {
    /// No `/Encoding` entry at all.
    fn default() -> Self {
        EncodingSpec::Dictionary {
            base_encoding: None,
            differences: None,
        }
    }
}

impl EncodingSpec {
    pub fn named(name: impl Into<String>) -> Self {
        EncodingSpec::Named(name.into())
    }
}

/// A character-code to Unicode map supplied alongside a font, typically a
/// parsed `/ToUnicode` CMap.
pub trait ToUnicode: fmt::Debug + Send + Sync {
    /// The Unicode text for a character code, if mapped.
    fn lookup(&self, code: u32) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
enum EncodingKind {
    SingleByte {
        table: Arc<EncodingTable>,
        differences: Option<Differences>,
        mapping: Box<[Option<u32>; 256]>,
    },
    Identity,
    Utf16,
}

/// The resolved encoding of one font.
///
/// Built once per font by [`Encoding::construct`] and shared read-only for
/// the font's lifetime. Per-code string conversions are memoized internally.
#[derive(Debug)]
pub struct Encoding {
    name: EncodingName,
    kind: EncodingKind,
    strings: RwLock<HashMap<u32, Arc<str>>>,
}

impl PartialEq for Encoding {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Encoding {
    /// Resolve an encoding spec against a table store.
    ///
    /// Fails with [`PdfError::UnknownEncoding`] for unsupported names and
    /// [`PdfError::InvalidDifferences`] for malformed Differences arrays.
    pub fn construct(spec: &EncodingSpec, store: &EncodingStore) -> Result<Self, PdfError> {
        let (name, differences) = match spec {
            EncodingSpec::Named(name) => (EncodingName::from_pdf_name(name)?, None),
            EncodingSpec::Dictionary {
                base_encoding,
                differences,
            } => {
                let name = match base_encoding {
                    Some(base) => EncodingName::from_pdf_name(base)?,
                    None => EncodingName::Standard,
                };
                let differences = differences
                    .as_deref()
                    .map(Differences::parse)
                    .transpose()?;
                (name, differences)
            }
        };

        let kind = match name {
            EncodingName::IdentityH | EncodingName::IdentityV | EncodingName::Utf16 => {
                if differences.as_ref().is_some_and(|d| !d.is_empty()) {
                    return Err(PdfError::InvalidDifferences(format!(
                        "{name} does not accept a Differences array"
                    )));
                }
                if name == EncodingName::Utf16 {
                    EncodingKind::Utf16
                } else {
                    EncodingKind::Identity
                }
            }
            _ => {
                let table = store.load(name)?;
                let glyphs = match &differences {
                    Some(d) if !d.is_empty() => Some(store.glyph_list()?),
                    _ => None,
                };
                let mapping = build_mapping(&table, differences.as_ref(), glyphs.as_deref());
                EncodingKind::SingleByte {
                    table,
                    differences,
                    mapping,
                }
            }
        };

        Ok(Self {
            name,
            kind,
            strings: RwLock::new(HashMap::new()),
        })
    }

    /// Shorthand for constructing from a bare encoding name.
    pub fn named(name: &str, store: &EncodingStore) -> Result<Self, PdfError> {
        Self::construct(&EncodingSpec::named(name), store)
    }

    pub fn name(&self) -> EncodingName {
        self.name
    }

    pub fn is_two_byte(&self) -> bool {
        self.name.is_two_byte()
    }

    /// The Differences table, if the font declared one.
    pub fn differences(&self) -> Option<&Differences> {
        match &self.kind {
            EncodingKind::SingleByte { differences, .. } => differences.as_ref(),
            _ => None,
        }
    }

    /// Split a shown string into character codes.
    ///
    /// 2-byte encodings read big-endian pairs; an odd trailing byte is dropped.
    pub fn unpack(&self, bytes: &[u8]) -> Vec<u32> {
        if self.is_two_byte() {
            bytes
                .chunks_exact(2)
                .map(|pair| u32::from(u16::from_be_bytes([pair[0], pair[1]])))
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Convert a shown byte string to UTF-8 text.
    ///
    /// For single-byte encodings, codes found in `to_unicode` take precedence
    /// and the remaining bytes go through the resolved table, falling back to
    /// the raw byte value. Identity encodings require `to_unicode` and fail
    /// with [`PdfError::MissingCMap`] without one; codes it does not map
    /// become [`UNKNOWN_CHAR`]. In every 2-byte encoding an odd trailing byte
    /// becomes [`UNKNOWN_CHAR`].
    pub fn to_utf8(
        &self,
        bytes: &[u8],
        to_unicode: Option<&dyn ToUnicode>,
    ) -> Result<String, PdfError> {
        match &self.kind {
            EncodingKind::SingleByte { mapping, .. } => {
                let mut out = String::with_capacity(bytes.len());
                for &byte in bytes {
                    let code = u32::from(byte);
                    match to_unicode.and_then(|m| m.lookup(code)) {
                        Some(text) => out.push_str(text),
                        None => out.push(to_char(mapping[usize::from(byte)].unwrap_or(code))),
                    }
                }
                Ok(out)
            }
            EncodingKind::Identity => {
                let Some(cmap) = to_unicode else {
                    return Err(PdfError::MissingCMap {
                        encoding: self.name.to_string(),
                    });
                };
                let mut out = String::with_capacity(bytes.len());
                for code in self.unpack(bytes) {
                    match cmap.lookup(code) {
                        Some(text) => out.push_str(text),
                        None => {
                            tracing::trace!(code, encoding = %self.name, "code missing from CMap");
                            out.push(unknown_char());
                        }
                    }
                }
                if bytes.len() % 2 == 1 {
                    out.push(unknown_char());
                }
                Ok(out)
            }
            EncodingKind::Utf16 => {
                let even = bytes.len() - bytes.len() % 2;
                let (decoded, _) =
                    encoding_rs::UTF_16BE.decode_without_bom_handling(&bytes[..even]);
                let mut out: String = decoded
                    .chars()
                    .map(|c| {
                        if is_control(u32::from(c)) {
                            unknown_char()
                        } else {
                            c
                        }
                    })
                    .collect();
                if even != bytes.len() {
                    out.push(unknown_char());
                }
                Ok(out)
            }
        }
    }

    /// The text of a single character code, memoized per code.
    ///
    /// Codes with no resolved mapping fall back to the code itself as a
    /// codepoint, and to [`UNKNOWN_CHAR`] when that is not a valid scalar.
    pub fn int_to_utf8_string(&self, code: u32) -> Arc<str> {
        if let Some(text) = self
            .strings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&code)
        {
            return Arc::clone(text);
        }

        let text: Arc<str> = Arc::from(to_char(self.codepoint(code)).to_string());
        self.strings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(code)
            .or_insert(text)
            .clone()
    }

    fn codepoint(&self, code: u32) -> u32 {
        match &self.kind {
            EncodingKind::SingleByte { mapping, .. } => usize::try_from(code)
                .ok()
                .and_then(|i| mapping.get(i).copied().flatten())
                .unwrap_or(code),
            EncodingKind::Identity | EncodingKind::Utf16 if is_control(code) => UNKNOWN_CHAR,
            EncodingKind::Identity | EncodingKind::Utf16 => code,
        }
    }

    /// The glyph name of a character code.
    ///
    /// Differences entries take precedence over the base table. Identity
    /// encodings always return `None`. An encoding with neither a glyph-name
    /// table nor a Differences array fails with
    /// [`PdfError::UnsupportedMapping`].
    pub fn int_to_name(&self, code: u32) -> Result<Option<&GlyphName>, PdfError> {
        match &self.kind {
            EncodingKind::Identity => Ok(None),
            EncodingKind::Utf16 => Err(PdfError::UnsupportedMapping {
                encoding: self.name.to_string(),
            }),
            EncodingKind::SingleByte {
                table, differences, ..
            } => {
                let byte = u8::try_from(code).ok();
                if let Some(name) = byte.and_then(|b| differences.as_ref()?.get(b)) {
                    return Ok(Some(name));
                }
                if table.has_glyph_names() {
                    return Ok(byte.and_then(|b| table.glyph_name(b)));
                }
                if differences.is_some() {
                    return Ok(None);
                }
                Err(PdfError::UnsupportedMapping {
                    encoding: self.name.to_string(),
                })
            }
        }
    }
}

fn build_mapping(
    table: &EncodingTable,
    differences: Option<&Differences>,
    glyphs: Option<&GlyphList>,
) -> Box<[Option<u32>; 256]> {
    let mut mapping = table.codepoints.clone();

    if let (Some(differences), Some(glyphs)) = (differences, glyphs) {
        for (code, name) in differences.iter() {
            let resolved = glyphs.to_codepoint(name.as_str());
            if resolved.is_none() {
                tracing::trace!(code, glyph = %name, "Differences glyph has no Unicode value");
            }
            mapping[usize::from(code)] = resolved;
        }
    }

    // Fill gaps only; a resolved entry is never replaced.
    for &code in &CONTROL_CODES {
        let slot = &mut mapping[code as usize];
        if slot.is_none() {
            *slot = Some(UNKNOWN_CHAR);
        }
    }

    mapping
}

fn to_char(codepoint: u32) -> char {
    char::from_u32(codepoint).unwrap_or_else(unknown_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MapCMap(HashMap<u32, String>);

    impl ToUnicode for MapCMap {
        fn lookup(&self, code: u32) -> Option<&str> {
            self.0.get(&code).map(String::as_str)
        }
    }

    fn cmap(pairs: &[(u32, &str)]) -> MapCMap {
        MapCMap(pairs.iter().map(|&(c, s)| (c, s.to_string())).collect())
    }

    fn with_differences(base: Option<&str>, tokens: Vec<DifferencesToken>) -> EncodingSpec {
        EncodingSpec::Dictionary {
            base_encoding: base.map(str::to_string),
            differences: Some(tokens),
        }
    }

    // --- EncodingName ---

    #[test]
    fn encoding_names_round_trip() {
        for name in EncodingName::ALL {
            assert_eq!(EncodingName::from_pdf_name(name.as_pdf_name()).unwrap(), name);
        }
        assert_eq!(
            "WinAnsiEncoding".parse::<EncodingName>().unwrap(),
            EncodingName::WinAnsi
        );
    }

    #[test]
    fn unknown_encoding_name_is_configuration_error() {
        let err = EncodingName::from_pdf_name("EBCDICEncoding").unwrap_err();
        assert_eq!(err, PdfError::UnknownEncoding("EBCDICEncoding".to_string()));
        assert!(err.is_configuration());
    }

    // --- Table store ---

    #[test]
    fn store_loads_each_table_once() {
        let store = EncodingStore::embedded();
        let a = store.load(EncodingName::WinAnsi).unwrap();
        let b = store.load_named("WinAnsiEncoding").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.loads(), 1);
    }

    #[test]
    fn store_rejects_table_for_two_byte_encoding() {
        let store = EncodingStore::embedded();
        let err = store.load(EncodingName::IdentityH).unwrap_err();
        assert!(matches!(err, PdfError::UnsupportedMapping { .. }));
    }

    #[test]
    fn all_bundled_tables_load() {
        let store = EncodingStore::embedded();
        for name in EncodingName::ALL.iter().filter(|n| !n.is_two_byte()) {
            let table = store.load(*name).unwrap();
            assert!(table.len() > 100, "{name} has only {} entries", table.len());
            assert_eq!(table.name(), *name);
        }
    }

    #[test]
    fn glyph_name_tables_exist_for_latin_encodings() {
        let store = EncodingStore::embedded();
        assert!(store.load(EncodingName::Standard).unwrap().has_glyph_names());
        assert!(store.load(EncodingName::WinAnsi).unwrap().has_glyph_names());
        assert!(store.load(EncodingName::MacRoman).unwrap().has_glyph_names());
        assert!(!store.load(EncodingName::Symbol).unwrap().has_glyph_names());
        assert!(!store.load(EncodingName::PdfDoc).unwrap().has_glyph_names());
    }

    #[test]
    fn repeated_construct_yields_equal_encodings_without_reloading() {
        let store = EncodingStore::embedded();
        let first = Encoding::named("MacRomanEncoding", &store).unwrap();
        let loads = store.loads();
        let second = Encoding::named("MacRomanEncoding", &store).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.loads(), loads);
    }

    #[test]
    fn table_with_no_entries_is_invalid_asset() {
        let err = EncodingTable::parse(EncodingName::WinAnsi, "# empty\n").unwrap_err();
        assert!(matches!(err, PdfError::InvalidAsset(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn directory_store_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("encodings")).unwrap();
        std::fs::write(
            dir.path().join("encodings/win_ansi.txt"),
            "41;0041;A\nnot a line\n42;0042;B\n",
        )
        .unwrap();
        let store = EncodingStore::new(AssetSource::Directory(dir.path().to_path_buf()));
        let table = store.load(EncodingName::WinAnsi).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.codepoint(0x42), Some(0x42));
    }

    // --- to_utf8 over single-byte tables ---

    #[test]
    fn win_ansi_every_byte_matches_table_or_placeholder() {
        let store = EncodingStore::embedded();
        let table = store.load(EncodingName::WinAnsi).unwrap();
        let enc = Encoding::named("WinAnsiEncoding", &store).unwrap();

        for b in 0..=255u8 {
            let text = enc.to_utf8(&[b], None).unwrap();
            let expected = if is_control(u32::from(b)) {
                UNKNOWN_CHAR
            } else {
                table.codepoint(b).unwrap_or(u32::from(b))
            };
            assert_eq!(
                text.chars().collect::<Vec<_>>(),
                vec![char::from_u32(expected).unwrap()],
                "byte {b:#04x}"
            );
        }
    }

    #[test]
    fn win_ansi_decodes_hello_and_specials() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("WinAnsiEncoding", &store).unwrap();
        assert_eq!(enc.to_utf8(b"Hello", None).unwrap(), "Hello");
        assert_eq!(enc.to_utf8(&[0x80, 0x93, 0x94], None).unwrap(), "\u{20AC}\u{201C}\u{201D}");
    }

    #[test]
    fn control_codes_become_placeholder_but_whitespace_does_not() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("StandardEncoding", &store).unwrap();
        assert_eq!(enc.to_utf8(&[0x01, 0x1F], None).unwrap(), "\u{25AF}\u{25AF}");
        assert_eq!(enc.to_utf8(&[0x09, 0x0A, 0x0D], None).unwrap(), "\t\n\r");
    }

    #[test]
    fn pdf_doc_table_entries_in_control_range_are_kept() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("PDFDocEncoding", &store).unwrap();
        // 0x18 is breve in PDFDocEncoding; gap filling must not replace it
        assert_eq!(enc.to_utf8(&[0x18, 0x01], None).unwrap(), "\u{02D8}\u{25AF}");
    }

    #[test]
    fn mac_roman_high_bytes() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("MacRomanEncoding", &store).unwrap();
        assert_eq!(enc.to_utf8(&[0x80, 0x8E, 0xA5], None).unwrap(), "\u{00C4}\u{00E9}\u{2022}");
    }

    #[test]
    fn missing_encoding_defaults_to_standard() {
        let store = EncodingStore::embedded();
        let enc = Encoding::construct(&EncodingSpec::default(), &store).unwrap();
        assert_eq!(enc.name(), EncodingName::Standard);
        // StandardEncoding maps 0x27 to quoteright, not the ASCII apostrophe
        assert_eq!(enc.to_utf8(b"'", None).unwrap(), "\u{2019}");
    }

    #[test]
    fn to_unicode_overrides_single_byte_table() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("WinAnsiEncoding", &store).unwrap();
        let map = cmap(&[(0x41, "\u{0391}"), (0x66, "ff")]);
        assert_eq!(enc.to_utf8(b"ABf", Some(&map)).unwrap(), "\u{0391}Bff");
    }

    // --- Differences ---

    #[test]
    fn differences_assign_sequentially_from_code() {
        let diff = Differences::parse(&[25_i64.into(), "A".into(), "B".into()]).unwrap();
        assert_eq!(diff.get(25), Some(&GlyphName::from("A")));
        assert_eq!(diff.get(26), Some(&GlyphName::from("B")));
        assert_eq!(diff.len(), 2);
    }

    #[test]
    fn differences_code_resets_offset() {
        let diff =
            Differences::parse(&[65_i64.into(), "x".into(), "y".into(), 10_i64.into(), "z".into()])
                .unwrap();
        assert_eq!(diff.get(65).unwrap().as_str(), "x");
        assert_eq!(diff.get(66).unwrap().as_str(), "y");
        assert_eq!(diff.get(10).unwrap().as_str(), "z");
        assert_eq!(diff.get(11), None);
    }

    #[test]
    fn differences_later_assignment_wins() {
        let diff =
            Differences::parse(&[65_i64.into(), "x".into(), 65_i64.into(), "y".into()]).unwrap();
        assert_eq!(diff.get(65).unwrap().as_str(), "y");
    }

    #[test]
    fn differences_must_start_with_code() {
        let err = Differences::parse(&["A".into(), 65_i64.into()]).unwrap_err();
        assert!(matches!(err, PdfError::InvalidDifferences(_)));
        assert!(err.is_input());
    }

    #[test]
    fn differences_reject_out_of_range_code() {
        assert!(Differences::parse(&[256_i64.into(), "A".into()]).is_err());
        assert!(Differences::parse(&[(-1_i64).into(), "A".into()]).is_err());
    }

    #[test]
    fn differences_reject_assignment_past_255() {
        let err = Differences::parse(&[255_i64.into(), "A".into(), "B".into()]).unwrap_err();
        assert!(err.to_string().contains("past code 255"));
    }

    #[test]
    fn int_to_name_prefers_differences() {
        let store = EncodingStore::embedded();
        let spec = with_differences(
            Some("WinAnsiEncoding"),
            vec![25_i64.into(), "A".into(), "B".into()],
        );
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(enc.int_to_name(25).unwrap().map(GlyphName::as_str), Some("A"));
        assert_eq!(enc.int_to_name(26).unwrap().map(GlyphName::as_str), Some("B"));
        // untouched codes still come from the base table
        assert_eq!(enc.int_to_name(65).unwrap().map(GlyphName::as_str), Some("A"));
        assert_eq!(enc.int_to_name(0x80).unwrap().map(GlyphName::as_str), Some("Euro"));
    }

    #[test]
    fn differences_override_mapping_even_for_control_codes() {
        let store = EncodingStore::embedded();
        let spec = with_differences(None, vec![25_i64.into(), "A".into(), "B".into()]);
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(enc.to_utf8(&[25, 26, 27], None).unwrap(), "AB\u{25AF}");
    }

    #[test]
    fn differences_with_unresolvable_name_fall_back_to_raw_byte() {
        let store = EncodingStore::embedded();
        let spec = with_differences(
            Some("WinAnsiEncoding"),
            vec![0x41_i64.into(), "g42".into(), 0x02_i64.into(), "g43".into()],
        );
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(enc.to_utf8(&[0x41, 0x02], None).unwrap(), "A\u{25AF}");
    }

    #[test]
    fn differences_resolve_cyrillic_and_latin_extended_names() {
        let store = EncodingStore::embedded();
        let spec = with_differences(
            Some("WinAnsiEncoding"),
            vec![192_i64.into(), "afii10017".into(), "Gbreve".into(), "afii10071".into()],
        );
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(
            enc.to_utf8(&[0xC0, 0xC1, 0xC2], None).unwrap(),
            "\u{0410}\u{011E}\u{0451}"
        );
    }

    #[test]
    fn differences_resolve_uni_names() {
        let store = EncodingStore::embedded();
        let spec = with_differences(None, vec![0x61_i64.into(), "uni03B1".into()]);
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(enc.to_utf8(b"ab", None).unwrap(), "\u{03B1}b");
    }

    #[test]
    fn invalid_differences_fail_construction() {
        let store = EncodingStore::embedded();
        let spec = with_differences(None, vec!["A".into()]);
        let err = Encoding::construct(&spec, &store).unwrap_err();
        assert!(err.is_input());
    }

    // --- int_to_name ---

    #[test]
    fn int_to_name_without_name_table_is_unsupported() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("SymbolEncoding", &store).unwrap();
        let err = enc.int_to_name(0x61).unwrap_err();
        assert!(matches!(err, PdfError::UnsupportedMapping { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn int_to_name_without_name_table_uses_differences_only() {
        let store = EncodingStore::embedded();
        let spec = with_differences(
            Some("MacExpertEncoding"),
            vec![0x41_i64.into(), "alpha".into()],
        );
        let enc = Encoding::construct(&spec, &store).unwrap();
        assert_eq!(enc.int_to_name(0x41).unwrap().map(GlyphName::as_str), Some("alpha"));
        assert_eq!(enc.int_to_name(0x42).unwrap(), None);
    }

    #[test]
    fn int_to_name_identity_is_none() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("Identity-H", &store).unwrap();
        assert_eq!(enc.int_to_name(0x0041).unwrap(), None);
    }

    #[test]
    fn int_to_name_out_of_byte_range_is_none() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("StandardEncoding", &store).unwrap();
        assert_eq!(enc.int_to_name(300).unwrap(), None);
    }

    // --- int_to_utf8_string ---

    #[test]
    fn int_to_utf8_string_is_memoized() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("WinAnsiEncoding", &store).unwrap();
        let a = enc.int_to_utf8_string(0x80);
        let b = enc.int_to_utf8_string(0x80);
        assert_eq!(&*a, "\u{20AC}");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn int_to_utf8_string_fallbacks() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("WinAnsiEncoding", &store).unwrap();
        assert_eq!(&*enc.int_to_utf8_string(0x03), "\u{25AF}");
        assert_eq!(&*enc.int_to_utf8_string(0x81), "\u{0081}");
        assert_eq!(&*enc.int_to_utf8_string(0x4E2D), "\u{4E2D}");
        assert_eq!(&*enc.int_to_utf8_string(0xD800), "\u{25AF}");
    }

    // --- 2-byte encodings ---

    #[test]
    fn identity_without_cmap_is_configuration_error() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("Identity-H", &store).unwrap();
        let err = enc.to_utf8(&[0x00, 0x41], None).unwrap_err();
        assert_eq!(
            err,
            PdfError::MissingCMap {
                encoding: "Identity-H".to_string()
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn identity_decodes_through_cmap() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("Identity-V", &store).unwrap();
        let map = cmap(&[(0x0003, "H"), (0x0104, "\u{4E2D}")]);
        let text = enc.to_utf8(&[0x00, 0x03, 0x01, 0x04, 0x09, 0x99], Some(&map)).unwrap();
        assert_eq!(text, "H\u{4E2D}\u{25AF}");
    }

    #[test]
    fn identity_odd_trailing_byte_is_placeholder() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("Identity-H", &store).unwrap();
        let map = cmap(&[(0x0003, "H")]);
        assert_eq!(enc.to_utf8(&[0x00, 0x03, 0x00], Some(&map)).unwrap(), "H\u{25AF}");
        assert_eq!(enc.unpack(&[0x00, 0x03, 0x00]), vec![3]);
    }

    #[test]
    fn identity_rejects_differences() {
        let store = EncodingStore::embedded();
        let spec = with_differences(Some("Identity-H"), vec![1_i64.into(), "A".into()]);
        assert!(Encoding::construct(&spec, &store).unwrap_err().is_input());
    }

    #[test]
    fn utf16_decodes_without_cmap() {
        let store = EncodingStore::embedded();
        let enc = Encoding::named("UTF16Encoding", &store).unwrap();
        assert_eq!(enc.to_utf8(&[0x00, 0x48, 0x00, 0x69], None).unwrap(), "Hi");
        assert_eq!(
            enc.to_utf8(&[0xD8, 0x3D, 0xDE, 0x00], None).unwrap(),
            "\u{1F600}"
        );
        assert_eq!(enc.to_utf8(&[0x00, 0x48, 0x00], None).unwrap(), "H\u{25AF}");
        assert_eq!(enc.to_utf8(&[0x00, 0x07], None).unwrap(), "\u{25AF}");
    }

    #[test]
    fn unpack_single_and_two_byte() {
        let store = EncodingStore::embedded();
        let single = Encoding::named("WinAnsiEncoding", &store).unwrap();
        let double = Encoding::named("Identity-H", &store).unwrap();
        assert_eq!(single.unpack(&[0x01, 0xFF]), vec![1, 255]);
        assert_eq!(double.unpack(&[0x01, 0xFF]), vec![0x01FF]);
        assert!(double.is_two_byte());
        assert!(!single.is_two_byte());
    }

    #[test]
    fn encoding_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Encoding>();
        assert_send_sync::<EncodingStore>();
    }
}
