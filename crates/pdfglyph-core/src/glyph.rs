//! Glyph names and the glyph-name to Unicode table.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use crate::assets::{AssetSource, GLYPH_LIST_FILE, parse_glyph_list};
use crate::error::PdfError;

/// A PostScript glyph name such as `A`, `space` or `uni20AC`.
///
/// Glyph names are the interchange format between encodings, Differences
/// arrays, font metrics and the Unicode table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GlyphName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for GlyphName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlyphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps glyph names to Unicode codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphList {
    names: HashMap<String, u32>,
}

impl GlyphList {
    /// Load the glyph list from an asset source.
    pub fn load(source: &AssetSource) -> Result<Self, PdfError> {
        let text = source.read(GLYPH_LIST_FILE)?;
        let glyphs = Self::parse(&text)?;
        if glyphs.is_empty() {
            return Err(PdfError::InvalidAsset(format!(
                "{GLYPH_LIST_FILE} contains no entries"
            )));
        }
        tracing::debug!(entries = glyphs.len(), "loaded glyph list");
        Ok(glyphs)
    }

    /// Parse glyph list text. Lines that are not `name;HEX` are skipped.
    pub fn parse(text: &str) -> Result<Self, PdfError> {
        Ok(Self {
            names: parse_glyph_list(text)?.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a glyph name to a Unicode codepoint.
    ///
    /// Handles, in order:
    /// - names present in the list
    /// - `uniXXXX` (first code unit of a `uniXXXXYYYY...` sequence)
    /// - `uXXXX` to `uXXXXXX`
    /// - `name.suffix` variants, resolved by their base name
    pub fn to_codepoint(&self, name: &str) -> Option<u32> {
        if let Some(&cp) = self.names.get(name) {
            return Some(cp);
        }
        if let Some(cp) = numeric_name(name) {
            return Some(cp);
        }
        match name.split_once('.') {
            Some((base, _)) if !base.is_empty() => self.to_codepoint(base),
            _ => None,
        }
    }
}

fn numeric_name(name: &str) -> Option<u32> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() >= 4 && hex.len() % 4 == 0 && is_upper_hex(hex) {
            return valid_scalar(u32::from_str_radix(&hex[..4], 16).ok()?);
        }
        return None;
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && is_upper_hex(hex) {
            return valid_scalar(u32::from_str_radix(hex, 16).ok()?);
        }
    }
    None
}

fn is_upper_hex(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

fn valid_scalar(cp: u32) -> Option<u32> {
    char::from_u32(cp).map(u32::from)
}
