//! ToUnicode CMap parser for mapping character codes to Unicode strings.
//!
//! Parses CMap data embedded in PDF `/ToUnicode` streams. Supports
//! `beginbfchar`/`endbfchar` (single mappings) and `beginbfrange`/`endbfrange`
//! (range and array mappings) with UTF-16BE encoded destinations. The parsed
//! [`CMap`] is the [`ToUnicode`] collaborator handed to an
//! [`Encoding`](pdfglyph_core::Encoding).

use std::collections::HashMap;

use pdfglyph_core::ToUnicode;

use crate::error::BackendError;

/// Ranges wider than this are treated as malformed and skipped.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// A parsed ToUnicode CMap.
///
/// Character codes are 1 or 2 bytes from the font's encoding. Unicode values
/// may be single characters or multi-character strings (ligatures such as
/// "fi" map to two characters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its raw byte content.
    ///
    /// Malformed entries are skipped one by one. Parsing fails only when
    /// entries were present but none of them could be used.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();
        let mut first_error = None;

        for section in sections(&text, "beginbfchar", "endbfchar") {
            for line in entry_lines(section) {
                if let Err(e) = parse_bfchar_line(line, &mut mappings) {
                    tracing::trace!(line, error = %e, "bfchar entry skipped");
                    first_error = first_error.or(Some(e));
                }
            }
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            for line in entry_lines(section) {
                if let Err(e) = parse_bfrange_line(line, &mut mappings) {
                    tracing::trace!(line, error = %e, "bfrange entry skipped");
                    first_error = first_error.or(Some(e));
                }
            }
        }

        match first_error {
            Some(e) if mappings.is_empty() => Err(e),
            _ => Ok(CMap { mappings }),
        }
    }

    /// Look up the Unicode string for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl ToUnicode for CMap {
    fn lookup(&self, code: u32) -> Option<&str> {
        CMap::lookup(self, code)
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for CMap {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        CMap {
            mappings: iter.into_iter().map(|(c, s)| (c, s.into())).collect(),
        }
    }
}

/// Bodies of every `begin ... end` section, in order.
fn sections<'a>(text: &'a str, begin: &'a str, end: &'a str) -> impl Iterator<Item = &'a str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find(begin)? + begin.len();
        let len = rest[start..].find(end)?;
        let body = &rest[start..start + len];
        rest = &rest[start + len + end.len()..];
        Some(body)
    })
}

/// Parse a hex string like "0041" into a u32 character code.
fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid hex code '{hex}': {e}")))
}

/// Parse a hex string into UTF-16BE code units.
///
/// A 2-digit value such as `41` is read as the single unit `0041`.
fn parse_utf16_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    if hex.len() == 2 {
        return Ok(vec![u16::from(
            u8::from_str_radix(hex, 16)
                .map_err(|e| BackendError::Parse(format!("invalid hex '{hex}': {e}")))?,
        )]);
    }
    if hex.len() % 4 != 0 || !hex.is_ascii() {
        return Err(BackendError::Parse(format!(
            "UTF-16BE hex string must have length divisible by 4, got '{hex}' (len={})",
            hex.len()
        )));
    }
    (0..hex.len())
        .step_by(4)
        .map(|i| {
            let chunk = &hex[i..i + 4];
            u16::from_str_radix(chunk, 16)
                .map_err(|e| BackendError::Parse(format!("invalid hex in UTF-16BE '{chunk}': {e}")))
        })
        .collect()
}

fn decode_utf16be_hex(hex: &str) -> Result<String, BackendError> {
    String::from_utf16(&parse_utf16_units(hex)?)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence <{hex}>: {e}")))
}

/// Extract all `<hex>` tokens from a line of text.
fn extract_hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(rest[start + 1..start + 1 + end].trim());
        rest = &rest[start + 1 + end + 1..];
    }
    tokens
}

/// Lines of a section that carry at least one hex token.
fn entry_lines(section: &str) -> impl Iterator<Item = &str> {
    section.lines().map(str::trim).filter(|l| l.contains('<'))
}

/// Parse one bfchar entry: `<srcCode> <dstUnicode>`.
fn parse_bfchar_line(line: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    if let [src, dst, ..] = extract_hex_tokens(line)[..] {
        mappings.insert(parse_hex_code(src)?, decode_utf16be_hex(dst)?);
    }
    Ok(())
}

/// Parse one bfrange entry.
///
/// The entry has format `<srcLow> <srcHigh> <dstStart>`
/// or `<srcLow> <srcHigh> [<str1> <str2> ...]`. Array elements that do not
/// decode are skipped without dropping their neighbours.
fn parse_bfrange_line(line: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    let (head, array) = match line.split_once('[') {
        Some((head, tail)) => (head, Some(tail.split(']').next().unwrap_or(tail))),
        None => (line, None),
    };
    let tokens = extract_hex_tokens(head);
    let [low, high, ..] = tokens[..] else {
        return Ok(());
    };
    let low = parse_hex_code(low)?;
    let high = parse_hex_code(high)?;
    if high < low || high - low >= MAX_RANGE_LEN {
        tracing::trace!(low, high, "bfrange with unusable bounds skipped");
        return Ok(());
    }

    if let Some(array) = array {
        for (code, dst) in (low..=high).zip(extract_hex_tokens(array)) {
            match decode_utf16be_hex(dst) {
                Ok(text) => {
                    mappings.insert(code, text);
                }
                Err(e) => tracing::trace!(code, error = %e, "bfrange array element skipped"),
            }
        }
        return Ok(());
    }

    let Some(dst) = tokens.get(2) else {
        return Ok(());
    };
    // The last code unit of the destination increments across the range.
    let units = parse_utf16_units(dst)?;
    let Some((&last, prefix)) = units.split_last() else {
        return Ok(());
    };
    for offset in 0..=(high - low) {
        let Ok(unit) = u16::try_from(u32::from(last) + offset) else {
            break;
        };
        let mut seq = prefix.to_vec();
        seq.push(unit);
        if let Ok(text) = String::from_utf16(&seq) {
            mappings.insert(low + offset, text);
        }
    }
    Ok(())
}
