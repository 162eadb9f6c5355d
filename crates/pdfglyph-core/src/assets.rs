//! Flat-text asset parsing for encoding tables and the glyph list.
//!
//! Encoding tables hold one `HEXBYTE;HEXUNICODE[;glyphname]` entry per line.
//! The glyph list holds one `glyphname;HEXUNICODE` entry per line. Lines that
//! do not match (comments, blanks, junk) are skipped. The copies shipped with
//! the library are compiled in; [`AssetSource::Directory`] reads the same file
//! names from disk instead.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PdfError;

/// Name of the glyph list asset.
pub const GLYPH_LIST_FILE: &str = "glyphlist.txt";

static TABLE_LINE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2});([0-9A-Fa-f]{4,6})(?:;([A-Za-z0-9_.]+))?\s*$")
});

static GLYPH_LINE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.]+);([0-9A-Fa-f]{4,6})\s*$"));

fn pattern(re: &'static Result<Regex, regex::Error>) -> Result<&'static Regex, PdfError> {
    re.as_ref()
        .map_err(|e| PdfError::InvalidAsset(format!("asset line pattern: {e}")))
}

/// Where encoding tables and the glyph list are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssetSource {
    /// The tables compiled into the library.
    #[default]
    Embedded,
    /// A directory containing `encodings/<table>.txt` and `glyphlist.txt`.
    Directory(PathBuf),
}

impl AssetSource {
    /// Read an asset by its path relative to the asset root.
    pub fn read(&self, relative: &str) -> Result<String, PdfError> {
        match self {
            AssetSource::Embedded => embedded(relative)
                .map(str::to_string)
                .ok_or_else(|| PdfError::IoError(format!("no bundled asset {relative}"))),
            AssetSource::Directory(root) => read_file(&root.join(relative)),
        }
    }
}

fn read_file(path: &Path) -> Result<String, PdfError> {
    std::fs::read_to_string(path)
        .map_err(|e| PdfError::IoError(format!("{}: {e}", path.display())))
}

fn embedded(relative: &str) -> Option<&'static str> {
    let text = match relative {
        "encodings/standard.txt" => include_str!("../assets/encodings/standard.txt"),
        "encodings/win_ansi.txt" => include_str!("../assets/encodings/win_ansi.txt"),
        "encodings/mac_roman.txt" => include_str!("../assets/encodings/mac_roman.txt"),
        "encodings/mac_expert.txt" => include_str!("../assets/encodings/mac_expert.txt"),
        "encodings/pdf_doc.txt" => include_str!("../assets/encodings/pdf_doc.txt"),
        "encodings/symbol.txt" => include_str!("../assets/encodings/symbol.txt"),
        "encodings/zapf_dingbats.txt" => include_str!("../assets/encodings/zapf_dingbats.txt"),
        GLYPH_LIST_FILE => include_str!("../assets/glyphlist.txt"),
        _ => return None,
    };
    Some(text)
}

/// One parsed encoding table line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub code: u8,
    pub codepoint: u32,
    pub glyph: Option<String>,
}

/// Parse an encoding table, skipping lines that do not match.
pub fn parse_table(text: &str) -> Result<Vec<TableEntry>, PdfError> {
    let re = pattern(&TABLE_LINE)?;
    Ok(text
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line.trim_start())?;
            let code = u8::from_str_radix(&caps[1], 16).ok()?;
            let codepoint = u32::from_str_radix(&caps[2], 16).ok()?;
            Some(TableEntry {
                code,
                codepoint,
                glyph: caps.get(3).map(|m| m.as_str().to_string()),
            })
        })
        .collect())
}

/// Parse the glyph list into `(name, codepoint)` pairs.
pub fn parse_glyph_list(text: &str) -> Result<Vec<(String, u32)>, PdfError> {
    let re = pattern(&GLYPH_LINE)?;
    Ok(text
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line.trim_start())?;
            let codepoint = u32::from_str_radix(&caps[2], 16).ok()?;
            Some((caps[1].to_string(), codepoint))
        })
        .collect())
}
