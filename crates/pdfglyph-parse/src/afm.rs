//! Adobe Font Metrics (AFM) parsing.
//!
//! Reads the header keys and the `StartCharMetrics` section of an AFM file
//! into [`AfmMetrics`], which answers advance-width queries by character
//! code or by glyph name. Widths are in 1/1000 em-square units.

use std::collections::HashMap;

use pdfglyph_core::GlyphName;

use crate::error::BackendError;

/// Parsed metrics of one font.
#[derive(Debug, Clone, PartialEq)]
pub struct AfmMetrics {
    font_name: String,
    font_bbox: Option<[f64; 4]>,
    ascender: Option<f64>,
    descender: Option<f64>,
    cap_height: Option<f64>,
    x_height: Option<f64>,
    italic_angle: f64,
    is_fixed_pitch: bool,
    /// Widths keyed by the font's built-in character code.
    by_code: HashMap<u32, f64>,
    by_name: HashMap<GlyphName, f64>,
}

impl AfmMetrics {
    /// Parse AFM text.
    ///
    /// The text must start with `StartFontMetrics` and contain at least one
    /// character metric. Unknown keys are ignored, as are character metric
    /// lines without a `WX` width.
    pub fn parse(text: &str) -> Result<Self, BackendError> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        match lines.next() {
            Some(first) if first.starts_with("StartFontMetrics") => {}
            _ => {
                return Err(BackendError::Font(
                    "AFM data does not start with StartFontMetrics".to_string(),
                ));
            }
        }

        let mut metrics = AfmMetrics {
            font_name: String::new(),
            font_bbox: None,
            ascender: None,
            descender: None,
            cap_height: None,
            x_height: None,
            italic_angle: 0.0,
            is_fixed_pitch: false,
            by_code: HashMap::new(),
            by_name: HashMap::new(),
        };
        let mut in_char_metrics = false;

        for line in lines {
            if in_char_metrics {
                if line.starts_with("EndCharMetrics") {
                    in_char_metrics = false;
                } else {
                    metrics.add_char_metric(line);
                }
                continue;
            }

            let (key, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let value = value.trim();
            match key {
                "FontName" => metrics.font_name = value.to_string(),
                "FontBBox" => metrics.font_bbox = parse_bbox(value),
                "Ascender" => metrics.ascender = value.parse().ok(),
                "Descender" => metrics.descender = value.parse().ok(),
                "CapHeight" => metrics.cap_height = value.parse().ok(),
                "XHeight" => metrics.x_height = value.parse().ok(),
                "ItalicAngle" => metrics.italic_angle = value.parse().unwrap_or(0.0),
                "IsFixedPitch" => metrics.is_fixed_pitch = value == "true",
                "StartCharMetrics" => in_char_metrics = true,
                "EndFontMetrics" => break,
                _ => {}
            }
        }

        if metrics.by_code.is_empty() && metrics.by_name.is_empty() {
            return Err(BackendError::Font(format!(
                "AFM data for '{}' has no character metrics",
                metrics.font_name
            )));
        }
        Ok(metrics)
    }

    /// Parse one `C 65 ; WX 667 ; N A ; B ...` line.
    fn add_char_metric(&mut self, line: &str) {
        let mut code: Option<i64> = None;
        let mut width: Option<f64> = None;
        let mut name: Option<&str> = None;

        for field in line.split(';').map(str::trim) {
            let (key, value) = field.split_once(char::is_whitespace).unwrap_or((field, ""));
            let value = value.trim();
            match key {
                "C" => code = value.parse().ok(),
                "CH" => {
                    code = value
                        .strip_prefix('<')
                        .and_then(|v| v.strip_suffix('>'))
                        .and_then(|hex| i64::from_str_radix(hex, 16).ok());
                }
                "WX" | "W0X" => width = value.parse().ok(),
                "N" => name = Some(value),
                _ => {}
            }
        }

        let Some(width) = width else {
            tracing::trace!(line, "AFM char metric without width skipped");
            return;
        };
        if let Some(code) = code.and_then(|c| u32::try_from(c).ok()) {
            self.by_code.insert(code, width);
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.by_name.insert(GlyphName::from(name), width);
        }
    }

    /// Advance width for a built-in character code.
    pub fn width_by_code(&self, code: u32) -> Option<f64> {
        self.by_code.get(&code).copied()
    }

    /// Advance width for a glyph name.
    pub fn width_by_name(&self, name: &str) -> Option<f64> {
        self.by_name.get(name).copied()
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Font bounding box `[llx, lly, urx, ury]`.
    pub fn font_bbox(&self) -> Option<[f64; 4]> {
        self.font_bbox
    }

    pub fn ascender(&self) -> Option<f64> {
        self.ascender
    }

    pub fn descender(&self) -> Option<f64> {
        self.descender
    }

    pub fn cap_height(&self) -> Option<f64> {
        self.cap_height
    }

    pub fn x_height(&self) -> Option<f64> {
        self.x_height
    }

    pub fn italic_angle(&self) -> f64 {
        self.italic_angle
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.is_fixed_pitch
    }

    /// Number of named glyphs.
    pub fn glyph_count(&self) -> usize {
        self.by_name.len()
    }
}

fn parse_bbox(value: &str) -> Option<[f64; 4]> {
    let vals: Vec<f64> = value
        .split_whitespace()
        .filter_map(|v| v.parse().ok())
        .collect();
    match vals.as_slice() {
        [llx, lly, urx, ury] => Some([*llx, *lly, *urx, *ury]),
        _ => None,
    }
}
