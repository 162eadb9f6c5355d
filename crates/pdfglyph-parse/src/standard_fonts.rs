//! The 14 standard PDF Type1 fonts.
//!
//! Maps a `/BaseFont` name onto one of the standard fonts, recognising
//! subset prefixes (`ABCDEF+Helvetica`) and the common TrueType aliases
//! (`Arial`, `TimesNewRoman`, `CourierNew` and their `,Bold` style variants),
//! and provides the AFM metrics compiled into the library for each of them.

use std::fmt;

/// One of the 14 standard Type1 fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    pub const ALL: [StandardFont; 14] = [
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::Symbol,
        StandardFont::ZapfDingbats,
    ];

    /// Resolve a `/BaseFont` name, or `None` if it is not a standard font.
    ///
    /// Matching is case sensitive, as PDF names are.
    pub fn from_base_font(base_font: &str) -> Option<Self> {
        let name = strip_subset_prefix(base_font);
        let font = match name {
            "Courier" | "CourierNew" | "CourierNewPSMT" => StandardFont::Courier,
            "Courier-Bold" | "CourierNew,Bold" | "CourierNewPS-BoldMT" => StandardFont::CourierBold,
            "Courier-Oblique" | "CourierNew,Italic" | "CourierNewPS-ItalicMT" => {
                StandardFont::CourierOblique
            }
            "Courier-BoldOblique" | "CourierNew,BoldItalic" | "CourierNewPS-BoldItalicMT" => {
                StandardFont::CourierBoldOblique
            }
            "Helvetica" | "Arial" | "ArialMT" => StandardFont::Helvetica,
            "Helvetica-Bold" | "Arial,Bold" | "Arial-BoldMT" => StandardFont::HelveticaBold,
            "Helvetica-Oblique" | "Arial,Italic" | "Arial-ItalicMT" => {
                StandardFont::HelveticaOblique
            }
            "Helvetica-BoldOblique" | "Arial,BoldItalic" | "Arial-BoldItalicMT" => {
                StandardFont::HelveticaBoldOblique
            }
            "Times-Roman" | "TimesNewRoman" | "TimesNewRomanPSMT" => StandardFont::TimesRoman,
            "Times-Bold" | "TimesNewRoman,Bold" | "TimesNewRomanPS-BoldMT" => {
                StandardFont::TimesBold
            }
            "Times-Italic" | "TimesNewRoman,Italic" | "TimesNewRomanPS-ItalicMT" => {
                StandardFont::TimesItalic
            }
            "Times-BoldItalic" | "TimesNewRoman,BoldItalic" | "TimesNewRomanPS-BoldItalicMT" => {
                StandardFont::TimesBoldItalic
            }
            "Symbol" => StandardFont::Symbol,
            "ZapfDingbats" => StandardFont::ZapfDingbats,
            _ => return None,
        };
        Some(font)
    }

    /// The canonical PostScript name, which is also the AFM file stem.
    pub fn name(&self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// File name of this font's metrics, e.g. `Helvetica.afm`.
    pub fn afm_file_name(&self) -> String {
        format!("{}.afm", self.name())
    }

    /// Whether the font uses its own built-in encoding rather than
    /// StandardEncoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// The AFM text compiled into the library.
    pub fn embedded_afm(&self) -> &'static str {
        match self {
            StandardFont::Courier => include_str!("../assets/afm/Courier.afm"),
            StandardFont::CourierBold => include_str!("../assets/afm/Courier-Bold.afm"),
            StandardFont::CourierOblique => include_str!("../assets/afm/Courier-Oblique.afm"),
            StandardFont::CourierBoldOblique => {
                include_str!("../assets/afm/Courier-BoldOblique.afm")
            }
            StandardFont::Helvetica => include_str!("../assets/afm/Helvetica.afm"),
            StandardFont::HelveticaBold => include_str!("../assets/afm/Helvetica-Bold.afm"),
            StandardFont::HelveticaOblique => include_str!("../assets/afm/Helvetica-Oblique.afm"),
            StandardFont::HelveticaBoldOblique => {
                include_str!("../assets/afm/Helvetica-BoldOblique.afm")
            }
            StandardFont::TimesRoman => include_str!("../assets/afm/Times-Roman.afm"),
            StandardFont::TimesBold => include_str!("../assets/afm/Times-Bold.afm"),
            StandardFont::TimesItalic => include_str!("../assets/afm/Times-Italic.afm"),
            StandardFont::TimesBoldItalic => include_str!("../assets/afm/Times-BoldItalic.afm"),
            StandardFont::Symbol => include_str!("../assets/afm/Symbol.afm"),
            StandardFont::ZapfDingbats => include_str!("../assets/afm/ZapfDingbats.afm"),
        }
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strip a six-letter subset tag such as `ABCDEF+`.
pub fn strip_subset_prefix(base_font: &str) -> &str {
    match base_font.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => base_font,
    }
}
