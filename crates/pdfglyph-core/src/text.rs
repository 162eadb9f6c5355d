use crate::error::ExtractWarning;
use crate::geometry::BBox;

/// One positioned, decoded unit of visible text.
///
/// `x`/`y` are the glyph origin in page space, `width` is the page-space
/// advance and `font_size` is the size set by the `Tf` operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub font_size: f64,
    pub text: String,
}

impl TextRun {
    pub fn new(x: f64, y: f64, width: f64, font_size: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            font_size,
            text: text.into(),
        }
    }

    /// Right edge of the run (`x + width`).
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }
}

/// All text runs collected for one page, in encounter order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageText {
    /// The page's `/MediaBox`.
    pub media_box: BBox,
    pub runs: Vec<TextRun>,
    /// Non-fatal issues hit while collecting, if warning collection is on.
    pub warnings: Vec<ExtractWarning>,
}

impl PageText {
    /// Concatenate the text of every run, without inserting separators.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_run_end_x() {
        let run = TextRun::new(100.0, 700.0, 6.672, 12.0, "e");
        assert!((run.end_x() - 106.672).abs() < 1e-9);
    }

    #[test]
    fn page_text_concatenates_runs_in_order() {
        let page = PageText {
            media_box: BBox::new(0.0, 0.0, 612.0, 792.0),
            runs: vec![
                TextRun::new(0.0, 0.0, 1.0, 10.0, "H"),
                TextRun::new(1.0, 0.0, 1.0, 10.0, "i"),
            ],
            warnings: Vec::new(),
        };
        assert_eq!(page.text(), "Hi");
        assert!(!page.is_empty());
    }

    #[test]
    fn page_text_default_is_empty() {
        let page = PageText::default();
        assert!(page.is_empty());
        assert_eq!(page.text(), "");
    }
}
