//! Unicode normalization for extracted text.
//!
//! Provides [`UnicodeNorm`] enum for selecting normalization form and
//! [`normalize_runs`] for applying normalization to text run contents.

use std::borrow::Cow;

use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::text::TextRun;

/// Unicode normalization form to apply to extracted text.
///
/// Different PDF generators may produce different Unicode representations
/// for the same visual text (e.g., composed vs. decomposed accented chars,
/// or ligature codepoints from a font's encoding table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// No normalization (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Canonical Decomposition (NFD).
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
    /// Compatibility Decomposition (NFKD).
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    ///
    /// Borrows the input when no change is needed.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            UnicodeNorm::None => Cow::Borrowed(text),
            UnicodeNorm::Nfc => {
                if is_nfc_quick(text.chars()) == IsNormalized::Yes {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(text.nfc().collect())
                }
            }
            UnicodeNorm::Nfd => Cow::Owned(text.nfd().collect()),
            UnicodeNorm::Nfkc => Cow::Owned(text.nfkc().collect()),
            UnicodeNorm::Nfkd => Cow::Owned(text.nfkd().collect()),
        }
    }
}

/// Apply Unicode normalization to the text of each run in place.
///
/// Positions, widths and font sizes are left untouched.
pub fn normalize_runs(runs: &mut [TextRun], norm: UnicodeNorm) {
    if norm == UnicodeNorm::None {
        return;
    }
    for run in runs {
        if let Cow::Owned(text) = norm.normalize(&run.text) {
            run.text = text;
        }
    }
}
