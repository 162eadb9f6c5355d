//! Per-session cache of encoding tables and font metrics.

use std::path::PathBuf;
use std::sync::Arc;

use pdfglyph_core::{AssetSource, EncodingStore, ExtractOptions, PdfError, SingleFlight};

use crate::afm::AfmMetrics;
use crate::error::BackendError;
use crate::standard_fonts::StandardFont;

/// Shared, lazily populated tables used while building fonts.
///
/// Create one per document or session and pass it to [`Font::new`]. Every
/// encoding table and metrics file is read at most once per cache, also when
/// pages are processed on several threads; after that the parsed tables are
/// shared read-only.
///
/// [`Font::new`]: crate::font::Font::new
#[derive(Debug)]
pub struct ResourceCache {
    encodings: EncodingStore,
    metrics: SingleFlight<String, AfmMetrics>,
    metrics_dir: Option<PathBuf>,
}

impl ResourceCache {
    pub fn new(options: &ExtractOptions) -> Self {
        let source = match &options.asset_dir {
            Some(dir) => AssetSource::Directory(dir.clone()),
            None => AssetSource::Embedded,
        };
        Self {
            encodings: EncodingStore::new(source),
            metrics: SingleFlight::new(),
            metrics_dir: options.metrics_dir.clone(),
        }
    }

    /// The encoding table store.
    pub fn encodings(&self) -> &EncodingStore {
        &self.encodings
    }

    /// Metrics of the standard font matching `base_font`.
    ///
    /// Fails with [`PdfError::UnsupportedFont`] when the name is not one of
    /// the standard 14 fonts or their aliases.
    pub fn standard_metrics(&self, base_font: &str) -> Result<Arc<AfmMetrics>, PdfError> {
        let font = StandardFont::from_base_font(base_font)
            .ok_or_else(|| PdfError::UnsupportedFont(base_font.to_string()))?;
        let file_name = font.afm_file_name();

        self.metrics.get_or_try_load(&file_name, || {
            let metrics = match &self.metrics_dir {
                Some(dir) => {
                    let path = dir.join(&file_name);
                    let text = std::fs::read_to_string(&path).map_err(|e| {
                        PdfError::IoError(format!("{}: {e}", path.display()))
                    })?;
                    AfmMetrics::parse(&text)
                }
                None => AfmMetrics::parse(font.embedded_afm()),
            }
            .map_err(|e: BackendError| {
                PdfError::InvalidAsset(format!("{file_name}: {e}"))
            })?;
            tracing::debug!(font = %font, glyphs = metrics.glyph_count(), "loaded font metrics");
            Ok(metrics)
        })
    }

    /// Number of metrics files read so far.
    pub fn metrics_loads(&self) -> usize {
        self.metrics.loads()
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}
