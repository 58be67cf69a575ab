use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{PageError, PageResult};
use crate::text::engine::{TextBrush, TextLayoutEngine};
use crate::text::measure::TextMeasure;

/// Font files probed when no explicit caption font is configured, in order.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "Arial.ttf",
];

/// A loaded caption typeface: measures lines for layout and shapes them for drawing.
pub struct CaptionFont {
    engine: TextLayoutEngine,
    bytes: Arc<Vec<u8>>,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("family", &self.engine.family_name())
            .field("source", &self.source)
            .finish()
    }
}

impl CaptionFont {
    pub fn from_bytes(bytes: Vec<u8>) -> PageResult<Self> {
        let engine = TextLayoutEngine::with_font(&bytes)?;
        Ok(Self {
            engine,
            bytes: Arc::new(bytes),
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> PageResult<Self> {
        let bytes = std::fs::read(path)?;
        let mut font = Self::from_bytes(bytes)?;
        font.source = Some(path.to_path_buf());
        Ok(font)
    }

    /// Loads the first candidate that reads and registers cleanly.
    ///
    /// Fails with a precondition error when none do.
    pub fn load_first<P: AsRef<Path>>(candidates: &[P]) -> PageResult<Self> {
        for candidate in candidates {
            let path = candidate.as_ref();
            match Self::from_path(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), family = font.family_name(), "caption font loaded");
                    return Ok(font);
                }
                Err(err) => {
                    tracing::trace!(path = %path.display(), error = %err, "font candidate skipped");
                }
            }
        }
        Err(PageError::precondition(format!(
            "no usable caption font among {} candidate(s)",
            candidates.len()
        )))
    }

    /// Configured path first (if any), then the platform defaults.
    pub fn candidates(preferred: Option<&Path>) -> Vec<PathBuf> {
        preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from))
            .collect()
    }

    pub fn family_name(&self) -> &str {
        self.engine.family_name()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            0,
        )
    }

    pub fn shape_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> PageResult<parley::Layout<TextBrush>> {
        self.engine.layout_line(text, size_px, brush)
    }
}

impl TextMeasure for CaptionFont {
    fn line_width(&mut self, text: &str, size_px: f32) -> PageResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let layout = self
            .engine
            .layout_line(text, size_px, TextBrush::default())?;
        Ok(layout.width())
    }

    fn line_height(&mut self, size_px: f32) -> PageResult<f32> {
        let layout = self.engine.layout_line("Ag", size_px, TextBrush::default())?;
        Ok(layout.height().max(size_px))
    }
}
