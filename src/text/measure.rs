use crate::foundation::error::{PageError, PageResult};

/// Rendered-size oracle used by caption wrapping and fitting.
///
/// Widths are the advance width of a single unwrapped line at `size_px`.
pub trait TextMeasure {
    fn line_width(&mut self, text: &str, size_px: f32) -> PageResult<f32>;

    fn line_height(&mut self, size_px: f32) -> PageResult<f32>;
}

/// Deterministic metrics: every char advances `advance_em * size_px`.
///
/// Useful for dry runs and for exercising layout without font files.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasure {
    pub advance_em: f32,
    pub line_height_em: f32,
}

impl Default for FixedAdvanceMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl TextMeasure for FixedAdvanceMeasure {
    fn line_width(&mut self, text: &str, size_px: f32) -> PageResult<f32> {
        check_size(size_px)?;
        Ok(text.chars().count() as f32 * self.advance_em * size_px)
    }

    fn line_height(&mut self, size_px: f32) -> PageResult<f32> {
        check_size(size_px)?;
        Ok(self.line_height_em * size_px)
    }
}

pub(crate) fn check_size(size_px: f32) -> PageResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(PageError::validation("text size_px must be finite and > 0"));
    }
    Ok(())
}
