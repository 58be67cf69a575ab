use crate::foundation::core::{PixelBox, SurfaceSize};
use crate::foundation::error::{PageError, PageResult};
use crate::layout::wrap::{block_extent, wrap_words};
use crate::text::measure::TextMeasure;

/// Part of the surface set aside for caption content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReservedRegion {
    /// Bottom `percent` of the surface height.
    BottomBand { percent: u32 },
    /// Everything below a fixed pixel offset.
    BelowOffset { top: u32 },
    /// Fixed-height strip at the top edge.
    TopBanner { height: u32 },
    FullSurface,
}

impl ReservedRegion {
    /// `(top, height)` of the band on `surface`, clamped to the surface.
    pub fn band(self, surface: SurfaceSize) -> (i32, i32) {
        let h = surface.height as i32;
        match self {
            Self::BottomBand { percent } => {
                let bh = (i64::from(h) * i64::from(percent.min(100)) / 100) as i32;
                (h - bh, bh)
            }
            Self::BelowOffset { top } => {
                let t = (top.min(surface.height)) as i32;
                (t, h - t)
            }
            Self::TopBanner { height } => (0, height.min(surface.height) as i32),
            Self::FullSurface => (0, h),
        }
    }
}

/// How the caption block is positioned once its size is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    CenteredInBand,
    TopBanner,
    RandomEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Backing panel drawn behind the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelShape {
    Rounded,
    /// Full-width rectangle.
    Banner,
    /// Text only.
    Bare,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Picks the edge for [`Alignment::RandomEdge`].
pub trait EdgeChooser {
    fn choose(&mut self) -> Edge;
}

/// Uniform coin flip between the two edges.
#[derive(Debug)]
pub struct SeededEdgeChooser {
    rng: fastrand::Rng,
}

impl SeededEdgeChooser {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for SeededEdgeChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeChooser for SeededEdgeChooser {
    fn choose(&mut self) -> Edge {
        if self.rng.bool() { Edge::Top } else { Edge::Bottom }
    }
}

/// Always answers the same edge.
#[derive(Clone, Copy, Debug)]
pub struct FixedEdge(pub Edge);

impl EdgeChooser for FixedEdge {
    fn choose(&mut self) -> Edge {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionSpec {
    pub text: String,
    pub reserved: ReservedRegion,
    pub alignment: Alignment,
}

impl CaptionSpec {
    pub fn new(text: impl Into<String>, reserved: ReservedRegion, alignment: Alignment) -> Self {
        Self {
            text: text.into(),
            reserved,
            alignment,
        }
    }
}

/// Knobs of the fixed-band policy. All lengths are pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub font_size: u32,
    /// Floor for the shrink fallback when the block cannot fit at `font_size`.
    pub min_font_size: u32,
    pub side_margin: u32,
    pub padding: u32,
    pub floor_gap: u32,
    /// Offset from the top edge for top-anchored placements.
    pub top_gap: u32,
    pub line_spacing: u32,
    /// Shrink the panel to the text width and center it, instead of spanning margin to margin.
    pub hug_text: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            font_size: 20,
            min_font_size: 12,
            side_margin: 40,
            padding: 24,
            floor_gap: 20,
            top_gap: 20,
            line_spacing: 4,
            hug_text: false,
        }
    }
}

/// Knobs of the auto-fit policy used for title banners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoFitSettings {
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub step: u32,
    pub banner_height: u32,
    pub max_text_height: u32,
    pub horizontal_margin: u32,
    pub line_spacing: u32,
}

impl Default for AutoFitSettings {
    fn default() -> Self {
        Self {
            max_font_size: 48,
            min_font_size: 20,
            step: 2,
            banner_height: 180,
            max_text_height: 140,
            horizontal_margin: 60,
            line_spacing: 6,
        }
    }
}

/// Small bare label in the bottom-right corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CornerStamp {
    pub font_size: u32,
    pub inset_x: u32,
    pub inset_y: u32,
}

impl Default for CornerStamp {
    fn default() -> Self {
        Self {
            font_size: 14,
            inset_x: 10,
            inset_y: 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub wrapped_lines: Vec<String>,
    pub font_size: u32,
    /// Panel rectangle; text is drawn inside it.
    pub bounding_box: PixelBox,
    /// Top-left of the first line.
    pub text_origin: (i32, i32),
    pub line_height: f32,
    pub line_spacing: u32,
    pub text_align: TextAlign,
    pub panel: PanelShape,
    /// Text was shrunk below the configured size or truncated to fit.
    pub degraded: bool,
}

impl LayoutResult {
    pub fn line_top(&self, index: usize) -> f32 {
        self.text_origin.1 as f32 + index as f32 * (self.line_height + self.line_spacing as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.wrapped_lines.is_empty()
    }
}

struct Fitted {
    lines: Vec<String>,
    size: u32,
    width: f32,
    height: f32,
    line_height: f32,
    truncated: bool,
}

/// Decides wrapping, font size and placement of captions.
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    settings: LayoutSettings,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings) -> PageResult<Self> {
        if settings.min_font_size == 0 || settings.font_size == 0 {
            return Err(PageError::validation("caption font sizes must be > 0"));
        }
        if settings.min_font_size > settings.font_size {
            return Err(PageError::validation(format!(
                "min_font_size {} exceeds font_size {}",
                settings.min_font_size, settings.font_size
            )));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Fixed-band policy: wrap at the configured size, then place.
    ///
    /// The returned box always satisfies `left >= side_margin`,
    /// `right <= W - side_margin`, `top >= 0` and `bottom <= H - floor_gap`.
    /// When the block is taller than the whole usable area, the text is
    /// refit at smaller sizes and the result is marked degraded. Padding
    /// shrinks first if it would leave no room for a single line.
    #[tracing::instrument(skip(self, measure, spec, chooser))]
    pub fn layout(
        &self,
        measure: &mut dyn TextMeasure,
        spec: &CaptionSpec,
        surface: SurfaceSize,
        chooser: &mut dyn EdgeChooser,
    ) -> PageResult<LayoutResult> {
        let s = &self.settings;
        let area = self.usable_area(surface)?;
        let mut pad = (s.padding as i32).min((area.width() - 1) / 2).max(0);
        let mut max_w = (area.width() - 2 * pad) as f32;
        let spacing = s.line_spacing as f32;

        let size = s.font_size as f32;
        let lines = wrap_words(&spec.text, measure, size, max_w)?;
        let (width, height) = block_extent(&lines, measure, size, spacing)?;
        let mut fitted = Fitted {
            line_height: measure.line_height(size)?,
            lines,
            size: s.font_size,
            width,
            height,
            truncated: false,
        };
        let mut degraded = false;

        if panel_height(&fitted, pad) > area.height() {
            // Padding gives way before text does: one line at the minimum
            // size must still fit between the top and bottom padding.
            let min_line_h = measure.line_height(s.min_font_size as f32)?;
            if ((area.height() - 2 * pad) as f32) < min_line_h {
                let room = ((area.height() as f32 - min_line_h).max(0.0) / 2.0).floor() as i32;
                pad = room.min(pad);
                max_w = (area.width() - 2 * pad) as f32;
                tracing::debug!(pad, "caption padding reduced for a short area");
            }
            let max_h = (area.height() - 2 * pad).max(0) as f32;
            fitted = fit_text(
                measure,
                &spec.text,
                max_w,
                max_h,
                (s.font_size, s.min_font_size, 1),
                spacing,
            )?;
            degraded = true;
            tracing::debug!(
                font_size = fitted.size,
                truncated = fitted.truncated,
                "caption refit to usable area"
            );
        }

        let panel_h = panel_height(&fitted, pad).min(area.height());
        let (left, right) = if s.hug_text {
            let pw = (fitted.width.ceil() as i32 + 2 * pad).min(area.width());
            let l = area.left + (area.width() - pw) / 2;
            (l, l + pw)
        } else {
            (area.left, area.right)
        };

        let max_top = area.bottom - panel_h;
        let preferred = match spec.alignment {
            Alignment::CenteredInBand => {
                let (band_top, band_h) = spec.reserved.band(surface);
                band_top + ((band_h - panel_h) / 2).max(0)
            }
            Alignment::TopBanner => s.top_gap as i32,
            Alignment::RandomEdge => match chooser.choose() {
                Edge::Top => s.top_gap as i32,
                Edge::Bottom => max_top,
            },
        };
        let top = preferred.clamp(0, max_top.max(0));
        if top != preferred {
            tracing::debug!(preferred, top, "caption panel moved inside the page");
        }

        let bounding_box = PixelBox::new(left, top, right, top + panel_h);
        Ok(LayoutResult {
            wrapped_lines: fitted.lines,
            font_size: fitted.size,
            bounding_box,
            text_origin: (left + pad, top + pad),
            line_height: fitted.line_height,
            line_spacing: s.line_spacing,
            text_align: TextAlign::Left,
            panel: PanelShape::Rounded,
            degraded: degraded || fitted.truncated,
        })
    }

    /// Auto-fit policy: shrink from `max_font_size` in `step`s until the
    /// wrapped block fits the banner text box. At the minimum size the
    /// lines that still overflow are dropped and the result is degraded.
    ///
    /// The banner box spans the full surface width, from `0` to `W`, and
    /// starts at the top edge. It is exempt from the side-margin containment
    /// that [`LayoutEngine::layout`] guarantees; `horizontal_margin` only
    /// insets the text inside it.
    #[tracing::instrument(skip(self, measure, fit))]
    pub fn fit_banner(
        &self,
        measure: &mut dyn TextMeasure,
        text: &str,
        surface: SurfaceSize,
        fit: &AutoFitSettings,
    ) -> PageResult<LayoutResult> {
        if fit.min_font_size == 0 {
            return Err(PageError::validation("auto-fit min_font_size must be > 0"));
        }
        let w = surface.width as i32;
        let area = self.usable_area(surface)?;
        let banner_h = (fit.banner_height as i32).min(area.bottom).max(1);
        let margin = (fit.horizontal_margin as i32).min((w - 1) / 2).max(0);
        let max_w = (w - 2 * margin) as f32;
        let max_h = (fit.max_text_height as i32).min(banner_h) as f32;

        let fitted = fit_text(
            measure,
            text,
            max_w,
            max_h,
            (fit.max_font_size, fit.min_font_size, fit.step),
            fit.line_spacing as f32,
        )?;

        let text_top = ((banner_h as f32 - fitted.height) / 2.0).max(0.0).round() as i32;
        Ok(LayoutResult {
            wrapped_lines: fitted.lines,
            font_size: fitted.size,
            bounding_box: PixelBox::new(0, 0, w, banner_h),
            text_origin: (margin, text_top),
            line_height: fitted.line_height,
            line_spacing: fit.line_spacing,
            text_align: TextAlign::Center,
            panel: PanelShape::Banner,
            degraded: fitted.truncated,
        })
    }

    /// Places a one-line label against the bottom-right corner, without a panel.
    pub fn stamp_corner(
        &self,
        measure: &mut dyn TextMeasure,
        text: &str,
        surface: SurfaceSize,
        stamp: &CornerStamp,
    ) -> PageResult<LayoutResult> {
        let size = stamp.font_size as f32;
        let tw = measure.line_width(text, size)?.ceil() as i32;
        let th = measure.line_height(size)?;
        let (w, h) = (surface.width as i32, surface.height as i32);

        let right = (w - stamp.inset_x as i32).max(0);
        let bottom = (h - stamp.inset_y as i32).max(0);
        let left = (right - tw).max(0);
        let top = (bottom - th.ceil() as i32).max(0);

        Ok(LayoutResult {
            wrapped_lines: vec![text.to_string()],
            font_size: stamp.font_size,
            bounding_box: PixelBox::new(left, top, right, bottom),
            text_origin: (left, top),
            line_height: th,
            line_spacing: 0,
            text_align: TextAlign::Left,
            panel: PanelShape::Bare,
            degraded: false,
        })
    }

    fn usable_area(&self, surface: SurfaceSize) -> PageResult<PixelBox> {
        let (w, h) = (surface.width as i32, surface.height as i32);
        let m = self.settings.side_margin as i32;
        let floor = self.settings.floor_gap as i32;
        if w <= 2 * m {
            return Err(PageError::layout(format!(
                "surface {surface} is not wider than its side margins ({m}px each)"
            )));
        }
        if h <= floor {
            return Err(PageError::layout(format!(
                "surface {surface} is not taller than its floor gap ({floor}px)"
            )));
        }
        Ok(PixelBox::new(m, 0, w - m, h - floor))
    }
}

fn panel_height(fitted: &Fitted, pad: i32) -> i32 {
    if fitted.lines.is_empty() {
        0
    } else {
        fitted.height.ceil() as i32 + 2 * pad
    }
}

/// Largest line count whose stacked height stays within `max_h`.
fn max_lines(max_h: f32, line_h: f32, spacing: f32) -> usize {
    if max_h < line_h || line_h <= 0.0 {
        return 0;
    }
    ((max_h + spacing) / (line_h + spacing)).floor() as usize
}

fn fit_text(
    measure: &mut dyn TextMeasure,
    text: &str,
    max_w: f32,
    max_h: f32,
    (max_size, min_size, step): (u32, u32, u32),
    spacing: f32,
) -> PageResult<Fitted> {
    let step = step.max(1);
    let mut size = max_size.max(min_size);
    loop {
        let px = size as f32;
        let lines = wrap_words(text, measure, px, max_w)?;
        let (width, height) = block_extent(&lines, measure, px, spacing)?;
        let line_height = measure.line_height(px)?;
        if width <= max_w && height <= max_h {
            return Ok(Fitted {
                lines,
                size,
                width,
                height,
                line_height,
                truncated: false,
            });
        }

        if size <= min_size {
            let mut lines = lines;
            lines.truncate(max_lines(max_h, line_height, spacing));
            let (mut width, mut height) = block_extent(&lines, measure, px, spacing)?;
            while height > max_h && !lines.is_empty() {
                lines.pop();
                (width, height) = block_extent(&lines, measure, px, spacing)?;
            }
            tracing::warn!(
                size,
                kept = lines.len(),
                "text does not fit at minimum size; truncated"
            );
            return Ok(Fitted {
                lines,
                size,
                width,
                height,
                line_height,
                truncated: true,
            });
        }

        size = size.saturating_sub(step).max(min_size);
    }
}
