//! Sequential book pipeline: plan in, paginated document out.
//!
//! Pages are produced one at a time in reading order. Each page runs
//! synthesize, resample, layout, and composite before the next one starts.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assemble::document::{Document, PageAssembler};
use crate::assemble::resample::fit_to_page;
use crate::foundation::config::{CaptionMode, PipelineConfig, StyleProfile};
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::{PageError, PageResult};
use crate::layout::engine::{Alignment, CaptionSpec, EdgeChooser, LayoutEngine, ReservedRegion};
use crate::plan::{PageKind, PageRecord, StoryPlan};
use crate::render::compositor::composite_caption;
use crate::synth::request::PromptComposer;
use crate::synth::synthesizer::{ImageSynthesizer, SynthesisResult};
use crate::text::font::CaptionFont;

/// Cancellation hook checked between pages.
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

/// Never-cancel token for default call paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared flag, e.g. flipped from a signal handler or another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl CancelToken for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-page summary of how the page was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageReport {
    /// 0 for the cover, 1..n for content pages.
    pub ordinal: usize,
    pub tier_used: Option<usize>,
    pub attempts: usize,
    /// Artwork came from a fallback tier or the placeholder.
    pub degraded_artwork: bool,
    /// Caption had to shrink below its configured size or was truncated.
    pub degraded_caption: bool,
}

impl PageReport {
    pub fn is_placeholder(&self) -> bool {
        self.tier_used.is_none()
    }
}

#[derive(Debug)]
pub struct BookOutput {
    pub document: Document,
    pub reports: Vec<PageReport>,
}

impl BookOutput {
    pub fn placeholder_pages(&self) -> usize {
        self.reports.iter().filter(|r| r.is_placeholder()).count()
    }
}

/// Applies the plan's character description and the caption mode's reserved
/// band to a base style.
pub fn style_for_plan(base: StyleProfile, plan: &StoryPlan, mode: CaptionMode) -> StyleProfile {
    let lock = if plan.character_lock.trim().is_empty() {
        base.character_lock.clone()
    } else {
        plan.character_lock.trim().to_string()
    };
    let reminder = if plan.reminder.trim().is_empty() {
        base.reminder.clone()
    } else {
        plan.reminder.trim().to_string()
    };
    let style = base.with_character(lock, reminder);
    match mode.reserved_percent() {
        Some(percent) => style.with_reserved_band(percent),
        None => StyleProfile {
            reserve_clause: None,
            ..style
        },
    }
}

/// `storybook_<run code>_<4 hex>.pdf`.
pub fn output_file_name(style: &StyleProfile) -> String {
    format!("storybook_{}_{:04x}.pdf", style.run_code(), fastrand::u16(..))
}

pub struct BookRenderer {
    config: PipelineConfig,
    style: StyleProfile,
    synth: ImageSynthesizer,
    font: CaptionFont,
    layout: LayoutEngine,
    chooser: Box<dyn EdgeChooser>,
}

impl BookRenderer {
    pub fn new(
        config: PipelineConfig,
        style: StyleProfile,
        synth: ImageSynthesizer,
        font: CaptionFont,
        chooser: Box<dyn EdgeChooser>,
    ) -> PageResult<Self> {
        config.validate()?;
        let layout = LayoutEngine::new(config.layout)?;
        Ok(Self {
            config,
            style,
            synth,
            font,
            layout,
            chooser,
        })
    }

    pub fn style(&self) -> &StyleProfile {
        &self.style
    }

    pub fn synthesizer(&self) -> &ImageSynthesizer {
        &self.synth
    }

    /// Fresh output path in the configured output directory.
    pub fn output_path(&self) -> PathBuf {
        self.config.out_dir.join(output_file_name(&self.style))
    }

    /// Renders cover (when the plan has one) and every page, then assembles.
    ///
    /// `cancel` is polled before each page; a cancelled run yields
    /// `PageError::Cancelled` and no document.
    #[tracing::instrument(skip_all, fields(pages = plan.pages.len(), cover = plan.cover.is_some()))]
    pub fn render(&mut self, plan: &StoryPlan, cancel: &dyn CancelToken) -> PageResult<BookOutput> {
        let page_px = self.config.page_size.pixels();
        let total = plan.pages.len();
        let mut reports = Vec::with_capacity(total + 1);
        let mut completed = 0usize;

        let cover = match &plan.cover {
            Some(record) => {
                if cancel.is_cancelled() {
                    return Err(PageError::Cancelled { completed });
                }
                let tiers = PromptComposer::new(&self.style).cover_tiers(&record.image_request);
                let synthesized = self.synth.synthesize("cover", &tiers)?;
                let art = self.fit_artwork(&synthesized, page_px);
                let fitted = self.layout.fit_banner(
                    &mut self.font,
                    &record.banner_text(),
                    page_px,
                    &self.config.title_fit,
                )?;
                let composed = composite_caption(
                    &art,
                    &fitted,
                    &self.config.title_caption_style,
                    &mut self.font,
                )?;
                reports.push(report(0, &synthesized, fitted.degraded));
                completed += 1;
                tracing::info!("cover done");
                Some(composed)
            }
            None => None,
        };

        let mut pages = Vec::with_capacity(total);
        for (i, record) in plan.pages.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(completed, "run cancelled");
                return Err(PageError::Cancelled { completed });
            }
            let ordinal = i + 1;
            let previously = i
                .checked_sub(1)
                .and_then(|prev| plan.pages[prev].synopsis.as_deref());
            let (image, page_report) = self.render_page(ordinal, record, previously, page_px)?;
            tracing::info!(
                "page {ordinal}/{total}{}",
                if page_report.is_placeholder() { " (placeholder)" } else { "" }
            );
            pages.push(image);
            reports.push(page_report);
            completed += 1;
        }

        let document = PageAssembler::new(self.config.page_size).assemble_with_cover(cover, pages)?;
        Ok(BookOutput { document, reports })
    }

    fn render_page(
        &mut self,
        ordinal: usize,
        record: &PageRecord,
        previously: Option<&str>,
        page_px: SurfaceSize,
    ) -> PageResult<(image::RgbaImage, PageReport)> {
        let tiers = PromptComposer::new(&self.style).page_tiers(&record.image_request, previously);
        let synthesized = self.synth.synthesize(&format!("page_{ordinal}"), &tiers)?;
        let art = self.fit_artwork(&synthesized, page_px);

        let (reserved, alignment) = match record.kind {
            PageKind::Story => self.config.caption_mode.placement(),
            PageKind::End => (ReservedRegion::FullSurface, Alignment::TopBanner),
        };
        let spec = CaptionSpec::new(record.text.clone(), reserved, alignment);
        let placed = self
            .layout
            .layout(&mut self.font, &spec, page_px, self.chooser.as_mut())?;
        tracing::debug!(
            ordinal,
            font_size = placed.font_size,
            lines = placed.wrapped_lines.len(),
            "caption placed"
        );
        let mut composed = composite_caption(
            &art,
            &placed,
            &self.config.page_caption_style,
            &mut self.font,
        )?;

        if let Some(stamp) = self.config.page_numbers {
            let number = self.layout.stamp_corner(
                &mut self.font,
                &ordinal.to_string(),
                page_px,
                &stamp,
            )?;
            composed = composite_caption(
                &composed,
                &number,
                &self.config.page_caption_style,
                &mut self.font,
            )?;
        }

        Ok((composed, report(ordinal, &synthesized, placed.degraded)))
    }

    fn fit_artwork(&self, synthesized: &SynthesisResult, page_px: SurfaceSize) -> image::RgbaImage {
        fit_to_page(&synthesized.image, self.config.working_size, page_px)
    }
}

fn report(ordinal: usize, synthesized: &SynthesisResult, degraded_caption: bool) -> PageReport {
    PageReport {
        ordinal,
        tier_used: synthesized.tier_used,
        attempts: synthesized.attempts.len(),
        degraded_artwork: synthesized.degraded,
        degraded_caption,
    }
}

#[cfg(test)]
#[path = "../tests/unit/book.rs"]
mod tests;
