use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::{PageSize, Rgba8, SurfaceSize};
use crate::foundation::error::{PageError, PageResult};
use crate::layout::engine::{Alignment, AutoFitSettings, CornerStamp, LayoutSettings, ReservedRegion};
use crate::render::compositor::CaptionStyle;
use crate::synth::request::AspectRatio;

/// Run-wide art direction shared by every prompt of one book.
///
/// Built once and passed by reference; nothing mutates it after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleProfile {
    /// `##XXXXXXXX##`, unique per run so every image of a book carries the same marker.
    pub run_tag: String,
    pub art_style: String,
    pub no_text: String,
    pub negative: String,
    /// Description of the recurring character, repeated verbatim in every page prompt.
    pub character_lock: String,
    /// Short reminder appended to page prompts.
    pub reminder: String,
    /// Instruction to keep the caption band free of detail; `None` for overlay captions.
    pub reserve_clause: Option<String>,
    /// Subject used when the page scene itself keeps failing.
    pub generic_subject: String,
    pub aspect_ratio: AspectRatio,
    pub guidance_strength: Option<f32>,
}

impl StyleProfile {
    pub fn storybook() -> Self {
        Self {
            run_tag: Self::fresh_run_tag(),
            art_style: "Soft watercolor children's picture-book illustration, gentle pastel palette, \
                        clean outlines, consistent proportions"
                .to_string(),
            no_text: "No text, letters, numbers or captions anywhere in the image".to_string(),
            negative: "text, watermark, signature, logo, extra limbs, deformed hands, blurry".to_string(),
            character_lock: String::new(),
            reminder: String::new(),
            reserve_clause: None,
            generic_subject: "whimsical pastel children's illustration".to_string(),
            aspect_ratio: AspectRatio::Portrait3x4,
            guidance_strength: None,
        }
    }

    pub fn fresh_run_tag() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("##{}##", hex[..8].to_ascii_uppercase())
    }

    /// The 8 hex chars between the `##` markers.
    pub fn run_code(&self) -> &str {
        self.run_tag.trim_matches('#')
    }

    pub fn with_character(mut self, lock: impl Into<String>, reminder: impl Into<String>) -> Self {
        self.character_lock = lock.into();
        self.reminder = reminder.into();
        self
    }

    /// Asks for the bottom `percent` of the artwork to be left empty.
    pub fn with_reserved_band(mut self, percent: u32) -> Self {
        let upper = 100u32.saturating_sub(percent);
        self.reserve_clause = Some(format!(
            "Compose the illustration in the upper {upper}% of the frame; \
             keep the bottom {percent}% EMPTY plain background with no objects"
        ));
        self
    }
}

/// Retry and timeout bounds for one page's synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts_per_tier: u32,
    pub per_attempt_timeout: Duration,
    /// Sleep before retry `k` (1-based) within a tier is `backoff_unit * k`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_tier: 3,
            per_attempt_timeout: Duration::from_secs(60),
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> PageResult<()> {
        if self.max_attempts_per_tier == 0 {
            return Err(PageError::validation("max_attempts_per_tier must be >= 1"));
        }
        if self.per_attempt_timeout.is_zero() {
            return Err(PageError::validation("per_attempt_timeout must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceholderSpec {
    pub size: SurfaceSize,
    pub color: Rgba8,
}

impl Default for PlaceholderSpec {
    fn default() -> Self {
        Self {
            size: SurfaceSize {
                width: 768,
                height: 1024,
            },
            color: Rgba8::rgb(220, 220, 220),
        }
    }
}

/// Where page captions go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CaptionMode {
    /// Bottom band of the page, artwork asked to leave it empty.
    Band { percent: u32 },
    /// Overlay panel at the top or bottom edge, picked per page.
    RandomEdge,
    /// Overlay panel just below the top edge.
    TopBanner,
}

impl CaptionMode {
    pub fn parse(s: &str, band_percent: u32) -> PageResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "band" => Ok(Self::Band {
                percent: band_percent,
            }),
            "random-edge" | "random_edge" | "edge" => Ok(Self::RandomEdge),
            "top-banner" | "top_banner" | "top" => Ok(Self::TopBanner),
            other => Err(PageError::validation(format!(
                "unknown caption mode '{other}' (expected band, random-edge or top-banner)"
            ))),
        }
    }

    pub fn placement(self) -> (ReservedRegion, Alignment) {
        match self {
            Self::Band { percent } => (
                ReservedRegion::BottomBand { percent },
                Alignment::CenteredInBand,
            ),
            Self::RandomEdge => (ReservedRegion::FullSurface, Alignment::RandomEdge),
            Self::TopBanner => (ReservedRegion::FullSurface, Alignment::TopBanner),
        }
    }

    pub fn reserved_percent(self) -> Option<u32> {
        match self {
            Self::Band { percent } => Some(percent),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagenSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Default for ImagenSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "imagen-3.0-generate-002".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub page_size: PageSize,
    /// Size artwork is normalized to before the final page resample.
    pub working_size: SurfaceSize,
    pub retry: RetryPolicy,
    pub placeholder: PlaceholderSpec,
    pub caption_mode: CaptionMode,
    pub layout: LayoutSettings,
    pub title_fit: AutoFitSettings,
    pub page_caption_style: CaptionStyle,
    pub title_caption_style: CaptionStyle,
    /// `Some` stamps the page number in the bottom-right corner.
    pub page_numbers: Option<CornerStamp>,
    pub font_path: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub log_dir: PathBuf,
    pub imagen: ImagenSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let placeholder = PlaceholderSpec::default();
        Self {
            page_size: PageSize::A4_PORTRAIT,
            working_size: placeholder.size,
            retry: RetryPolicy::default(),
            placeholder,
            caption_mode: CaptionMode::Band { percent: 10 },
            layout: LayoutSettings::default(),
            title_fit: AutoFitSettings::default(),
            page_caption_style: CaptionStyle::page(),
            title_caption_style: CaptionStyle::banner(),
            page_numbers: None,
            font_path: None,
            out_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
            imagen: ImagenSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `.env` and process environment values.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();

        cfg.imagen.api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(model) = env_string("PAGESMITH_IMAGE_MODEL") {
            cfg.imagen.model = model;
        }
        if let Some(base) = env_string("PAGESMITH_API_BASE") {
            cfg.imagen.api_base = base.trim_end_matches('/').to_string();
        }

        cfg.retry.max_attempts_per_tier = std::env::var("PAGESMITH_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(cfg.retry.max_attempts_per_tier);
        cfg.retry.per_attempt_timeout = std::env::var("PAGESMITH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .map(Duration::from_secs)
            .unwrap_or(cfg.retry.per_attempt_timeout);

        cfg.font_path = env_string("PAGESMITH_FONT").map(PathBuf::from);
        if let Some(dir) = env_string("PAGESMITH_OUT_DIR") {
            cfg.out_dir = PathBuf::from(&dir);
            cfg.log_dir = PathBuf::from(dir);
        }
        cfg
    }

    pub fn validate(&self) -> PageResult<()> {
        self.retry.validate()?;
        if self.layout.min_font_size == 0 || self.layout.min_font_size > self.layout.font_size {
            return Err(PageError::validation(
                "caption min_font_size must be in 1..=font_size",
            ));
        }
        if let CaptionMode::Band { percent } = self.caption_mode
            && !(1..=50).contains(&percent)
        {
            return Err(PageError::validation(format!(
                "caption band percent must be in 1..=50, got {percent}"
            )));
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
