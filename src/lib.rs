//! Pagesmith composes illustrated pages into a paginated document.
//!
//! A run takes a [`StoryPlan`], asks an [`ImageService`] for artwork per page
//! through the tiered [`ImageSynthesizer`], lays each caption out with the
//! [`LayoutEngine`], draws it with [`composite_caption`], and assembles the
//! fixed-size pages into a [`Document`] that [`write_pdf`] serializes.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod audit;
pub mod book;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod plan;
pub mod render;
pub mod synth;
pub mod text;

pub use crate::foundation::config::{
    CaptionMode, ImagenSettings, PipelineConfig, PlaceholderSpec, RetryPolicy, StyleProfile,
};
pub use crate::foundation::core::{PageSize, PixelBox, Rgba8, SurfaceSize};
pub use crate::foundation::error::{PageError, PageResult};

pub use crate::assemble::document::{Document, Page, PageAssembler};
pub use crate::audit::PromptLog;
pub use crate::book::{
    BookOutput, BookRenderer, CancelFlag, CancelToken, NeverCancel, PageReport, output_file_name,
    style_for_plan,
};
pub use crate::encode::pdf::{encode_pdf, write_pdf};
pub use crate::layout::engine::{
    Alignment, AutoFitSettings, CaptionSpec, CornerStamp, Edge, EdgeChooser, FixedEdge,
    LayoutEngine, LayoutResult, LayoutSettings, PanelShape, ReservedRegion, SeededEdgeChooser,
    TextAlign,
};
pub use crate::plan::{CoverRecord, PageKind, PageRecord, StoryPlan};
pub use crate::render::compositor::{CaptionStyle, PanelStyle, composite_caption, draw_panel};
pub use crate::synth::clock::{RecordingSleeper, Sleeper, ThreadSleeper};
pub use crate::synth::imagen::ImagenService;
pub use crate::synth::request::{AspectRatio, GenerationRequest, PromptComposer};
pub use crate::synth::service::{ImageService, ServiceError};
pub use crate::synth::synthesizer::{
    AttemptOutcome, AttemptRecord, ImageSynthesizer, SynthesisPolicy, SynthesisResult,
};
pub use crate::text::font::{CaptionFont, DEFAULT_FONT_CANDIDATES};
pub use crate::text::measure::{FixedAdvanceMeasure, TextMeasure};
