use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pagesmith::{
    BookRenderer, CaptionFont, CaptionMode, CaptionSpec, FixedEdge, ImageSynthesizer,
    ImagenService, LayoutEngine, NeverCancel, PageSize, PipelineConfig, PromptLog,
    SeededEdgeChooser, StoryPlan, StyleProfile, SurfaceSize, SynthesisPolicy, ThreadSleeper,
    composite_caption, style_for_plan, write_pdf,
};

#[derive(Parser, Debug)]
#[command(name = "pagesmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a plan into a PDF (requires GOOGLE_API_KEY).
    Book(BookArgs),
    /// Draw one caption onto a local image and write a PNG.
    Caption(CaptionArgs),
    /// Parse a plan and print it as normalized JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct BookArgs {
    /// Plan file: JSON, or the manual text format.
    plan: PathBuf,

    /// Treat the plan as the manual text format regardless of extension.
    #[arg(long)]
    manual: bool,

    /// Keep at most this many story pages.
    #[arg(long)]
    pages: Option<usize>,

    /// Output PDF path. Defaults to a fresh name in the output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// `a4`, `letter`, or `<w>x<h>` in points.
    #[arg(long, default_value = "a4")]
    page_size: String,

    /// `band`, `random-edge`, or `top-banner`.
    #[arg(long, default_value = "band")]
    caption: String,

    /// Height of the reserved caption band in percent of the page.
    #[arg(long, default_value_t = 10)]
    band_percent: u32,

    /// Caption font file (TTF/OTF).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for edge selection in `random-edge` mode.
    #[arg(long)]
    seed: Option<u64>,

    /// Stamp page numbers in the bottom-right corner.
    #[arg(long)]
    page_numbers: bool,

    #[arg(long)]
    max_attempts: Option<u32>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory for the prompt audit log.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Do not write the prompt audit log.
    #[arg(long)]
    no_prompt_log: bool,
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Caption text.
    #[arg(long)]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Lay the text out as a cover title banner.
    #[arg(long)]
    title: bool,

    #[arg(long, default_value = "band")]
    caption: String,

    #[arg(long, default_value_t = 10)]
    band_percent: u32,

    #[arg(long)]
    font: Option<PathBuf>,

    /// In `random-edge` mode: place at the top (`true`) or bottom (`false`).
    #[arg(long)]
    top: Option<bool>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    plan: PathBuf,

    #[arg(long)]
    manual: bool,

    #[arg(long)]
    pages: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Book(args) => cmd_book(args),
        Command::Caption(args) => cmd_caption(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn read_plan(path: &Path, manual: bool, pages: Option<usize>) -> anyhow::Result<StoryPlan> {
    let is_json = !manual
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut plan = if is_json {
        StoryPlan::from_json_path(path)
    } else {
        StoryPlan::from_manual_path(path)
    }
    .with_context(|| format!("read plan '{}'", path.display()))?;
    if let Some(n) = pages {
        plan.truncate_pages(n);
    }
    Ok(plan)
}

fn load_font(preferred: Option<&Path>) -> anyhow::Result<CaptionFont> {
    let font = CaptionFont::load_first(&CaptionFont::candidates(preferred))
        .context("load caption font (pass --font or set PAGESMITH_FONT)")?;
    tracing::info!(family = font.family_name(), "caption font");
    Ok(font)
}

fn cmd_book(args: BookArgs) -> anyhow::Result<()> {
    let mut config = PipelineConfig::from_env();
    config.page_size = PageSize::parse(&args.page_size)?;
    config.caption_mode = CaptionMode::parse(&args.caption, args.band_percent)?;
    if let Some(n) = args.max_attempts {
        config.retry.max_attempts_per_tier = n;
    }
    if let Some(secs) = args.timeout_secs {
        config.retry.per_attempt_timeout = Duration::from_secs(secs);
    }
    if args.page_numbers {
        config.page_numbers = Some(Default::default());
    }
    if let Some(font) = args.font {
        config.font_path = Some(font);
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    config.validate()?;

    let plan = read_plan(&args.plan, args.manual, args.pages)?;
    let style = style_for_plan(StyleProfile::storybook(), &plan, config.caption_mode);
    tracing::info!(
        title = %plan.title,
        pages = plan.pages.len(),
        run_tag = %style.run_tag,
        "starting book"
    );

    let font = load_font(config.font_path.as_deref())?;
    let audit = if args.no_prompt_log {
        PromptLog::disabled()
    } else {
        PromptLog::timestamped_in(&config.log_dir)?
    };
    if let Some(path) = audit.path() {
        tracing::info!(path = %path.display(), "prompt log");
    }

    let service = ImagenService::new(
        config.imagen.clone(),
        config.retry.per_attempt_timeout + Duration::from_secs(5),
    )?;
    let synth = ImageSynthesizer::new(
        Arc::new(service),
        Box::new(ThreadSleeper),
        audit,
        SynthesisPolicy {
            retry: config.retry,
            placeholder: config.placeholder,
        },
    )?;
    let chooser = match args.seed {
        Some(seed) => SeededEdgeChooser::with_seed(seed),
        None => SeededEdgeChooser::new(),
    };

    let mut renderer = BookRenderer::new(config, style, synth, font, Box::new(chooser))?;
    let out_path = args.out.unwrap_or_else(|| renderer.output_path());
    let output = renderer.render(&plan, &NeverCancel)?;

    let placeholders = output.placeholder_pages();
    if placeholders > 0 {
        tracing::warn!(placeholders, "some pages use placeholder artwork");
    }
    write_pdf(&output.document, &out_path)?;
    tracing::info!(
        pages = output.document.len(),
        calls = renderer.synthesizer().calls_made(),
        "book complete"
    );
    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let config = PipelineConfig::from_env();
    let base = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?
        .to_rgba8();
    let surface = SurfaceSize::of(&base);
    let mut font = load_font(args.font.as_deref().or(config.font_path.as_deref()))?;
    let engine = LayoutEngine::new(config.layout)?;

    let (placed, style) = if args.title {
        let placed = engine.fit_banner(&mut font, &args.text, surface, &config.title_fit)?;
        (placed, config.title_caption_style)
    } else {
        let mode = CaptionMode::parse(&args.caption, args.band_percent)?;
        let (reserved, alignment) = mode.placement();
        let spec = CaptionSpec::new(args.text.clone(), reserved, alignment);
        let placed = match args.top {
            Some(top) => {
                let edge = if top {
                    pagesmith::Edge::Top
                } else {
                    pagesmith::Edge::Bottom
                };
                engine.layout(&mut font, &spec, surface, &mut FixedEdge(edge))?
            }
            None => engine.layout(&mut font, &spec, surface, &mut SeededEdgeChooser::new())?,
        };
        (placed, config.page_caption_style)
    };
    if placed.degraded {
        tracing::warn!(font_size = placed.font_size, "caption did not fit at its configured size");
    }

    let composed = composite_caption(&base, &placed, &style, &mut font)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    composed
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let plan = read_plan(&args.plan, args.manual, args.pages)?;
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}
