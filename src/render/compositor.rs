use crate::foundation::core::{PixelBox, Rgba8, SurfaceSize};
use crate::foundation::error::{PageError, PageResult};
use crate::layout::engine::{LayoutResult, PanelShape, TextAlign};
use crate::render::blur::{blur_rgba8_premul, sigma_for_radius};
use crate::render::composite::over_in_place;
use crate::render::raster::{premultiplied_bytes, surface_dims_u16, unpremultiplied_image};
use crate::text::engine::TextBrush;
use crate::text::font::CaptionFont;

/// How the caption backing panel is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelStyle {
    Opaque,
    /// Panel painted at `alpha`, then softened with a Gaussian of `blur_radius` px.
    TranslucentBlurred { alpha: u8, blur_radius: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionStyle {
    pub panel: PanelStyle,
    pub panel_color: Rgba8,
    pub text_color: Rgba8,
    pub corner_radius: f64,
}

impl CaptionStyle {
    /// Soft white rounded panel with dark grey text.
    pub fn page() -> Self {
        Self {
            panel: PanelStyle::TranslucentBlurred {
                alpha: 195,
                blur_radius: 3,
            },
            panel_color: Rgba8::rgb(255, 255, 255),
            text_color: Rgba8::rgb(45, 45, 45),
            corner_radius: 30.0,
        }
    }

    /// Full-width title banner with navy text.
    pub fn banner() -> Self {
        Self {
            panel: PanelStyle::TranslucentBlurred {
                alpha: 230,
                blur_radius: 8,
            },
            panel_color: Rgba8::rgb(255, 255, 255),
            text_color: Rgba8::rgb(20, 20, 120),
            corner_radius: 0.0,
        }
    }

    pub fn opaque(panel_color: Rgba8, text_color: Rgba8) -> Self {
        Self {
            panel: PanelStyle::Opaque,
            panel_color,
            text_color,
            corner_radius: 30.0,
        }
    }

    fn panel_fill(&self) -> Rgba8 {
        match self.panel {
            PanelStyle::Opaque => self.panel_color.with_alpha(255),
            PanelStyle::TranslucentBlurred { alpha, .. } => self.panel_color.with_alpha(alpha),
        }
    }
}

/// Draws panel and text onto a copy of `base`. `base` is never modified.
#[tracing::instrument(skip_all, fields(lines = layout.wrapped_lines.len(), font_size = layout.font_size))]
pub fn composite_caption(
    base: &image::RgbaImage,
    layout: &LayoutResult,
    style: &CaptionStyle,
    font: &mut CaptionFont,
) -> PageResult<image::RgbaImage> {
    let size = SurfaceSize::of(base);
    let mut out = premultiplied_bytes(base);
    if layout.is_empty() {
        return unpremultiplied_image(out, size);
    }

    paint_panel(&mut out, size, layout, style)?;
    let text_layer = render_text_layer(size, layout, style, font)?;
    over_in_place(&mut out, &text_layer)?;
    unpremultiplied_image(out, size)
}

/// Panel only. Useful to inspect panel placement without a font.
pub fn draw_panel(
    base: &image::RgbaImage,
    layout: &LayoutResult,
    style: &CaptionStyle,
) -> PageResult<image::RgbaImage> {
    let size = SurfaceSize::of(base);
    let mut out = premultiplied_bytes(base);
    if !layout.is_empty() {
        paint_panel(&mut out, size, layout, style)?;
    }
    unpremultiplied_image(out, size)
}

fn paint_panel(
    dst: &mut [u8],
    size: SurfaceSize,
    layout: &LayoutResult,
    style: &CaptionStyle,
) -> PageResult<()> {
    let rect = layout.bounding_box.intersect(size.bounds());
    if layout.panel == PanelShape::Bare || rect.is_empty() {
        return Ok(());
    }

    let (w, h) = surface_dims_u16(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);

    let fill = style.panel_fill();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        fill.r, fill.g, fill.b, fill.a,
    ));
    match layout.panel {
        PanelShape::Rounded if style.corner_radius > 0.0 => {
            ctx.fill_path(&rounded_panel_path(rect, style.corner_radius));
        }
        _ => {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.left as f64,
                rect.top as f64,
                rect.right as f64,
                rect.bottom as f64,
            ));
        }
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let layer = pixmap.data_as_u8_slice();
    match style.panel {
        PanelStyle::TranslucentBlurred { blur_radius, .. } if blur_radius > 0 => {
            let blurred = blur_rgba8_premul(
                layer,
                size.width,
                size.height,
                blur_radius,
                sigma_for_radius(blur_radius),
            )?;
            over_in_place(dst, &blurred)
        }
        _ => over_in_place(dst, layer),
    }
}

fn render_text_layer(
    size: SurfaceSize,
    layout: &LayoutResult,
    style: &CaptionStyle,
    font: &mut CaptionFont,
) -> PageResult<Vec<u8>> {
    let (w, h) = surface_dims_u16(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let font_data = font.font_data();
    let brush = TextBrush::from(style.text_color);
    let size_px = layout.font_size as f32;

    for (i, line) in layout.wrapped_lines.iter().enumerate() {
        let shaped = font.shape_line(line, size_px, brush)?;
        let x = match layout.text_align {
            TextAlign::Left => layout.text_origin.0 as f64,
            TextAlign::Center => {
                let b = layout.bounding_box;
                b.left as f64 + (b.width() as f64 - shaped.width() as f64) / 2.0
            }
        };
        let y = layout.line_top(i) as f64;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

        for pline in shaped.lines() {
            for item in pline.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    let layer = pixmap.data_as_u8_slice().to_vec();
    if layer.len() != (size.width as usize) * (size.height as usize) * 4 {
        return Err(PageError::render("text layer size mismatch"));
    }
    Ok(layer)
}

fn rounded_panel_path(rect: PixelBox, radius: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::{PathEl, Shape};

    let to_cpu = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let shape = kurbo::RoundedRect::new(
        rect.left as f64,
        rect.top as f64,
        rect.right as f64,
        rect.bottom as f64,
        radius,
    );

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(to_cpu(p1), to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(to_cpu(p1), to_cpu(p2), to_cpu(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
