use std::borrow::Cow;

use crate::{
    assets::store::{FontHandle, isolated_collection},
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    render::composite::over_in_place,
    render::geometry::centered_origin_x,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Size and color of the rendered name.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in points.
    pub size_pt: f32,
    /// Dots per inch used to convert points to pixels.
    pub dpi: f32,
    /// Straight-alpha RGBA8 fill color.
    pub color_rgba8: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_pt: 36.0,
            dpi: 72.0,
            color_rgba8: [255, 255, 255, 255],
        }
    }
}

impl TextStyle {
    /// Pixel size: `size_pt * dpi / 72`.
    pub fn size_px(&self) -> f32 {
        self.size_pt * self.dpi / 72.0
    }

    fn brush(&self) -> TextBrushRgba8 {
        let [r, g, b, a] = self.color_rgba8;
        TextBrushRgba8 { r, g, b, a }
    }
}

/// Horizontal extent of a single run of text.
pub trait TextMeasure {
    /// Sum of horizontal advances for `text` at `size_px`, in pixels.
    fn measure_width(&mut self, text: &str, size_px: f32) -> PosterResult<f32>;
}

/// Measure `text` and return the centered left x together with the unrounded width.
pub fn centered_text_x<M: TextMeasure + ?Sized>(
    measure: &mut M,
    canvas_width: u32,
    text: &str,
    size_px: f32,
) -> PosterResult<(i32, f32)> {
    let width = measure.measure_width(text, size_px)?;
    Ok((centered_origin_x(canvas_width, width), width))
}

/// Where a name ended up on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    /// Left edge of the first glyph's origin.
    pub x: i32,
    /// Baseline of the first line.
    pub baseline_y: i32,
    /// Measured advance width before rounding.
    pub measured_width: f32,
}

/// Per-request text shaping state bound to the shared font.
///
/// Parley contexts are mutable, so each request builds its own engine; the font bytes
/// themselves are shared with the [`FontHandle`].
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
    glyph_font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font` in an isolated font context.
    pub fn new(font: &FontHandle) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext {
            collection: isolated_collection(),
            source_cache: parley::fontique::SourceCache::default(),
        };
        let families = font_ctx.collection.register_fonts(font.blob(), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PosterError::render("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            glyph_font: font.glyph_font().clone(),
        })
    }

    /// Shape and lay out `text` on a single unbounded line (explicit newlines still break).
    pub fn layout_plain(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PosterResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::render("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure_width(&mut self, text: &str, size_px: f32) -> PosterResult<f32> {
        let layout = self.layout_plain(text, size_px, TextBrushRgba8::default())?;
        Ok(layout.full_width())
    }
}

/// Draw `text` horizontally centered with its first baseline at `baseline_y`.
///
/// Text is never wrapped or truncated; anything beyond the canvas edges is simply not drawn.
#[tracing::instrument(skip(canvas, engine, style), fields(len = text.chars().count()))]
pub fn draw_centered_text(
    canvas: &mut Canvas,
    engine: &mut TextLayoutEngine,
    text: &str,
    style: &TextStyle,
    baseline_y: i32,
) -> PosterResult<TextPlacement> {
    let size_px = style.size_px();
    let (x, measured_width) = centered_text_x(engine, canvas.width, text, size_px)?;
    let layout = engine.layout_plain(text, size_px, style.brush())?;
    ensure_glyph_coverage(&layout, text)?;

    let text_layer = rasterize_layout(
        &layout,
        &engine.glyph_font,
        canvas.width,
        canvas.height,
        x as f32,
        baseline_y as f32,
    )?;
    over_in_place(&mut canvas.rgba8_premul, &text_layer.rgba8_premul)?;

    tracing::debug!(x, baseline_y, measured_width, "text drawn");
    Ok(TextPlacement {
        x,
        baseline_y,
        measured_width,
    })
}

fn ensure_glyph_coverage(
    layout: &parley::Layout<TextBrushRgba8>,
    text: &str,
) -> PosterResult<()> {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            if run.positioned_glyphs().any(|g| g.id == 0) {
                return Err(PosterError::render(format!(
                    "font has no glyph for a character in {text:?}"
                )));
            }
        }
    }
    Ok(())
}

fn rasterize_layout(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    width: u32,
    height: u32,
    origin_x: f32,
    baseline_y: f32,
) -> PosterResult<Canvas> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("canvas width exceeds rasterizer limit"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("canvas height exceeds rasterizer limit"))?;

    let first_baseline = layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline)
        .unwrap_or(0.0);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: origin_x + g.x,
                y: baseline_y + (g.y - first_baseline),
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .hint(true)
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Canvas::from_premul(width, height, pixmap.data_as_u8_slice().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
