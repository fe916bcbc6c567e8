use std::sync::Arc;

use vello_cpu::kurbo as vk;

use crate::{
    ThumbError, ThumbResult,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    render::{
        blur::{blur_rgba8_premul, shadow_kernel},
        fonts::{FontBook, TextBrushRgba8},
        frame::FrameRGBA,
        surface::{
            FontSpec, Outline, PlacedText, RenderSurface, SurfaceFactory, TextBaseline,
            TextMeasure, TextPaint,
        },
    },
};

/// vello_cpu raster surface; text is shaped through the borrowed [`FontBook`].
pub struct CpuSurface<'a> {
    fonts: &'a mut FontBook,
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

/// A shaped line positioned in canvas space.
struct ShapedLine {
    layout: parley::Layout<TextBrushRgba8>,
    /// Translation from layout space to canvas space.
    offset: vk::Vec2,
    bounds: Rect,
}

impl<'a> CpuSurface<'a> {
    pub fn new(fonts: &'a mut FontBook, canvas: Canvas) -> ThumbResult<Self> {
        let (w, h) = surface_size(canvas.width, canvas.height)?;
        Ok(Self {
            fonts,
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    /// Draw premultiplied pixels with their top-left corner mapped through `transform`.
    fn blit_premul(
        &mut self,
        rgba8_premul: Vec<u8>,
        width: u32,
        height: u32,
        transform: vk::Affine,
    ) -> ThumbResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let pixmap = premul_bytes_to_pixmap(rgba8_premul, width, height)?;
        self.ctx.set_transform(transform);
        self.ctx.set_paint_transform(vk::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vk::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
        self.ctx.set_transform(vk::Affine::IDENTITY);
        Ok(())
    }

    fn shape_lines(
        &mut self,
        lines: &[PlacedText],
        font: &FontSpec,
        baseline: TextBaseline,
    ) -> ThumbResult<Vec<ShapedLine>> {
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            let layout = self
                .fonts
                .layout_line(&line.text, font, TextBrushRgba8::default())?;
            let Some(metrics) = layout.lines().next().map(|l| *l.metrics()) else {
                continue;
            };
            let (ascent, descent) = (f64::from(metrics.ascent), f64::from(metrics.descent));
            let baseline_y = match baseline {
                TextBaseline::Alphabetic => line.origin.y,
                TextBaseline::Middle => line.origin.y + (ascent - descent) / 2.0,
                TextBaseline::Bottom => line.origin.y - descent,
            };
            let width = f64::from(layout.width());
            out.push(ShapedLine {
                offset: vk::Vec2::new(line.origin.x, baseline_y - f64::from(metrics.baseline)),
                bounds: Rect::new(
                    line.origin.x,
                    baseline_y - ascent,
                    line.origin.x + width,
                    baseline_y + descent,
                ),
                layout,
            });
        }
        Ok(out)
    }

    fn draw_shadow(
        &mut self,
        shaped: &[ShapedLine],
        outline: Option<Outline>,
        color: Rgba8,
        blur: f64,
        offset: crate::foundation::core::Vec2,
    ) -> ThumbResult<()> {
        let Some(bounds) = shaped.iter().map(|l| l.bounds).reduce(|a, b| a.union(b)) else {
            return Ok(());
        };
        let (radius, sigma) = shadow_kernel(blur);
        let stroke_pad = outline.map_or(0.0, |o| o.width / 2.0);
        let region = bounds
            .inflate(stroke_pad + f64::from(radius) + 2.0, stroke_pad + f64::from(radius) + 2.0)
            .expand();
        let (w, h) = surface_size(region.width() as u32, region.height() as u32)?;
        if w == 0 || h == 0 {
            return Ok(());
        }

        let mut layer = vello_cpu::RenderContext::new(w, h);
        let shift = vk::Vec2::new(-region.x0, -region.y0);
        let outline = outline.map(|o| Outline { color, ..o });
        paint_lines(&mut layer, self.fonts, shaped, shift, color, outline)?;
        layer.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        layer.render_to_pixmap(&mut pixmap);

        let blurred = if radius == 0 {
            pixmap.data_as_u8_slice().to_vec()
        } else {
            blur_rgba8_premul(
                pixmap.data_as_u8_slice(),
                u32::from(w),
                u32::from(h),
                radius,
                sigma,
            )?
        };
        self.blit_premul(
            blurred,
            u32::from(w),
            u32::from(h),
            vk::Affine::translate((region.x0 + offset.x, region.y0 + offset.y)),
        )
    }
}

impl TextMeasure for CpuSurface<'_> {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ThumbResult<f64> {
        self.fonts.measure_text(text, font)
    }
}

impl RenderSurface for CpuSurface<'_> {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_linear_gradient(
        &mut self,
        area: Rect,
        from: Point,
        to: Point,
        stops: [Rgba8; 2],
    ) -> ThumbResult<()> {
        let Some((x0, y0, w, h)) = pixel_bounds(area, self.canvas) else {
            return Ok(());
        };
        let dir = to - from;
        let len2 = dir.hypot2();
        let mut buf = vec![0u8; w as usize * h as usize * 4];
        for (i, px) in buf.chunks_exact_mut(4).enumerate() {
            let x = f64::from(x0) + (i % w as usize) as f64 + 0.5;
            let y = f64::from(y0) + (i / w as usize) as f64 + 0.5;
            let t = if len2 > 0.0 {
                ((Point::new(x, y) - from).dot(dir) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            px.copy_from_slice(&lerp_rgba8(stops[0], stops[1], t).premul().to_array());
        }
        self.blit_premul(
            buf,
            w,
            h,
            vk::Affine::translate((f64::from(x0), f64::from(y0))),
        )
    }

    fn fill_radial_glow(&mut self, center: Point, radius: f64, color: Rgba8) -> ThumbResult<()> {
        if !(radius.is_finite() && radius > 0.0) || color.a == 0 {
            return Ok(());
        }
        let area = Rect::from_center_size(center, (radius * 2.0, radius * 2.0));
        let Some((x0, y0, w, h)) = pixel_bounds(area, self.canvas) else {
            return Ok(());
        };
        let mut buf = vec![0u8; w as usize * h as usize * 4];
        for (i, px) in buf.chunks_exact_mut(4).enumerate() {
            let x = f64::from(x0) + (i % w as usize) as f64 + 0.5;
            let y = f64::from(y0) + (i / w as usize) as f64 + 0.5;
            let t = (Point::new(x, y) - center).hypot() / radius;
            if t >= 1.0 {
                continue;
            }
            let c = color.with_alpha(color.alpha_f64() * (1.0 - t));
            px.copy_from_slice(&c.premul().to_array());
        }
        self.blit_premul(
            buf,
            w,
            h,
            vk::Affine::translate((f64::from(x0), f64::from(y0))),
        )
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) -> ThumbResult<()> {
        let radius = radius.max(0.0).min(rect.width() / 2.0).min(rect.height() / 2.0);
        let shape = vk::RoundedRect::new(rect.x0, rect.y0, rect.x1, rect.y1, radius);
        self.ctx.set_transform(vk::Affine::IDENTITY);
        self.ctx.set_paint(to_color(color));
        self.ctx.fill_path(&vk::Shape::to_path(&shape, 0.1));
        Ok(())
    }

    fn draw_text(
        &mut self,
        lines: &[PlacedText],
        font: &FontSpec,
        baseline: TextBaseline,
        paint: &TextPaint,
    ) -> ThumbResult<()> {
        let shaped = self.shape_lines(lines, font, baseline)?;
        let outline = paint.outline.filter(|o| o.width > 0.0 && o.color.a > 0);
        if let Some(shadow) = paint.shadow.filter(|s| s.color.a > 0) {
            self.draw_shadow(&shaped, outline, shadow.color, shadow.blur, shadow.offset)?;
        }
        paint_lines(
            &mut self.ctx,
            self.fonts,
            &shaped,
            vk::Vec2::ZERO,
            paint.fill,
            outline,
        )
    }

    fn draw_image(&mut self, frame: &FrameRGBA, dst: Rect) -> ThumbResult<()> {
        if frame.width == 0 || frame.height == 0 || dst.area() <= 0.0 {
            return Ok(());
        }
        let sx = dst.width() / f64::from(frame.width);
        let sy = dst.height() / f64::from(frame.height);
        self.blit_premul(
            frame.data.clone(),
            frame.width,
            frame.height,
            vk::Affine::translate((dst.x0, dst.y0)) * vk::Affine::scale_non_uniform(sx, sy),
        )
    }

    fn finish(mut self: Box<Self>) -> ThumbResult<FrameRGBA> {
        let (w, h) = surface_size(self.canvas.width, self.canvas.height)?;
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA::from_premul(
            self.canvas.width,
            self.canvas.height,
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

impl SurfaceFactory for FontBook {
    fn create(&mut self, canvas: Canvas) -> ThumbResult<Box<dyn RenderSurface + '_>> {
        Ok(Box::new(CpuSurface::new(self, canvas)?))
    }
}

/// Stroke every line first when outlined, then fill, so outlines never cover neighbouring glyphs.
fn paint_lines(
    ctx: &mut vello_cpu::RenderContext,
    fonts: &mut FontBook,
    shaped: &[ShapedLine],
    shift: vk::Vec2,
    fill: Rgba8,
    outline: Option<Outline>,
) -> ThumbResult<()> {
    for line in shaped {
        ctx.set_transform(vk::Affine::translate(line.offset + shift));
        if let Some(o) = outline {
            ctx.set_paint(to_color(o.color));
            ctx.set_stroke(vk::Stroke::new(o.width).with_join(vk::Join::Round));
            glyph_runs(ctx, fonts, &line.layout, GlyphMode::Stroke)?;
        }
        ctx.set_paint(to_color(fill));
        glyph_runs(ctx, fonts, &line.layout, GlyphMode::Fill)?;
    }
    ctx.set_transform(vk::Affine::IDENTITY);
    Ok(())
}

#[derive(Clone, Copy)]
enum GlyphMode {
    Fill,
    Stroke,
}

fn glyph_runs(
    ctx: &mut vello_cpu::RenderContext,
    fonts: &mut FontBook,
    layout: &parley::Layout<TextBrushRgba8>,
    mode: GlyphMode,
) -> ThumbResult<()> {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let run = glyph_run.run();
            let run_font = run.font();
            let font = fonts.render_font(run_font.data.id(), run_font.index)?;
            let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(&font).font_size(run.font_size());
            match mode {
                GlyphMode::Fill => builder.fill_glyphs(glyphs),
                GlyphMode::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
    Ok(())
}

fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn lerp_rgba8(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    let mix = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba8::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Integer pixel box of `area` clipped to the canvas: `(x0, y0, width, height)`.
fn pixel_bounds(area: Rect, canvas: Canvas) -> Option<(u32, u32, u32, u32)> {
    let clipped = area.expand().intersect(canvas.rect());
    if !(clipped.width() > 0.0 && clipped.height() > 0.0) {
        return None;
    }
    let (x0, y0) = (clipped.x0.max(0.0) as u32, clipped.y0.max(0.0) as u32);
    let (x1, y1) = (clipped.x1 as u32, clipped.y1 as u32);
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1 - x0, y1 - y0))
}

fn surface_size(width: u32, height: u32) -> ThumbResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ThumbError::resource("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ThumbError::resource("surface height exceeds u16"))?;
    Ok((w, h))
}

fn premul_bytes_to_pixmap(
    rgba8_premul: Vec<u8>,
    width: u32,
    height: u32,
) -> ThumbResult<vello_cpu::Pixmap> {
    let (w, h) = surface_size(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ThumbError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
