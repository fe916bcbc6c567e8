//! Drawing target abstraction shared by the compositor and every backend.
//!
//! A [`RenderSurface`] is created per render by a [`SurfaceFactory`], drawn into front to back,
//! and consumed by [`RenderSurface::finish`], which yields the finished [`FrameRGBA`].

use crate::{
    ThumbResult,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    render::frame::FrameRGBA,
    template::resolve::ShadowStyle,
};

/// Font selection for one text draw or measurement.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FontSpec {
    /// Comma separated family stack, e.g. `"Inter, Arial, sans-serif"`.
    pub family: String,
    /// CSS-style weight (100..=900 is typical).
    pub weight: f32,
    /// Size in pixels.
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: f32, size: f64) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// Horizontal advance measurement for a single line of text.
pub trait TextMeasure {
    /// Width in pixels of `text` set in `font`, without wrapping.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ThumbResult<f64>;
}

/// Vertical anchor for [`PlacedText::origin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    /// `origin.y` is the alphabetic baseline.
    Alphabetic,
    /// `origin.y` is the middle of the em box.
    Middle,
    /// `origin.y` is the bottom of the descender.
    Bottom,
}

/// One line of text with its left anchor.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedText {
    pub text: String,
    pub origin: Point,
}

/// Stroke drawn under the text fill.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Outline {
    pub color: Rgba8,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextPaint {
    pub fill: Rgba8,
    pub outline: Option<Outline>,
    pub shadow: Option<ShadowStyle>,
}

impl TextPaint {
    /// Plain fill with no outline or shadow.
    pub fn solid(fill: Rgba8) -> Self {
        Self {
            fill,
            outline: None,
            shadow: None,
        }
    }
}

/// Raster target used by the compositor.
pub trait RenderSurface: TextMeasure {
    fn canvas(&self) -> Canvas;

    /// Fill `area` with a two-stop linear gradient running from `from` to `to`.
    fn fill_linear_gradient(
        &mut self,
        area: Rect,
        from: Point,
        to: Point,
        stops: [Rgba8; 2],
    ) -> ThumbResult<()>;

    /// Radial falloff from `color` at `center` to fully transparent at `radius`.
    fn fill_radial_glow(&mut self, center: Point, radius: f64, color: Rgba8) -> ThumbResult<()>;

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) -> ThumbResult<()>;

    /// Draw text lines sharing one font and paint.
    ///
    /// When `paint` carries a shadow, it is drawn once under all lines; the outline is stroked
    /// before the fill.
    fn draw_text(
        &mut self,
        lines: &[PlacedText],
        font: &FontSpec,
        baseline: TextBaseline,
        paint: &TextPaint,
    ) -> ThumbResult<()>;

    /// Blit `frame` scaled into `dst`.
    fn draw_image(&mut self, frame: &FrameRGBA, dst: Rect) -> ThumbResult<()>;

    /// Finish drawing and read back the frame.
    fn finish(self: Box<Self>) -> ThumbResult<FrameRGBA>;
}

/// Creates one fresh surface per render.
pub trait SurfaceFactory {
    fn create(&mut self, canvas: Canvas) -> ThumbResult<Box<dyn RenderSurface + '_>>;
}
