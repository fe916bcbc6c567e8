//! Deterministic surface that records draw calls instead of rasterizing.
//!
//! Text is measured with a fixed per-character advance, so layouts do not depend on installed
//! fonts. Used by tests and by `generate --dry-run`.

use crate::{
    ThumbResult,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    render::{
        frame::FrameRGBA,
        surface::{
            FontSpec, PlacedText, RenderSurface, SurfaceFactory, TextBaseline, TextMeasure,
            TextPaint,
        },
    },
};

/// Every character advances by `size * ratio` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ThumbResult<f64> {
        Ok(text.chars().count() as f64 * font.size * self.ratio)
    }
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    LinearGradient {
        area: Rect,
        from: Point,
        to: Point,
        stops: [Rgba8; 2],
    },
    RadialGlow {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    RoundedRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    Text {
        lines: Vec<PlacedText>,
        font: FontSpec,
        baseline: TextBaseline,
        paint: TextPaint,
    },
    Image {
        width: u32,
        height: u32,
        dst: Rect,
    },
}

pub struct RecordingSurface<'a> {
    canvas: Canvas,
    metrics: FixedAdvance,
    ops: Vec<DrawOp>,
    log: Option<&'a mut Vec<Vec<DrawOp>>>,
}

impl RecordingSurface<'static> {
    pub fn new(canvas: Canvas) -> Self {
        Self::with_metrics(canvas, FixedAdvance::default())
    }

    pub fn with_metrics(canvas: Canvas, metrics: FixedAdvance) -> Self {
        Self {
            canvas,
            metrics,
            ops: Vec::new(),
            log: None,
        }
    }
}

impl RecordingSurface<'_> {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

impl TextMeasure for RecordingSurface<'_> {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ThumbResult<f64> {
        self.metrics.measure_text(text, font)
    }
}

impl RenderSurface for RecordingSurface<'_> {
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
        self.ops.push(DrawOp::LinearGradient {
            area,
            from,
            to,
            stops,
        });
        Ok(())
    }

    fn fill_radial_glow(&mut self, center: Point, radius: f64, color: Rgba8) -> ThumbResult<()> {
        self.ops.push(DrawOp::RadialGlow {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) -> ThumbResult<()> {
        self.ops.push(DrawOp::RoundedRect {
            rect,
            radius,
            color,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        lines: &[PlacedText],
        font: &FontSpec,
        baseline: TextBaseline,
        paint: &TextPaint,
    ) -> ThumbResult<()> {
        self.ops.push(DrawOp::Text {
            lines: lines.to_vec(),
            font: font.clone(),
            baseline,
            paint: *paint,
        });
        Ok(())
    }

    fn draw_image(&mut self, frame: &FrameRGBA, dst: Rect) -> ThumbResult<()> {
        self.ops.push(DrawOp::Image {
            width: frame.width,
            height: frame.height,
            dst,
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> ThumbResult<FrameRGBA> {
        let RecordingSurface {
            canvas, ops, log, ..
        } = *self;
        if let Some(log) = log {
            log.push(ops);
        }
        Ok(FrameRGBA::transparent(canvas))
    }
}

/// Hands out [`RecordingSurface`]s and keeps each finished surface's ops.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    pub metrics: FixedAdvance,
    /// Ops of every finished surface, in finish order.
    pub finished: Vec<Vec<DrawOp>>,
}

impl SurfaceFactory for RecordingFactory {
    fn create(&mut self, canvas: Canvas) -> ThumbResult<Box<dyn RenderSurface + '_>> {
        Ok(Box::new(RecordingSurface {
            canvas,
            metrics: self.metrics,
            ops: Vec::new(),
            log: Some(&mut self.finished),
        }))
    }
}
