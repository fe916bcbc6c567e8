use crate::{
    ThumbResult,
    foundation::{
        core::{Point, Rgba8},
        math::Rng64,
    },
    render::{frame::FrameRGBA, surface::RenderSurface},
    template::resolve::ResolvedTemplate,
};

/// Smallest and largest texture glow radius in pixels.
pub const GLOW_RADIUS: (f64, f64) = (20.0, 140.0);
/// Glow strength range as a fraction of the template texture opacity.
pub const GLOW_STRENGTH: (f64, f64) = (0.2, 1.0);

/// Darkening laid over a sampled frame, top-left to bottom-right.
const FRAME_OVERLAY: (f64, f64) = (0.48, 0.65);

/// What fills the canvas before the title is drawn.
#[derive(Clone, Copy, Debug)]
pub enum BackgroundSource<'a> {
    /// Template gradient plus random glows.
    Generated,
    /// A video frame or still image stretched over the canvas.
    Frame(&'a FrameRGBA),
}

/// Diagonal gradient followed by `texture.steps` random white glows.
pub fn draw_generated_background(
    surface: &mut dyn RenderSurface,
    template: &ResolvedTemplate,
    rng: &mut Rng64,
) -> ThumbResult<()> {
    let canvas = surface.canvas();
    surface.fill_linear_gradient(
        canvas.rect(),
        Point::ZERO,
        Point::new(canvas.w(), canvas.h()),
        template.gradient,
    )?;

    let opacity = template.texture.opacity;
    for _ in 0..template.texture.steps {
        let center = Point::new(rng.range(0.0, canvas.w()), rng.range(0.0, canvas.h()));
        let radius = rng.range(GLOW_RADIUS.0, GLOW_RADIUS.1);
        let strength = rng.range(GLOW_STRENGTH.0, GLOW_STRENGTH.1);
        surface.fill_radial_glow(center, radius, Rgba8::WHITE.with_alpha(opacity * strength))?;
    }
    Ok(())
}

/// Stretch `frame` over the canvas and darken it so the title stays legible.
pub fn draw_frame_background(surface: &mut dyn RenderSurface, frame: &FrameRGBA) -> ThumbResult<()> {
    let canvas = surface.canvas();
    surface.draw_image(frame, canvas.rect())?;
    surface.fill_linear_gradient(
        canvas.rect(),
        Point::ZERO,
        Point::new(canvas.w(), canvas.h()),
        [
            Rgba8::BLACK.with_alpha(FRAME_OVERLAY.0),
            Rgba8::BLACK.with_alpha(FRAME_OVERLAY.1),
        ],
    )
}

pub fn draw_background(
    surface: &mut dyn RenderSurface,
    template: &ResolvedTemplate,
    source: BackgroundSource<'_>,
    rng: &mut Rng64,
) -> ThumbResult<()> {
    match source {
        BackgroundSource::Generated => draw_generated_background(surface, template, rng),
        BackgroundSource::Frame(frame) => draw_frame_background(surface, frame),
    }
}
