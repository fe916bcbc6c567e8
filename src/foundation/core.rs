pub use kurbo::{Point, Rect, Vec2};

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed thumbnail size every template renders at.
    pub const THUMBNAIL: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Width as `f64` for layout math.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for layout math.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Full-frame rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    /// Build a color from straight channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha given as a 0..1 fraction.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Alpha as a 0..1 fraction.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Convert to premultiplied RGBA8.
    pub fn premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
