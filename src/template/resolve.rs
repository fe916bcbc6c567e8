use crate::{
    foundation::core::{Canvas, Rgba8, Vec2},
    template::{color::color_or, descriptor::TemplateDescriptor},
    text::fit::MIN_FONT_SIZE,
};

const DEFAULT_GRADIENT: [&str; 2] = ["#111827", "#1d4ed8"];
const DEFAULT_FAMILY: &str = "Arial, sans-serif";

/// Corner a badge is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgePosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl BadgePosition {
    /// Parse a kebab-case position name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Some(Self::TopLeft),
            "top-right" => Some(Self::TopRight),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-right" => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// Parse a position name; unknown or missing values anchor top-left.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// Title typography and fitting limits.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TitleStyle {
    pub family: String,
    pub weight: f32,
    pub max_size: f64,
    pub min_size: f64,
    pub size_step: f64,
    pub line_height_ratio: f64,
    pub baseline_ratio: f64,
    pub max_lines: usize,
    pub visible_words_max: usize,
    pub fill: Rgba8,
    pub outline: Rgba8,
    /// Stroke width; 0 disables the outline.
    pub outline_width: f64,
}

/// Drop shadow applied to title lines.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ShadowStyle {
    pub color: Rgba8,
    pub blur: f64,
    pub offset: Vec2,
}

/// Random radial glows scattered over generated backgrounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextureStyle {
    pub opacity: f64,
    pub steps: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BadgeStyle {
    pub family: String,
    pub weight: f32,
    pub font_size: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub margin: f64,
    pub radius: f64,
    pub fill: Rgba8,
    pub text_color: Rgba8,
    pub position: BadgePosition,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FooterStyle {
    pub family: String,
    pub weight: f32,
    pub font_size: f64,
    pub color: Rgba8,
    pub margin_bottom: f64,
}

/// Fully defaulted, typed template.
///
/// Built once per render from a [`TemplateDescriptor`]; layout code reads only this.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedTemplate {
    pub canvas: Canvas,
    /// Diagonal background gradient stops, top-left to bottom-right.
    pub gradient: [Rgba8; 2],
    pub padding: f64,
    pub title: TitleStyle,
    /// `None` when shadows are switched off.
    pub shadow: Option<ShadowStyle>,
    pub texture: TextureStyle,
    pub badge: BadgeStyle,
    pub footer: FooterStyle,
    /// Footer text used when an item has none.
    pub default_footer: String,
}

/// Zero and absent both take the default.
fn falsy(v: Option<f64>, default: f64) -> f64 {
    v.filter(|x| *x != 0.0).unwrap_or(default)
}

/// Only absent takes the default; explicit zero is kept.
fn nullish(v: Option<f64>, default: f64) -> f64 {
    v.unwrap_or(default)
}

/// Font sizes are falsy fields floored at the smallest drawable size.
fn font_size(v: Option<f64>, default: f64) -> f64 {
    let size = falsy(v, default);
    if size.is_finite() {
        size.max(MIN_FONT_SIZE)
    } else {
        default
    }
}

fn falsy_count(v: Option<f64>, default: usize) -> usize {
    let n = falsy(v, default as f64);
    if n <= 0.0 { 0 } else { n.floor() as usize }
}

fn falsy_text(v: Option<&String>, default: &str) -> String {
    v.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_owned()
}

impl ResolvedTemplate {
    /// Apply field defaults to a parsed descriptor.
    pub fn resolve(d: &TemplateDescriptor) -> Self {
        let c = &d.colors;
        let t = &d.typography;
        let e = &d.effects;
        let b = &d.badge;
        let f = &d.footer;

        let stops: Vec<&str> = c
            .background_gradient
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();
        let (first, second) = match stops.as_slice() {
            [] => (DEFAULT_GRADIENT[0], DEFAULT_GRADIENT[1]),
            [a] => (*a, *a),
            [a, z, ..] => (*a, if z.trim().is_empty() { *a } else { *z }),
        };
        let from = color_or(
            "colors.backgroundGradient[0]",
            Some(first),
            parse_default(DEFAULT_GRADIENT[0]),
        );
        let to = color_or("colors.backgroundGradient[1]", Some(second), from);

        let family = falsy_text(t.font_family.as_ref(), DEFAULT_FAMILY);
        let padding = nullish(d.layout.padding, 72.0);

        let max_size = font_size(t.title_max_size, 132.0);
        let min_size = font_size(t.title_min_size, 64.0);

        let title = TitleStyle {
            family: family.clone(),
            weight: (falsy(t.title_weight, 900.0) as f32).clamp(1.0, 1000.0),
            max_size,
            min_size,
            size_step: falsy(t.size_step, 2.0),
            line_height_ratio: falsy(t.line_height_ratio, 1.06),
            baseline_ratio: falsy(t.baseline_ratio, 0.84),
            max_lines: falsy_count(t.max_lines, 3),
            visible_words_max: falsy_count(t.visible_words_max, 6),
            fill: color_or("colors.title", c.title.as_deref(), Rgba8::WHITE),
            outline: color_or(
                "colors.titleOutline",
                c.title_outline.as_deref(),
                Rgba8::BLACK.with_alpha(0.9),
            ),
            outline_width: nullish(e.outline_width, 10.0).max(0.0),
        };

        let shadow = e.shadow.unwrap_or(false).then(|| ShadowStyle {
            color: color_or(
                "effects.shadowColor",
                e.shadow_color.as_deref(),
                Rgba8::BLACK.with_alpha(0.45),
            ),
            blur: nullish(e.shadow_blur, 22.0).max(0.0),
            offset: Vec2::new(
                nullish(e.shadow_offset_x, 0.0),
                nullish(e.shadow_offset_y, 8.0),
            ),
        });

        let texture_steps = nullish(e.texture_steps, 280.0);
        let texture = TextureStyle {
            opacity: nullish(e.texture_opacity, 0.09).clamp(0.0, 1.0),
            steps: if texture_steps <= 0.0 {
                0
            } else {
                texture_steps.floor().min(f64::from(u32::MAX)) as u32
            },
        };

        let badge = BadgeStyle {
            family: falsy_text(b.font_family.as_ref(), &family),
            weight: 900.0,
            font_size: font_size(b.font_size, 42.0),
            padding_x: falsy(b.padding_x, 22.0),
            padding_y: falsy(b.padding_y, 12.0),
            margin: falsy(b.margin, padding),
            radius: falsy(b.radius, 999.0),
            fill: color_or(
                "badge.fill",
                b.fill.as_deref(),
                Rgba8::new(0xef, 0x44, 0x44, 0xff),
            ),
            text_color: color_or("badge.textColor", b.text_color.as_deref(), Rgba8::WHITE),
            position: BadgePosition::parse_or_default(b.position.as_deref()),
        };

        let footer_color = f
            .text_color
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(f.color.as_deref());
        let footer = FooterStyle {
            family: falsy_text(f.font_family.as_ref(), &family),
            weight: 700.0,
            font_size: font_size(f.font_size, 30.0),
            color: color_or(
                "footer.textColor",
                footer_color,
                Rgba8::WHITE.with_alpha(0.95),
            ),
            margin_bottom: falsy(f.margin_bottom, 30.0),
        };

        Self {
            canvas: Canvas::THUMBNAIL,
            gradient: [from, to],
            padding,
            title,
            shadow,
            texture,
            badge,
            footer,
            default_footer: d
                .defaults
                .footer
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
        }
    }

    /// Built-in preset used by the interactive studio.
    pub fn studio() -> Self {
        let mut t = Self::resolve(&TemplateDescriptor::default());
        t.gradient = [
            parse_default("#0f172a"),
            parse_default(DEFAULT_GRADIENT[1]),
        ];
        t.title.max_size = 118.0;
        t.title.min_size = 54.0;
        t.title.line_height_ratio = 1.05;
        t.title.baseline_ratio = 0.82;
        t.title.visible_words_max = 8;
        t.title.outline = Rgba8::BLACK.with_alpha(0.92);
        t.texture = TextureStyle {
            opacity: 0.07,
            steps: 160,
        };
        t.badge.font_size = 40.0;
        t.badge.padding_x = 20.0;
        t.badge.padding_y = 14.0;
        t.badge.margin = 50.0;
        t.badge.position = BadgePosition::TopRight;
        t.footer.margin_bottom = 28.0;
        t
    }

    /// Footer text for an item: its own footer, else the template fallback.
    pub fn footer_text<'a>(&'a self, item_footer: &'a str) -> &'a str {
        let own = item_footer.trim();
        if own.is_empty() {
            self.default_footer.as_str()
        } else {
            own
        }
    }
}

impl Default for ResolvedTemplate {
    fn default() -> Self {
        Self::resolve(&TemplateDescriptor::default())
    }
}

fn parse_default(s: &str) -> Rgba8 {
    crate::template::color::parse_css_color(s).unwrap_or(Rgba8::BLACK)
}

#[cfg(test)]
#[path = "../../tests/unit/template/resolve.rs"]
mod tests;
