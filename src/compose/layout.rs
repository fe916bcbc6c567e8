use crate::{
    ThumbError, ThumbResult,
    compose::background::{BackgroundSource, draw_background},
    foundation::{
        core::{Point, Rect},
        math::Rng64,
    },
    input::item::Item,
    render::surface::{FontSpec, Outline, PlacedText, RenderSurface, TextBaseline, TextPaint},
    template::resolve::{BadgePosition, ResolvedTemplate},
    text::fit::{FitConstraints, FitResult, fit_title},
};

/// Where the title block landed.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TitleBlock {
    #[serde(flatten)]
    pub fit: FitResult,
    pub line_height: f64,
    /// Left end of the first line's baseline.
    pub first_baseline: Point,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BadgeBox {
    /// Upper-cased label.
    pub text: String,
    pub rect: Rect,
    /// Corner radius actually drawn.
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FooterPlacement {
    pub text: String,
    /// Left end of the text's bottom edge.
    pub origin: Point,
}

/// Geometry of one composed thumbnail.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutReport {
    pub item_id: u64,
    pub title: TitleBlock,
    pub badge: Option<BadgeBox>,
    pub footer: Option<FooterPlacement>,
}

/// Draw background, title, badge and footer for `item`, in that order.
///
/// The item title must be non-empty; everything else is optional.
#[tracing::instrument(skip_all, fields(item = item.id))]
pub fn compose_thumbnail(
    surface: &mut dyn RenderSurface,
    item: &Item,
    template: &ResolvedTemplate,
    background: BackgroundSource<'_>,
    rng: &mut Rng64,
) -> ThumbResult<LayoutReport> {
    let title = item.title.trim();
    if title.is_empty() {
        return Err(ThumbError::input(format!(
            "item {} has an empty title",
            item.id
        )));
    }

    draw_background(surface, template, background, rng)?;
    let title = draw_title(surface, title, template)?;
    let badge = draw_badge(surface, &item.badge, template)?;
    let footer = draw_footer(surface, &item.footer, template)?;

    tracing::debug!(
        font_size = title.fit.font_size,
        lines = title.fit.lines.len(),
        badge = badge.is_some(),
        footer = footer.is_some(),
        "composed thumbnail"
    );
    Ok(LayoutReport {
        item_id: item.id,
        title,
        badge,
        footer,
    })
}

fn draw_title(
    surface: &mut dyn RenderSurface,
    title: &str,
    template: &ResolvedTemplate,
) -> ThumbResult<TitleBlock> {
    let canvas = surface.canvas();
    let style = &template.title;
    let constraints = FitConstraints {
        max_width: (canvas.w() - 2.0 * template.padding).max(0.0),
        max_lines: style.max_lines,
        max_size: style.max_size,
        min_size: style.min_size,
        step: style.size_step,
        max_visible_words: style.visible_words_max,
        family: style.family.clone(),
        weight: style.weight,
    };
    let fit = fit_title(surface, title, &constraints)?;

    let line_height = (fit.font_size * style.line_height_ratio).round();
    let block_height = fit.lines.len() as f64 * line_height;
    let first_baseline = Point::new(
        template.padding,
        (canvas.h() - block_height) / 2.0 + fit.font_size * style.baseline_ratio,
    );

    let placed: Vec<PlacedText> = fit
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| PlacedText {
            text: line.clone(),
            origin: Point::new(
                first_baseline.x,
                first_baseline.y + i as f64 * line_height,
            ),
        })
        .collect();
    let paint = TextPaint {
        fill: style.fill,
        outline: (style.outline_width > 0.0).then_some(Outline {
            color: style.outline,
            width: style.outline_width,
        }),
        shadow: template.shadow,
    };
    let font = FontSpec::new(style.family.clone(), style.weight, fit.font_size);
    if !placed.is_empty() {
        surface.draw_text(&placed, &font, TextBaseline::Alphabetic, &paint)?;
    }

    Ok(TitleBlock {
        fit,
        line_height,
        first_baseline,
    })
}

fn draw_badge(
    surface: &mut dyn RenderSurface,
    badge: &str,
    template: &ResolvedTemplate,
) -> ThumbResult<Option<BadgeBox>> {
    let text = badge.trim().to_uppercase();
    if text.is_empty() {
        return Ok(None);
    }
    let canvas = surface.canvas();
    let style = &template.badge;
    let font = FontSpec::new(style.family.clone(), style.weight, style.font_size);

    let width = surface.measure_text(&text, &font)? + 2.0 * style.padding_x;
    let height = style.font_size + 2.0 * style.padding_y;
    let m = style.margin;
    let (x, y) = match style.position {
        BadgePosition::TopLeft => (m, m),
        BadgePosition::TopRight => (canvas.w() - m - width, m),
        BadgePosition::BottomLeft => (m, canvas.h() - m - height),
        BadgePosition::BottomRight => (canvas.w() - m - width, canvas.h() - m - height),
    };
    let rect = Rect::new(x, y, x + width, y + height);
    let radius = style.radius.min(width / 2.0).min(height / 2.0);

    surface.fill_rounded_rect(rect, radius, style.fill)?;
    surface.draw_text(
        &[PlacedText {
            text: text.clone(),
            origin: Point::new(x + style.padding_x, y + height / 2.0),
        }],
        &font,
        TextBaseline::Middle,
        &TextPaint::solid(style.text_color),
    )?;

    Ok(Some(BadgeBox { text, rect, radius }))
}

fn draw_footer(
    surface: &mut dyn RenderSurface,
    item_footer: &str,
    template: &ResolvedTemplate,
) -> ThumbResult<Option<FooterPlacement>> {
    let text = template.footer_text(item_footer);
    if text.is_empty() {
        return Ok(None);
    }
    let canvas = surface.canvas();
    let style = &template.footer;
    let origin = Point::new(template.padding, canvas.h() - style.margin_bottom);
    surface.draw_text(
        &[PlacedText {
            text: text.to_owned(),
            origin,
        }],
        &FontSpec::new(style.family.clone(), style.weight, style.font_size),
        TextBaseline::Bottom,
        &TextPaint::solid(style.color),
    )?;
    Ok(Some(FooterPlacement {
        text: text.to_owned(),
        origin,
    }))
}
