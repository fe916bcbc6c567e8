use crate::{
    ThumbResult,
    render::surface::{FontSpec, TextMeasure},
    text::wrap::{ELLIPSIS, wrap_text},
};

const DEFAULT_STEP: f64 = 2.0;

/// Limits for [`fit_title`].
#[derive(Clone, Debug, PartialEq)]
pub struct FitConstraints {
    pub max_width: f64,
    pub max_lines: usize,
    pub max_size: f64,
    pub min_size: f64,
    /// Decrement between candidate sizes; non-positive values fall back to 2.
    pub step: f64,
    /// Words kept before the title is cut with an ellipsis.
    pub max_visible_words: usize,
    pub family: String,
    pub weight: f32,
}

/// Chosen title size and its wrapped lines.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FitResult {
    pub font_size: f64,
    pub lines: Vec<String>,
}

/// Keep the first `max_words` words, marking the cut with an ellipsis.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_owned();
    }
    format!("{}{ELLIPSIS}", words[..max_words].join(" "))
}

/// Smallest font size any layout is attempted at.
pub const MIN_FONT_SIZE: f64 = 1.0;
/// Upper bound on sizes tried between `max` and `min`; the step widens to stay under it.
const MAX_CANDIDATES: u64 = 1024;

/// Descending font sizes to try: `max, max - step, ...` above `min`, then `min`.
///
/// Sizes are floored at [`MIN_FONT_SIZE`] and at most `MAX_CANDIDATES + 1` sizes are returned.
pub fn candidate_sizes(max_size: f64, min_size: f64, step: f64) -> Vec<f64> {
    let min_size = if min_size.is_finite() {
        min_size.max(MIN_FONT_SIZE)
    } else {
        MIN_FONT_SIZE
    };
    let max_size = if max_size.is_finite() {
        max_size.max(MIN_FONT_SIZE)
    } else {
        min_size
    };
    let min_size = min_size.min(max_size);

    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        DEFAULT_STEP
    };
    let step = step.max((max_size - min_size) / MAX_CANDIDATES as f64);

    let mut out: Vec<f64> = (0..MAX_CANDIDATES)
        .map(|i| max_size - i as f64 * step)
        .take_while(|size| *size > min_size)
        .collect();
    out.push(min_size);
    out
}

/// Pick the largest candidate size at which the title wraps within the constraints.
///
/// Falls back to the wrap computed at the minimum size when nothing fits.
pub fn fit_title<M>(measure: &mut M, text: &str, c: &FitConstraints) -> ThumbResult<FitResult>
where
    M: TextMeasure + ?Sized,
{
    let text = truncate_words(text, c.max_visible_words);
    let sizes = candidate_sizes(c.max_size, c.min_size, c.step);
    let mut font = FontSpec::new(c.family.clone(), c.weight, sizes[0]);
    let mut fallback = FitResult {
        font_size: sizes[sizes.len() - 1],
        lines: Vec::new(),
    };

    for size in sizes {
        font.size = size;
        let lines = wrap_text(measure, &text, &font, c.max_width, c.max_lines)?;
        if fits(measure, &lines, &font, c)? {
            return Ok(FitResult {
                font_size: size,
                lines,
            });
        }
        fallback = FitResult {
            font_size: size,
            lines,
        };
    }

    tracing::debug!(
        font_size = fallback.font_size,
        lines = fallback.lines.len(),
        "title does not fit at any candidate size; keeping minimum"
    );
    Ok(fallback)
}

fn fits<M>(
    measure: &mut M,
    lines: &[String],
    font: &FontSpec,
    c: &FitConstraints,
) -> ThumbResult<bool>
where
    M: TextMeasure + ?Sized,
{
    if lines.len() > c.max_lines {
        return Ok(false);
    }
    for line in lines {
        if measure.measure_text(line, font)? > c.max_width {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
