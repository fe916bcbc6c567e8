use crate::{
    ThumbResult,
    render::surface::{FontSpec, TextMeasure},
};

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Greedy word wrap limited to `max_lines`.
///
/// Words that do not fit once the line budget is spent are dropped. Whenever the result uses the
/// full budget, the last line is shortened word by word until it fits with an ellipsis and then
/// gets one. A last line made of a single oversized word is kept as is (plus the ellipsis).
pub fn wrap_text<M>(
    measure: &mut M,
    text: &str,
    font: &FontSpec,
    max_width: f64,
    max_lines: usize,
) -> ThumbResult<Vec<String>>
where
    M: TextMeasure + ?Sized,
{
    let mut lines: Vec<String> = Vec::new();
    if max_lines == 0 {
        return Ok(lines);
    }

    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_owned()
        } else {
            format!("{line} {word}")
        };
        if measure.measure_text(&candidate, font)? <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        line = word.to_owned();
        if lines.len() == max_lines - 1 {
            lines.push(std::mem::take(&mut line));
            break;
        }
    }

    if !line.is_empty() && lines.len() < max_lines {
        lines.push(line);
    }
    lines.truncate(max_lines);

    if lines.len() == max_lines
        && let Some(last) = lines.last_mut()
    {
        ellipsize(measure, last, font, max_width)?;
    }
    Ok(lines)
}

fn ellipsize<M>(measure: &mut M, line: &mut String, font: &FontSpec, max_width: f64) -> ThumbResult<()>
where
    M: TextMeasure + ?Sized,
{
    loop {
        let Some(cut) = line.rfind(' ') else {
            break;
        };
        if measure.measure_text(&format!("{line}{ELLIPSIS}"), font)? <= max_width {
            break;
        }
        line.truncate(cut);
    }
    if !line.ends_with(ELLIPSIS) {
        line.push(ELLIPSIS);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
