use crate::foundation::core::Rgba8;

/// Parse a CSS color string (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()/rgba()`, `hsl()`, named).
pub fn parse_css_color(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("color must be non-empty".to_owned());
    }
    let c = csscolorparser::parse(s).map_err(|e| format!("invalid color \"{s}\": {e}"))?;
    let [r, g, b, a] = c.to_rgba8();
    Ok(Rgba8::new(r, g, b, a))
}

/// Parse `raw` if present, falling back to `default` when absent or unparsable.
///
/// Unparsable values are reported once through `tracing` with the template field name.
pub(crate) fn color_or(field: &str, raw: Option<&str>, default: Rgba8) -> Rgba8 {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return default;
    };
    match parse_css_color(raw) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(field, %err, "falling back to default color");
            default
        }
    }
}
