const MAX_SLUG_CHARS: usize = 80;

/// File-system safe slug of `text`, or `fallback` when nothing usable remains.
///
/// Lower-cases, drops apostrophes, turns every run of characters outside `[a-z0-9]` into a single
/// `-`, trims leading and trailing dashes, then keeps the first 80 characters.
pub fn safe_filename(text: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.to_lowercase().chars() {
        match c {
            '\'' | '\u{2019}' => {}
            'a'..='z' | '0'..='9' => {
                if gap && !slug.is_empty() {
                    slug.push('-');
                }
                gap = false;
                slug.push(c);
            }
            _ => gap = true,
        }
    }
    slug.truncate(MAX_SLUG_CHARS);
    if slug.is_empty() {
        fallback.to_owned()
    } else {
        slug
    }
}

/// `{NN}-{slug}.png` for the 1-based `position` of an item in the batch.
pub fn output_file_name(position: usize, title: &str) -> String {
    let slug = safe_filename(title, &format!("thumbnail-{position}"));
    format!("{position:02}-{slug}.png")
}
