const SCRIPT_LINES: usize = 10;
const SUGGESTED_WORDS: usize = 8;

/// Title suggestion from a video script: the opening words of its first non-empty lines.
pub fn suggest_title_from_script(script: &str) -> String {
    script
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(SCRIPT_LINES)
        .flat_map(str::split_whitespace)
        .take(SUGGESTED_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
