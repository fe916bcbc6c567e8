//! Minimal CSV reader for input rows.
//!
//! One record per physical line: lines are trimmed and blank lines skipped, so quoted cells
//! cannot span lines. Cells are comma separated, trimmed, and may be wrapped in double quotes with
//! `""` as an escaped quote. The first line is the header row; header names are lower-cased.

use serde_json::{Map, Value};

use crate::input::item::{Item, normalize_row};

/// Split one CSV line into trimmed cells.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if inside_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                out.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    out.push(current.trim().to_owned());
    out
}

/// Raw rows keyed by lower-cased header.
pub fn parse_csv_rows(content: &str) -> Vec<Map<String, Value>> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = parse_csv_line(header)
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect();

    lines
        .map(|line| {
            let cells = parse_csv_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let cell = cells.get(i).cloned().unwrap_or_default();
                    (h.clone(), Value::String(cell))
                })
                .collect()
        })
        .collect()
}

/// Parse CSV text into normalized items.
pub fn parse_csv(content: &str) -> Vec<Item> {
    parse_csv_rows(content)
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row, i))
        .collect()
}
