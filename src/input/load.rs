use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::{
    ThumbError, ThumbResult,
    input::{
        csv::parse_csv,
        item::{Item, normalize_row},
    },
};

/// Parse a JSON document: an array of rows, or an object with an `items` array.
pub fn parse_json_items(content: &str) -> ThumbResult<Vec<Item>> {
    let parsed: Value = serde_json::from_str(content)?;
    let rows = match parsed {
        Value::Array(rows) => rows,
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let empty = serde_json::Map::new();
    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row.as_object().unwrap_or(&empty), i))
        .collect())
}

/// Load items from a `.csv` or `.json` file, chosen by extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_items(path: &Path) -> ThumbResult<Vec<Item>> {
    if !path.is_file() {
        return Err(ThumbError::input(format!(
            "input file not found: {}",
            path.display()
        )));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = || {
        std::fs::read_to_string(path).with_context(|| format!("read input '{}'", path.display()))
    };
    let items = match ext.as_str() {
        "json" => parse_json_items(&content()?).map_err(|e| match e {
            ThumbError::Serde(msg) => ThumbError::serde(format!("{}: {msg}", path.display())),
            other => other,
        })?,
        "csv" => parse_csv(&content()?),
        _ => {
            return Err(ThumbError::input(format!(
                "unsupported input format: .{ext}; use .csv or .json"
            )));
        }
    };
    tracing::debug!(rows = items.len(), "loaded input rows");
    Ok(items)
}
