use serde_json::{Map, Value};

/// One thumbnail's worth of text.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Positive row identifier; seeds the per-item background texture.
    pub id: u64,
    pub title: String,
    pub subtitle: String,
    /// Upper-cased when drawn; empty means no badge.
    pub badge: String,
    /// Empty falls back to the template's default footer.
    pub footer: String,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Whether the item has something to put in the title slot.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Build an [`Item`] from a loosely typed row at zero-based `index`.
///
/// `id` is kept when it is a positive integer (number or numeric string), else `index + 1`.
/// Text fields are stringified and trimmed; `footer` falls back to `channel`.
pub fn normalize_row(row: &Map<String, Value>, index: usize) -> Item {
    let fallback_id = index as u64 + 1;
    let id = row.get("id").and_then(positive_id).unwrap_or(fallback_id);
    let footer = row
        .get("footer")
        .filter(|v| is_truthy(v))
        .or_else(|| row.get("channel"));

    Item {
        id,
        title: text_field(row.get("title")),
        subtitle: text_field(row.get("subtitle")),
        badge: text_field(row.get("badge")),
        footer: text_field(footer),
    }
}

fn positive_id(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 1.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_field(v: Option<&Value>) -> String {
    match v {
        Some(v) if is_truthy(v) => match v {
            Value::String(s) => s.trim().to_owned(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}
