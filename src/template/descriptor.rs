//! Serde model of a template JSON document.
//!
//! Every field is optional and coerced leniently: numbers may arrive as JSON numbers or numeric
//! strings, flags follow JavaScript truthiness, and a section that is missing, `null`, or not an
//! object reads as an empty section. Nothing here applies defaults; see
//! [`crate::ResolvedTemplate::resolve`].

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Partially specified template as parsed from JSON.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Background and title colors.
    #[serde(default, deserialize_with = "section")]
    pub colors: ColorsSection,
    /// Title font and fitting limits.
    #[serde(default, deserialize_with = "section")]
    pub typography: TypographySection,
    /// Frame padding.
    #[serde(default, deserialize_with = "section")]
    pub layout: LayoutSection,
    /// Shadow, outline and texture parameters.
    #[serde(default, deserialize_with = "section")]
    pub effects: EffectsSection,
    /// Badge box styling.
    #[serde(default, deserialize_with = "section")]
    pub badge: BadgeSection,
    /// Footer text styling.
    #[serde(default, deserialize_with = "section")]
    pub footer: FooterSection,
    /// Fallback item values.
    #[serde(default, deserialize_with = "section")]
    pub defaults: DefaultsSection,
}

/// `colors` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorsSection {
    /// Gradient stops; only the first two are used.
    #[serde(default, deserialize_with = "string_list")]
    pub background_gradient: Option<Vec<String>>,
    /// Title fill color.
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    /// Title outline color.
    #[serde(default, deserialize_with = "text")]
    pub title_outline: Option<String>,
}

/// `typography` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySection {
    #[serde(default, deserialize_with = "text")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub title_max_size: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub title_min_size: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub line_height_ratio: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub max_lines: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub visible_words_max: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub title_weight: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub size_step: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub baseline_ratio: Option<f64>,
}

/// `layout` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSection {
    #[serde(default, deserialize_with = "number")]
    pub padding: Option<f64>,
}

/// `effects` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsSection {
    #[serde(default, deserialize_with = "truthy")]
    pub shadow: Option<bool>,
    #[serde(default, deserialize_with = "text")]
    pub shadow_color: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub shadow_blur: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub shadow_offset_x: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub shadow_offset_y: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub texture_opacity: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub texture_steps: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub outline_width: Option<f64>,
}

/// `badge` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSection {
    #[serde(default, deserialize_with = "number")]
    pub font_size: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub padding_x: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub padding_y: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub margin: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub radius: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub fill: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub position: Option<String>,
}

/// `footer` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterSection {
    #[serde(default, deserialize_with = "number")]
    pub font_size: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub text_color: Option<String>,
    /// Accepted spelling of `textColor`; `textColor` wins when both are set.
    #[serde(default, deserialize_with = "text")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub margin_bottom: Option<f64>,
}

/// `defaults` section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsSection {
    #[serde(default, deserialize_with = "text")]
    pub footer: Option<String>,
}

impl TemplateDescriptor {
    /// Parse a descriptor from JSON text.
    pub fn from_json_str(s: &str) -> crate::ThumbResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a descriptor from an already decoded JSON value.
    ///
    /// A non-object document reads as an empty template.
    pub fn from_value(v: Value) -> crate::ThumbResult<Self> {
        match v {
            Value::Object(_) => Ok(serde_json::from_value(v)?),
            _ => Ok(Self::default()),
        }
    }
}

fn section<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    match v {
        Value::Object(_) => serde_json::from_value(v).map_err(serde::de::Error::custom),
        _ => Ok(T::default()),
    }
}

fn number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_number))
}

fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_text))
}

fn truthy<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_truthy))
}

fn string_list<'de, D>(d: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => Some(items.iter().filter_map(coerce_text).collect()),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}

pub(crate) fn coerce_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

pub(crate) fn coerce_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_truthy(v: &Value) -> Option<bool> {
    match v {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan())),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }
}
