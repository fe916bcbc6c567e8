//! Font registration and text shaping.
//!
//! Fonts come from files only; nothing is discovered from the system. Family stacks written in
//! templates (`"Inter, Arial, sans-serif"`) resolve against registered family names and file
//! stems, and always end with the first registered family so text never falls off the end of the
//! stack.

use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    ThumbError, ThumbResult,
    render::surface::{FontSpec, TextMeasure},
};

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];
const UNSUPPORTED_FONT_EXTENSIONS: [&str; 2] = ["woff", "woff2"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// A font file and the families it registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFont {
    pub path: Option<PathBuf>,
    pub families: Vec<String>,
}

/// Registered fonts plus the Parley contexts used to shape with them.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: Vec<RegisteredFont>,
    /// Lower-cased family name or file stem to registered family name.
    aliases: HashMap<String, String>,
    /// Registration order of distinct families.
    families: Vec<String>,
    blobs: HashMap<u64, vello_cpu::peniko::Blob<u8>>,
    render_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty book; measuring text fails until a font is registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
            aliases: HashMap::new(),
            families: Vec::new(),
            blobs: HashMap::new(),
            render_fonts: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Font files registered so far, in registration order.
    pub fn registered(&self) -> &[RegisteredFont] {
        &self.registered
    }

    /// Distinct family names, in registration order.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Register every supported font file directly inside `dir`.
    ///
    /// A missing directory registers nothing. Returns the number of files registered.
    pub fn load_dir(&mut self, dir: &Path) -> ThumbResult<usize> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "font directory not present");
            return Ok(0);
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if UNSUPPORTED_FONT_EXTENSIONS.contains(&ext.as_str()) {
                tracing::warn!(path = %path.display(), "skipping compressed web font");
                continue;
            }
            if !FONT_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }
            match self.register_file(&path) {
                Ok(_) => count += 1,
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping font"),
            }
        }
        Ok(count)
    }

    /// Register one font file; its stem becomes an alias for its first family.
    pub fn register_file(&mut self, path: &Path) -> ThumbResult<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let stem = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned);
        let families = self.register(bytes, Some(path.to_path_buf()), stem.as_deref())?;
        tracing::info!(path = %path.display(), families = ?families, "loaded font");
        Ok(families)
    }

    /// Register in-memory font bytes under an optional alias.
    pub fn register_bytes(&mut self, bytes: Vec<u8>, alias: Option<&str>) -> ThumbResult<Vec<String>> {
        self.register(bytes, None, alias)
    }

    fn register(
        &mut self,
        bytes: Vec<u8>,
        path: Option<PathBuf>,
        alias: Option<&str>,
    ) -> ThumbResult<Vec<String>> {
        let blob = parley::fontique::Blob::from(bytes.clone());
        let blob_id = blob.id();
        let registered = self.font_ctx.collection.register_fonts(blob, None);

        let mut families = Vec::new();
        for (family_id, _) in &registered {
            let Some(name) = self.font_ctx.collection.family_name(*family_id) else {
                continue;
            };
            let name = name.to_owned();
            if !families.contains(&name) {
                families.push(name);
            }
        }
        let Some(primary) = families.first().cloned() else {
            return Err(ThumbError::resource(match &path {
                Some(p) => format!("no font families found in '{}'", p.display()),
                None => "no font families found in font bytes".to_owned(),
            }));
        };

        self.blobs
            .insert(blob_id, vello_cpu::peniko::Blob::from(bytes));
        for name in &families {
            self.aliases
                .entry(name.to_lowercase())
                .or_insert_with(|| name.clone());
            if !self.families.contains(name) {
                self.families.push(name.clone());
            }
        }
        if let Some(alias) = alias.map(str::trim).filter(|a| !a.is_empty()) {
            self.aliases
                .entry(alias.to_lowercase())
                .or_insert_with(|| primary.clone());
        }
        self.registered.push(RegisteredFont {
            path,
            families: families.clone(),
        });
        Ok(families)
    }

    /// Map a comma-separated family stack onto registered families.
    ///
    /// Unknown names are dropped; the first registered family is always appended as the final
    /// fallback. The result is a quoted Parley font stack source string.
    pub fn resolve_stack(&self, stack: &str) -> ThumbResult<String> {
        let fallback = self.families.first().ok_or_else(|| {
            ThumbError::resource("no fonts registered; pass --font or --fonts-dir")
        })?;
        let mut names: Vec<&str> = Vec::new();
        for raw in stack.split(',') {
            let key = raw
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_lowercase();
            if let Some(name) = self.aliases.get(&key)
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        if !names.contains(&fallback.as_str()) {
            names.push(fallback);
        }
        Ok(names
            .iter()
            .map(|n| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// Shape `text` as a single unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: TextBrushRgba8,
    ) -> ThumbResult<parley::Layout<TextBrushRgba8>> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(ThumbError::render("font size must be finite and > 0"));
        }
        let stack = self.resolve_stack(&font.family)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Glyph-outline font for a shaped run, keyed by the Parley blob id and face index.
    pub(crate) fn render_font(
        &mut self,
        blob_id: u64,
        index: u32,
    ) -> ThumbResult<vello_cpu::peniko::FontData> {
        if let Some(font) = self.render_fonts.get(&(blob_id, index)) {
            return Ok(font.clone());
        }
        let blob = self
            .blobs
            .get(&blob_id)
            .ok_or_else(|| ThumbError::render("shaped run references an unregistered font"))?;
        let font = vello_cpu::peniko::FontData::new(blob.clone(), index);
        self.render_fonts.insert((blob_id, index), font.clone());
        Ok(font)
    }
}

impl TextMeasure for FontBook {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> ThumbResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let layout = self.layout_line(text, font, TextBrushRgba8::default())?;
        Ok(f64::from(layout.width()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
