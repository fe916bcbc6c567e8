use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{ThumbError, ThumbResult, template::descriptor::TemplateDescriptor};

/// Path of the named template under `root`.
pub fn template_path(root: &Path, name: &str) -> PathBuf {
    root.join("templates").join(format!("{name}.json"))
}

/// Read `<root>/templates/<name>.json`.
#[tracing::instrument(skip(root), fields(root = %root.display()))]
pub fn load_template(root: &Path, name: &str) -> ThumbResult<TemplateDescriptor> {
    let path = template_path(root, name);
    if !path.is_file() {
        return Err(ThumbError::config(format!(
            "template not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read template {}", path.display()))?;
    let descriptor = TemplateDescriptor::from_json_str(&text).map_err(|e| match e {
        ThumbError::Serde(msg) => ThumbError::serde(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    tracing::debug!(path = %path.display(), "loaded template");
    Ok(descriptor)
}
