/// Convenience result type used across thumbkit.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// Top-level error taxonomy used by compositor and pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// Invalid or missing input rows (empty title, unsupported format, missing file).
    #[error("input error: {0}")]
    Input(String),

    /// Template descriptor could not be located.
    #[error("config error: {0}")]
    Config(String),

    /// Fonts, images, video frames or external tools unavailable.
    #[error("resource error: {0}")]
    Resource(String),

    /// Internal raster failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`ThumbError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ThumbError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ThumbError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ThumbError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ThumbError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
