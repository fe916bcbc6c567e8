use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    ThumbResult,
    render::frame::{FrameRGBA, write_png},
};

/// Consumer of finished thumbnails, in batch order.
pub trait FrameSink {
    /// Called once before the first frame with the number of frames to come.
    fn begin(&mut self, total: usize) -> ThumbResult<()>;
    fn push_frame(&mut self, file_name: &str, frame: &FrameRGBA) -> ThumbResult<()>;
    fn end(&mut self) -> ThumbResult<()>;
}

/// Writes each frame as a PNG file into one directory.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, _total: usize) -> ThumbResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, file_name: &str, frame: &FrameRGBA) -> ThumbResult<()> {
        let path = self.dir.join(file_name);
        write_png(frame, &path)?;
        tracing::info!(path = %path.display(), "generated");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Keep only the names when false.
    keep_frames: bool,
    names: Vec<String>,
    frames: Vec<FrameRGBA>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            keep_frames: true,
            ..Self::default()
        }
    }

    /// Sink that records file names and drops the pixels.
    pub fn names_only() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, total: usize) -> ThumbResult<()> {
        self.names.clear();
        self.frames.clear();
        self.names.reserve(total);
        Ok(())
    }

    fn push_frame(&mut self, file_name: &str, frame: &FrameRGBA) -> ThumbResult<()> {
        self.names.push(file_name.to_owned());
        if self.keep_frames {
            self.frames.push(frame.clone());
        }
        Ok(())
    }

    fn end(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}
