use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::{ThumbError, ThumbResult, foundation::core::Canvas};

/// A rendered frame as premultiplied RGBA8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.width as usize * canvas.height as usize * 4],
        }
    }

    /// Wrap premultiplied bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ThumbResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(ThumbError::render(format!(
                "frame buffer is {} bytes, expected {}x{}x4",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap straight-alpha bytes (as produced by decoders), premultiplying in place.
    pub fn from_straight(width: u32, height: u32, mut data: Vec<u8>) -> ThumbResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Copy of the data with alpha divided back out.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Decode a still image file (PNG, JPEG, ...) into a frame.
pub fn decode_image_file(path: &Path) -> ThumbResult<FrameRGBA> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
        .map_err(|e| ThumbError::resource(format!("decode image '{}': {e}", path.display())))
}

/// Decode encoded image bytes into a frame.
pub fn decode_image(bytes: &[u8]) -> ThumbResult<FrameRGBA> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ThumbError::resource(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameRGBA::from_straight(width, height, rgba.into_raw())
}

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> ThumbResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
        .ok_or_else(|| ThumbError::render("frame buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ThumbError::render(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Encode `frame` and write it to `path`, creating parent directories.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> ThumbResult<()> {
    let png = encode_png(frame)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
