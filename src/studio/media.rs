//! Single-frame video sampling through `ffprobe`/`ffmpeg` subprocesses.
//!
//! Requires the `media-ffmpeg` feature; without it every call returns a resource error.

use std::path::{Path, PathBuf};

use crate::{ThumbError, ThumbResult, render::frame::FrameRGBA};

/// Probed properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// 0 when the container does not report a duration.
    pub duration_sec: f64,
}

impl VideoInfo {
    /// Clamp a requested seek time into the playable range.
    pub fn clamp_time(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
        if self.duration_sec > 0.0 {
            t.min(self.duration_sec)
        } else {
            t
        }
    }

    /// First frame shown after loading: one second in, or the end of shorter clips.
    pub fn initial_time(&self) -> f64 {
        self.duration_sec.clamp(0.0, 1.0)
    }
}

#[cfg(any(feature = "media-ffmpeg", test))]
#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[cfg(any(feature = "media-ffmpeg", test))]
#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[cfg(any(feature = "media-ffmpeg", test))]
#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[cfg(any(feature = "media-ffmpeg", test))]
/// Parse `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_json(source_path: &Path, json: &[u8]) -> ThumbResult<VideoInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| ThumbError::resource(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ThumbError::resource(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let (Some(width), Some(height)) = (video_stream.width, video_stream.height) else {
        return Err(ThumbError::resource("missing video size from ffprobe"));
    };
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0);

    Ok(VideoInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_sec,
    })
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> ThumbResult<VideoInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ThumbError::resource(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ThumbError::resource(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(source_path, &out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> ThumbResult<VideoInfo> {
    Err(ThumbError::resource(
        "video backgrounds require the 'media-ffmpeg' feature",
    ))
}

/// Decode the frame shown at `time_sec`.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_video_frame_rgba8(source: &VideoInfo, time_sec: f64) -> ThumbResult<FrameRGBA> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{:.6}", source.clamp_time(time_sec))])
        .arg("-i")
        .arg(&source.source_path)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
        .output()
        .map_err(|e| ThumbError::resource(format!("failed to run ffmpeg: {e}")))?;
    if !out.status.success() {
        return Err(ThumbError::resource(format!(
            "ffmpeg frame decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.width as usize * source.height as usize * 4;
    if expected_len == 0 {
        return Err(ThumbError::resource("video frame size is zero"));
    }
    if out.stdout.len() < expected_len {
        return Err(ThumbError::resource(format!(
            "ffmpeg returned {} bytes, expected {expected_len} for '{}'",
            out.stdout.len(),
            source.source_path.display()
        )));
    }
    let mut rgba = out.stdout;
    rgba.truncate(expected_len);
    FrameRGBA::from_straight(source.width, source.height, rgba)
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_video_frame_rgba8(_source: &VideoInfo, _time_sec: f64) -> ThumbResult<FrameRGBA> {
    Err(ThumbError::resource(
        "video backgrounds require the 'media-ffmpeg' feature",
    ))
}
