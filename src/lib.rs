//! thumbkit renders fixed-size promotional thumbnails from structured rows and a JSON template.
//!
//! The core is a deterministic text-fitting engine: a title is wrapped and shrunk until it fits
//! the template's line and width limits, then composed with a background, badge and footer on a
//! [`RenderSurface`].
//!
//! - Batch: [`load_items`] + [`load_template`] + [`run_batch`] into a [`FrameSink`]
//! - Interactive: a [`StudioSession`] driven by [`StudioConsole`], with video frames sampled by a
//!   [`FrameSampler`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod batch;
pub(crate) mod compose;
pub(crate) mod input;
pub(crate) mod render;
pub(crate) mod studio;
pub(crate) mod template;
pub(crate) mod text;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ThumbError, ThumbResult};
pub use crate::foundation::math::Rng64;

pub use crate::template::color::parse_css_color;
pub use crate::template::descriptor::TemplateDescriptor;
pub use crate::template::load::{load_template, template_path};
pub use crate::template::resolve::{
    BadgePosition, BadgeStyle, FooterStyle, ResolvedTemplate, ShadowStyle, TextureStyle,
    TitleStyle,
};

pub use crate::text::fit::{FitConstraints, FitResult, candidate_sizes, fit_title, truncate_words};
pub use crate::text::wrap::{ELLIPSIS, wrap_text};

pub use crate::render::cpu::CpuSurface;
pub use crate::render::fonts::{FontBook, RegisteredFont};
pub use crate::render::frame::{FrameRGBA, decode_image, decode_image_file, encode_png, write_png};
pub use crate::render::record::{DrawOp, FixedAdvance, RecordingFactory, RecordingSurface};
pub use crate::render::surface::{
    FontSpec, Outline, PlacedText, RenderSurface, SurfaceFactory, TextBaseline, TextMeasure,
    TextPaint,
};

pub use crate::compose::background::{BackgroundSource, draw_background};
pub use crate::compose::layout::{
    BadgeBox, FooterPlacement, LayoutReport, TitleBlock, compose_thumbnail,
};

pub use crate::input::csv::{parse_csv, parse_csv_line};
pub use crate::input::item::{Item, normalize_row};
pub use crate::input::load::{load_items, parse_json_items};

pub use crate::batch::naming::{output_file_name, safe_filename};
pub use crate::batch::pipeline::{
    BatchOptions, BatchReport, DEFAULT_SEED, run_batch, seed_from_clock, select_items,
};
pub use crate::batch::sink::{FrameSink, InMemorySink, PngDirSink};

pub use crate::studio::command::{HELP as STUDIO_HELP, StudioCommand, parse_command};
pub use crate::studio::console::{Flow, StudioConsole, await_pending_frame};
pub use crate::studio::media::{VideoInfo, decode_video_frame_rgba8, probe_video};
pub use crate::studio::sampler::{FrameSampler, StudioEvent, spawn_line_reader};
pub use crate::studio::script::suggest_title_from_script;
pub use crate::studio::session::{
    FrameRequest, FrameResponse, FrameTicket, PLACEHOLDER_TITLE, StudioSession,
};
