//! Live form state of the interactive compositor.
//!
//! Video seeks are modeled as tickets: [`StudioSession::request_frame`] supersedes any pending
//! request, and [`StudioSession::frame_ready`] only accepts the frame for the newest ticket.

use std::path::Path;

use crate::{
    ThumbError, ThumbResult,
    compose::{
        background::BackgroundSource,
        layout::{LayoutReport, compose_thumbnail},
    },
    foundation::math::Rng64,
    input::item::Item,
    render::{
        frame::{FrameRGBA, write_png},
        surface::SurfaceFactory,
    },
    studio::{media::VideoInfo, script::suggest_title_from_script},
    template::resolve::{BadgePosition, ResolvedTemplate},
};

/// Title drawn while the form title is empty.
pub const PLACEHOLDER_TITLE: &str = "Your Video Title Here";

const STUDIO_SEED: u64 = 0x5eed;

/// Identifier of one frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameTicket(pub u64);

/// A seek the sampler should serve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRequest {
    pub ticket: FrameTicket,
    pub time_sec: f64,
}

/// Outcome of delivering a sampled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameResponse {
    Accepted,
    /// A newer request superseded this ticket; the frame was dropped.
    Stale,
}

#[derive(Clone, Debug, Default)]
enum Backdrop {
    #[default]
    Generated,
    Image(FrameRGBA),
    Video {
        info: VideoInfo,
        /// Last accepted frame; `None` until the first one arrives.
        frame: Option<FrameRGBA>,
    },
}

#[derive(Clone, Debug)]
pub struct StudioSession {
    pub title: String,
    pub badge: String,
    pub badge_position: BadgePosition,
    pub footer: String,
    template: ResolvedTemplate,
    backdrop: Backdrop,
    next_ticket: u64,
    pending: Option<FrameTicket>,
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new(ResolvedTemplate::studio())
    }
}

impl StudioSession {
    pub fn new(template: ResolvedTemplate) -> Self {
        Self {
            title: String::new(),
            badge: String::new(),
            badge_position: template.badge.position,
            footer: String::new(),
            template,
            backdrop: Backdrop::Generated,
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn template(&self) -> &ResolvedTemplate {
        &self.template
    }

    /// The item the form currently describes.
    pub fn item(&self) -> Item {
        let title = match self.title.trim() {
            "" => PLACEHOLDER_TITLE,
            t => t,
        };
        Item::new(1, title)
            .with_badge(self.badge.trim())
            .with_footer(self.footer.trim())
    }

    /// Use the suggested title from `script` when the title field is empty.
    ///
    /// Returns whether the title changed.
    pub fn apply_script(&mut self, script: &str) -> bool {
        if !self.title.trim().is_empty() {
            return false;
        }
        let suggested = suggest_title_from_script(script);
        if suggested.is_empty() {
            return false;
        }
        self.title = suggested;
        true
    }

    /// Replace the background with a still image.
    pub fn set_image(&mut self, frame: FrameRGBA) {
        self.pending = None;
        self.backdrop = Backdrop::Image(frame);
    }

    /// Switch to a video background and request its first frame.
    pub fn set_video(&mut self, info: VideoInfo) -> FrameRequest {
        let time = info.initial_time();
        self.backdrop = Backdrop::Video { info, frame: None };
        self.issue(time)
    }

    pub fn clear_background(&mut self) {
        self.pending = None;
        self.backdrop = Backdrop::Generated;
    }

    /// Loaded video, if the background is one.
    pub fn video(&self) -> Option<&VideoInfo> {
        match &self.backdrop {
            Backdrop::Video { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Ticket still waiting for a frame.
    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Seek the loaded video; any earlier pending request becomes stale.
    pub fn request_frame(&mut self, time_sec: f64) -> ThumbResult<FrameRequest> {
        let time = match &self.backdrop {
            Backdrop::Video { info, .. } => info.clamp_time(time_sec),
            _ => return Err(ThumbError::input("no video loaded; use `video <file>` first")),
        };
        Ok(self.issue(time))
    }

    fn issue(&mut self, time_sec: f64) -> FrameRequest {
        self.next_ticket += 1;
        let ticket = FrameTicket(self.next_ticket);
        self.pending = Some(ticket);
        FrameRequest { ticket, time_sec }
    }

    /// Deliver a sampled frame. Only the newest pending ticket is accepted.
    pub fn frame_ready(&mut self, ticket: FrameTicket, frame: FrameRGBA) -> FrameResponse {
        if self.pending != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale frame");
            return FrameResponse::Stale;
        }
        match &mut self.backdrop {
            Backdrop::Video { frame: slot, .. } => {
                *slot = Some(frame);
                self.pending = None;
                FrameResponse::Accepted
            }
            _ => FrameResponse::Stale,
        }
    }

    /// Forget a failed request so later renders do not wait on it.
    pub fn frame_failed(&mut self, ticket: FrameTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    fn background(&self) -> BackgroundSource<'_> {
        match &self.backdrop {
            Backdrop::Image(frame)
            | Backdrop::Video {
                frame: Some(frame),
                ..
            } => BackgroundSource::Frame(frame),
            _ => BackgroundSource::Generated,
        }
    }

    /// Compose the current form into a fresh surface from `factory`.
    pub fn render(
        &self,
        factory: &mut dyn SurfaceFactory,
    ) -> ThumbResult<(FrameRGBA, LayoutReport)> {
        let mut template = self.template.clone();
        template.badge.position = self.badge_position;
        let item = self.item();

        let mut surface = factory.create(template.canvas)?;
        let mut rng = Rng64::for_item(STUDIO_SEED, item.id);
        let report = compose_thumbnail(
            surface.as_mut(),
            &item,
            &template,
            self.background(),
            &mut rng,
        )?;
        let frame = surface.finish()?;
        Ok((frame, report))
    }

    /// Render and write the result as a PNG file.
    pub fn export_png(&self, factory: &mut dyn SurfaceFactory, path: &Path) -> ThumbResult<()> {
        let (frame, _) = self.render(factory)?;
        write_png(&frame, path)?;
        tracing::info!(path = %path.display(), "exported thumbnail");
        Ok(())
    }
}
