//! Line-oriented driver for a [`StudioSession`].

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::mpsc::Receiver,
};

use anyhow::Context as _;

use crate::{
    ThumbError, ThumbResult,
    render::{
        frame::{decode_image_file, write_png},
        surface::SurfaceFactory,
    },
    studio::{
        command::{HELP, StudioCommand, parse_command},
        media::probe_video,
        sampler::{FrameSampler, StudioEvent},
        session::{FrameRequest, FrameResponse, StudioSession},
    },
};

/// Whether the loop keeps going after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct StudioConsole<'a, W: Write> {
    pub session: StudioSession,
    factory: &'a mut dyn SurfaceFactory,
    sampler: &'a FrameSampler,
    out: W,
    /// Rewritten after every change when set.
    preview: Option<PathBuf>,
}

impl<'a, W: Write> StudioConsole<'a, W> {
    pub fn new(
        session: StudioSession,
        factory: &'a mut dyn SurfaceFactory,
        sampler: &'a FrameSampler,
        out: W,
    ) -> Self {
        Self {
            session,
            factory,
            sampler,
            out,
            preview: None,
        }
    }

    pub fn with_preview(mut self, path: impl Into<PathBuf>) -> Self {
        self.preview = Some(path.into());
        self
    }

    pub fn into_parts(self) -> (StudioSession, W) {
        (self.session, self.out)
    }

    /// Handle events until `quit`, end of input, or every sender is gone.
    pub fn run(&mut self, events: &Receiver<StudioEvent>) -> ThumbResult<()> {
        for event in events.iter() {
            if self.handle_event(event)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Apply one event.
    ///
    /// Command, frame and preview failures are reported to the output and do not stop the loop;
    /// only a failed write to the output itself is returned.
    pub fn handle_event(&mut self, event: StudioEvent) -> ThumbResult<Flow> {
        match event {
            StudioEvent::Command(line) => {
                let outcome = parse_command(&line).and_then(|cmd| match cmd {
                    Some(cmd) => self.execute(cmd),
                    None => Ok(Flow::Continue),
                });
                match outcome {
                    Ok(flow) => Ok(flow),
                    Err(err) => {
                        self.say(format_args!("error: {err}"))?;
                        Ok(Flow::Continue)
                    }
                }
            }
            StudioEvent::InputClosed => Ok(Flow::Quit),
            StudioEvent::Frame { ticket, frame } => {
                match frame {
                    Ok(frame) => {
                        if self.session.frame_ready(ticket, frame) == FrameResponse::Accepted {
                            self.say(format_args!("frame {} ready", ticket.0))?;
                            if let Err(err) = self.refresh() {
                                self.say(format_args!("error: {err}"))?;
                            }
                        }
                    }
                    Err(err) => {
                        self.session.frame_failed(ticket);
                        self.say(format_args!("error: frame {}: {err}", ticket.0))?;
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one command against the session.
    pub fn execute(&mut self, cmd: StudioCommand) -> ThumbResult<Flow> {
        let refresh = cmd.edits_form();
        match cmd {
            StudioCommand::Title(t) => self.session.title = t,
            StudioCommand::Badge(b) => self.session.badge = b,
            StudioCommand::BadgePos(p) => self.session.badge_position = p,
            StudioCommand::Footer(f) => self.session.footer = f,
            StudioCommand::Script(path) => {
                let script = std::fs::read_to_string(&path)
                    .with_context(|| format!("read script '{}'", path.display()))?;
                if self.session.apply_script(&script) {
                    let title = self.session.title.clone();
                    self.say(format_args!("title: {title}"))?;
                }
            }
            StudioCommand::Image(path) => {
                let frame = decode_image_file(&path)?;
                self.session.set_image(frame);
            }
            StudioCommand::ClearBackground => self.session.clear_background(),
            StudioCommand::Video(path) => self.load_video(&path)?,
            StudioCommand::Seek(t) => {
                let request = self.session.request_frame(t)?;
                self.dispatch(request)?;
            }
            StudioCommand::Render => {
                let (_, report) = self.session.render(&mut *self.factory)?;
                let line = serde_json::to_string(&report)?;
                self.say(format_args!("{line}"))?;
            }
            StudioCommand::Export(path) => {
                self.session.export_png(&mut *self.factory, &path)?;
                self.say(format_args!("exported {}", path.display()))?;
            }
            StudioCommand::Help => self.say(format_args!("{HELP}"))?,
            StudioCommand::Quit => return Ok(Flow::Quit),
        }
        if refresh {
            self.refresh()?;
        }
        Ok(Flow::Continue)
    }

    /// Probe `path`, make it the background and request its first frame.
    pub fn load_video(&mut self, path: &Path) -> ThumbResult<()> {
        let info = probe_video(path)?;
        self.say(format_args!(
            "video {}x{} {:.2}s",
            info.width, info.height, info.duration_sec
        ))?;
        let request = self.session.set_video(info);
        self.dispatch(request)
    }

    fn dispatch(&mut self, request: FrameRequest) -> ThumbResult<()> {
        let Some(video) = self.session.video() else {
            return Err(ThumbError::input("no video loaded"));
        };
        if !self.sampler.request(video, request) {
            self.session.frame_failed(request.ticket);
            return Err(ThumbError::resource("frame sampler is not running"));
        }
        Ok(())
    }

    fn refresh(&mut self) -> ThumbResult<()> {
        let Some(path) = self.preview.clone() else {
            return Ok(());
        };
        let (frame, _) = self.session.render(&mut *self.factory)?;
        write_png(&frame, &path)
    }

    fn say(&mut self, msg: std::fmt::Arguments<'_>) -> ThumbResult<()> {
        writeln!(self.out, "{msg}").context("write studio output")?;
        Ok(())
    }
}

/// Block until the session's pending frame request is answered.
///
/// Stale responses are dropped; commands arriving meanwhile are ignored.
pub fn await_pending_frame(
    session: &mut StudioSession,
    events: &Receiver<StudioEvent>,
) -> ThumbResult<()> {
    while let Some(pending) = session.pending() {
        let event = events
            .recv()
            .map_err(|_| ThumbError::resource("frame sampler stopped before answering"))?;
        if let StudioEvent::Frame { ticket, frame } = event {
            match frame {
                Ok(frame) => {
                    session.frame_ready(ticket, frame);
                }
                Err(err) if ticket == pending => {
                    session.frame_failed(ticket);
                    return Err(err);
                }
                Err(_) => {}
            }
        }
    }
    Ok(())
}
