//! Background threads feeding the studio event loop.
//!
//! Both the stdin reader and the frame sampler post into one [`StudioEvent`] channel; the loop
//! consumes events one at a time.

use std::{
    io::BufRead,
    sync::mpsc::{self, Receiver, Sender},
    thread::JoinHandle,
};

use crate::{
    ThumbResult,
    render::frame::FrameRGBA,
    studio::{
        media::VideoInfo,
        session::{FrameRequest, FrameTicket},
    },
};

#[derive(Debug)]
pub enum StudioEvent {
    /// One line typed by the user.
    Command(String),
    /// The command input reached end of file.
    InputClosed,
    /// A sampled frame, or the reason sampling failed.
    Frame {
        ticket: FrameTicket,
        frame: ThumbResult<FrameRGBA>,
    },
}

/// Read lines from `reader` into `events` until EOF or the receiver goes away.
pub fn spawn_line_reader<R>(reader: R, events: Sender<StudioEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if events.send(StudioEvent::Command(line)).is_err() {
                return;
            }
        }
        let _ = events.send(StudioEvent::InputClosed);
    })
}

struct SampleJob {
    video: VideoInfo,
    request: FrameRequest,
}

/// Worker thread that decodes requested video frames.
///
/// Requests queued while a decode is running collapse to the newest one.
pub struct FrameSampler {
    jobs: Option<Sender<SampleJob>>,
    worker: Option<JoinHandle<()>>,
}

impl FrameSampler {
    pub fn spawn<F>(events: Sender<StudioEvent>, mut decode: F) -> Self
    where
        F: FnMut(&VideoInfo, f64) -> ThumbResult<FrameRGBA> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SampleJob>();
        let worker = std::thread::spawn(move || {
            while let Some(job) = next_job(&rx) {
                let frame = decode(&job.video, job.request.time_sec);
                let event = StudioEvent::Frame {
                    ticket: job.request.ticket,
                    frame,
                };
                if events.send(event).is_err() {
                    return;
                }
            }
        });
        Self {
            jobs: Some(tx),
            worker: Some(worker),
        }
    }

    /// Sampler backed by the `ffmpeg` decoder.
    pub fn ffmpeg(events: Sender<StudioEvent>) -> Self {
        Self::spawn(events, crate::studio::media::decode_video_frame_rgba8)
    }

    /// Queue a request; returns false when the worker has stopped.
    pub fn request(&self, video: &VideoInfo, request: FrameRequest) -> bool {
        let Some(jobs) = &self.jobs else {
            return false;
        };
        jobs.send(SampleJob {
            video: video.clone(),
            request,
        })
        .is_ok()
    }

    /// Stop accepting requests and wait for the worker to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!("frame sampler thread panicked");
        }
    }
}

impl Drop for FrameSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Block for one job, then skip ahead to the newest queued one.
fn next_job(rx: &Receiver<SampleJob>) -> Option<SampleJob> {
    let mut job = rx.recv().ok()?;
    while let Ok(newer) = rx.try_recv() {
        job = newer;
    }
    Some(job)
}
