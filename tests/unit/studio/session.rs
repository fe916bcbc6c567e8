use std::path::PathBuf;

use crate::{
    ThumbError,
    foundation::core::Canvas,
    render::{frame::FrameRGBA, record::{DrawOp, RecordingFactory}},
    studio::{
        media::VideoInfo,
        session::{FrameResponse, FrameTicket, PLACEHOLDER_TITLE, StudioSession},
    },
    template::resolve::BadgePosition,
};

fn video(duration_sec: f64) -> VideoInfo {
    VideoInfo {
        source_path: PathBuf::from("clip.mp4"),
        width: 4,
        height: 4,
        duration_sec,
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA::transparent(Canvas {
        width: 4,
        height: 4,
    })
}

#[test]
fn empty_title_renders_the_placeholder() {
    let mut s = StudioSession::default();
    s.title = "   ".into();
    assert_eq!(s.item().title, PLACEHOLDER_TITLE);
    s.title = " Real title ".into();
    assert_eq!(s.item().title, "Real title");
}

#[test]
fn script_only_fills_an_empty_title() {
    let mut s = StudioSession::default();
    assert!(s.apply_script("Hello there\nworld"));
    assert_eq!(s.title, "Hello there world");
    assert!(!s.apply_script("Something else"));
    assert_eq!(s.title, "Hello there world");

    let mut s = StudioSession::default();
    assert!(!s.apply_script("\n\n"));
    assert_eq!(s.title, "");
}

#[test]
fn seeking_without_a_video_is_an_input_error() {
    let mut s = StudioSession::default();
    assert!(matches!(s.request_frame(3.0), Err(ThumbError::Input(_))));
}

#[test]
fn latest_seek_wins() {
    let mut s = StudioSession::default();
    let first = s.set_video(video(10.0));
    assert_eq!(first.time_sec, 1.0);
    let second = s.request_frame(4.0).unwrap();
    let third = s.request_frame(99.0).unwrap();
    assert_eq!(third.time_sec, 10.0);
    assert!(first.ticket < second.ticket && second.ticket < third.ticket);
    assert_eq!(s.pending(), Some(third.ticket));

    assert_eq!(s.frame_ready(first.ticket, frame()), FrameResponse::Stale);
    assert_eq!(s.frame_ready(second.ticket, frame()), FrameResponse::Stale);
    assert_eq!(s.frame_ready(third.ticket, frame()), FrameResponse::Accepted);
    assert_eq!(s.pending(), None);
    assert_eq!(s.frame_ready(third.ticket, frame()), FrameResponse::Stale);
}

#[test]
fn frames_after_switching_away_from_video_are_stale() {
    let mut s = StudioSession::default();
    let req = s.set_video(video(5.0));
    s.clear_background();
    assert_eq!(s.frame_ready(req.ticket, frame()), FrameResponse::Stale);
    assert!(s.video().is_none());
}

#[test]
fn failed_request_stops_waiting() {
    let mut s = StudioSession::default();
    let req = s.set_video(video(5.0));
    s.frame_failed(FrameTicket(req.ticket.0 + 100));
    assert_eq!(s.pending(), Some(req.ticket));
    s.frame_failed(req.ticket);
    assert_eq!(s.pending(), None);
}

fn has_image(ops: &[DrawOp]) -> bool {
    ops.iter().any(|op| matches!(op, DrawOp::Image { .. }))
}

#[test]
fn video_background_appears_once_its_frame_is_accepted() {
    let mut factory = RecordingFactory::default();
    let mut s = StudioSession::default();
    s.title = "Studio".into();
    let req = s.set_video(video(5.0));

    s.render(&mut factory).unwrap();
    assert!(!has_image(&factory.finished[0]));

    s.frame_ready(req.ticket, frame());
    s.render(&mut factory).unwrap();
    assert!(has_image(&factory.finished[1]));
}

#[test]
fn badge_position_overrides_the_template() {
    let mut factory = RecordingFactory::default();
    let mut s = StudioSession::default();
    s.badge = "NEW".into();

    let (_, report) = s.render(&mut factory).unwrap();
    let right = report.badge.unwrap().rect;
    assert_eq!(right.x1, 1280.0 - 50.0);

    s.badge_position = BadgePosition::BottomLeft;
    let (_, report) = s.render(&mut factory).unwrap();
    let rect = report.badge.unwrap().rect;
    assert_eq!((rect.x0, rect.y1), (50.0, 720.0 - 50.0));
}

#[test]
fn rendering_is_deterministic() {
    let mut factory = RecordingFactory::default();
    let mut s = StudioSession::default();
    s.title = "Same every time".into();
    s.render(&mut factory).unwrap();
    s.render(&mut factory).unwrap();
    assert_eq!(factory.finished[0], factory.finished[1]);
}

#[test]
fn export_writes_a_png() {
    let dir = std::env::temp_dir().join(format!("thumbkit-studio-export-{}", std::process::id()));
    let path = dir.join("nested").join("thumb.png");
    let mut factory = RecordingFactory::default();
    StudioSession::default()
        .export_png(&mut factory, &path)
        .unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let _ = std::fs::remove_dir_all(&dir);
}
