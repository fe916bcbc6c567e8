use crate::{
    ThumbError, ThumbResult,
    batch::{
        pipeline::{BatchOptions, run_batch, seed_from_clock, select_items},
        sink::{FrameSink, InMemorySink, PngDirSink},
    },
    foundation::core::Canvas,
    input::item::Item,
    render::{
        frame::FrameRGBA,
        record::{DrawOp, RecordingFactory},
        surface::{RenderSurface, SurfaceFactory},
    },
    template::resolve::ResolvedTemplate,
};

fn items() -> Vec<Item> {
    vec![
        Item::new(1, "First title"),
        Item::new(2, "  "),
        Item::new(3, "Second title").with_badge("new"),
        Item::new(4, "Third title"),
    ]
}

#[test]
fn selection_drops_untitled_rows_and_applies_limit() {
    let picked = select_items(items(), Some(2)).unwrap();
    assert_eq!(picked.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);

    let all = select_items(items(), Some(0)).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(select_items(items(), None).unwrap().len(), 3);
}

#[test]
fn no_titled_rows_is_an_input_error() {
    let err = select_items(vec![Item::new(1, ""), Item::new(2, " ")], None).unwrap_err();
    match err {
        ThumbError::Input(msg) => assert!(msg.starts_with("No valid rows found")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn batch_names_files_in_order() {
    let mut factory = RecordingFactory::default();
    let mut sink = InMemorySink::names_only();
    let report = run_batch(
        items(),
        &ResolvedTemplate::default(),
        &mut factory,
        &mut sink,
        &BatchOptions::default(),
    )
    .unwrap();

    let want = ["01-first-title.png", "02-second-title.png", "03-third-title.png"];
    assert_eq!(report.files, want);
    assert_eq!(sink.names(), want);
    assert!(sink.frames().is_empty());
    assert_eq!(factory.finished.len(), 3);
    assert_eq!(
        report.layouts.iter().map(|l| l.item_id).collect::<Vec<_>>(),
        vec![1, 3, 4]
    );
    assert!(report.layouts[1].badge.is_some());
}

#[test]
fn same_seed_same_output_and_items_differ() {
    let run = |seed| {
        let mut factory = RecordingFactory::default();
        let mut sink = InMemorySink::new();
        run_batch(
            items(),
            &ResolvedTemplate::default(),
            &mut factory,
            &mut sink,
            &BatchOptions { limit: None, seed },
        )
        .unwrap();
        factory.finished
    };
    let a = run(7);
    assert_eq!(a, run(7));
    assert_ne!(a, run(8));

    let glows = |ops: &[DrawOp]| -> Vec<DrawOp> {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::RadialGlow { .. }))
            .cloned()
            .collect()
    };
    assert_eq!(glows(&a[0]).len(), 280);
    assert_ne!(glows(&a[0]), glows(&a[1]));
}

struct FailingSink {
    fail_at: usize,
    pushed: Vec<String>,
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _total: usize) -> ThumbResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, file_name: &str, _frame: &FrameRGBA) -> ThumbResult<()> {
        if self.pushed.len() + 1 == self.fail_at {
            return Err(ThumbError::resource("disk full"));
        }
        self.pushed.push(file_name.to_owned());
        Ok(())
    }

    fn end(&mut self) -> ThumbResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[test]
fn batch_halts_on_first_sink_error() {
    let mut factory = RecordingFactory::default();
    let mut sink = FailingSink {
        fail_at: 2,
        pushed: Vec::new(),
        ended: false,
    };
    let err = run_batch(
        items(),
        &ResolvedTemplate::default(),
        &mut factory,
        &mut sink,
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ThumbError::Resource(_)));
    assert_eq!(sink.pushed, ["01-first-title.png"]);
    assert!(!sink.ended);
    assert_eq!(factory.finished.len(), 2);
}

struct FlakyFactory {
    inner: RecordingFactory,
    remaining: usize,
}

impl SurfaceFactory for FlakyFactory {
    fn create(&mut self, canvas: Canvas) -> ThumbResult<Box<dyn RenderSurface + '_>> {
        if self.remaining == 0 {
            return Err(ThumbError::resource("no fonts registered"));
        }
        self.remaining -= 1;
        self.inner.create(canvas)
    }
}

#[test]
fn batch_halts_when_a_surface_cannot_be_created() {
    let mut factory = FlakyFactory {
        inner: RecordingFactory::default(),
        remaining: 1,
    };
    let mut sink = InMemorySink::new();
    assert!(
        run_batch(
            items(),
            &ResolvedTemplate::default(),
            &mut factory,
            &mut sink,
            &BatchOptions::default(),
        )
        .is_err()
    );
    assert_eq!(sink.names(), ["01-first-title.png"]);
    assert_eq!(sink.frames()[0].width, 1280);
}

#[test]
fn png_dir_sink_writes_numbered_files() {
    let dir = std::env::temp_dir().join(format!("thumbkit-batch-{}", std::process::id()));
    let mut factory = RecordingFactory::default();
    let mut sink = PngDirSink::new(&dir);
    run_batch(
        vec![Item::new(1, "Hello PNG")],
        &ResolvedTemplate::default(),
        &mut factory,
        &mut sink,
        &BatchOptions::default(),
    )
    .unwrap();
    assert_eq!(sink.written(), [dir.join("01-hello-png.png")]);
    let bytes = std::fs::read(dir.join("01-hello-png.png")).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn clock_seeds_differ_between_calls() {
    let seeds: Vec<u64> = (0..64).map(|_| seed_from_clock()).collect();
    let mut unique = seeds.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), seeds.len());
}
