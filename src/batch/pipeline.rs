//! Sequential batch rendering: one surface per item, first error stops the run.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    ThumbError, ThumbResult,
    batch::{naming::output_file_name, sink::FrameSink},
    compose::{
        background::BackgroundSource,
        layout::{LayoutReport, compose_thumbnail},
    },
    foundation::math::Rng64,
    input::item::Item,
    render::surface::SurfaceFactory,
    template::resolve::ResolvedTemplate,
};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x7468_756d_626b_6974;

/// Run seed taken from the wall clock, for runs that did not ask for a fixed one.
///
/// Successive calls in one process never repeat.
pub fn seed_from_clock() -> u64 {
    static CALLS: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(DEFAULT_SEED);
    let call = CALLS.fetch_add(1, Ordering::Relaxed);
    Rng64::new(nanos ^ call.rotate_left(48)).next_u64()
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Render at most this many items; `None` or `Some(0)` renders all of them.
    pub limit: Option<usize>,
    /// Run seed mixed with each item id for the background texture.
    pub seed: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            seed: DEFAULT_SEED,
        }
    }
}

/// What a finished batch produced.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct BatchReport {
    /// Output file names in render order.
    pub files: Vec<String>,
    pub layouts: Vec<LayoutReport>,
}

/// Drop items without a title and apply the limit.
pub fn select_items(items: Vec<Item>, limit: Option<usize>) -> ThumbResult<Vec<Item>> {
    let limit = limit.filter(|n| *n > 0).unwrap_or(usize::MAX);
    let selected: Vec<Item> = items
        .into_iter()
        .filter(Item::has_title)
        .take(limit)
        .collect();
    if selected.is_empty() {
        return Err(ThumbError::input(
            "No valid rows found. Ensure each row has at least a title.",
        ));
    }
    Ok(selected)
}

/// Render every item in order and hand each frame to `sink`.
#[tracing::instrument(skip_all, fields(items = items.len(), seed = opts.seed))]
pub fn run_batch(
    items: Vec<Item>,
    template: &ResolvedTemplate,
    factory: &mut dyn SurfaceFactory,
    sink: &mut dyn FrameSink,
    opts: &BatchOptions,
) -> ThumbResult<BatchReport> {
    let items = select_items(items, opts.limit)?;
    sink.begin(items.len())?;

    let mut report = BatchReport::default();
    for (index, item) in items.iter().enumerate() {
        let file_name = output_file_name(index + 1, &item.title);
        let layout = render_item(item, template, factory, sink, &file_name, opts.seed)
            .inspect_err(|err| tracing::error!(item = item.id, %err, "batch stopped"))?;
        report.files.push(file_name);
        report.layouts.push(layout);
    }

    sink.end()?;
    tracing::info!(count = report.files.len(), "batch done");
    Ok(report)
}

fn render_item(
    item: &Item,
    template: &ResolvedTemplate,
    factory: &mut dyn SurfaceFactory,
    sink: &mut dyn FrameSink,
    file_name: &str,
    seed: u64,
) -> ThumbResult<LayoutReport> {
    let mut surface = factory.create(template.canvas)?;
    let mut rng = Rng64::for_item(seed, item.id);
    let layout = compose_thumbnail(
        surface.as_mut(),
        item,
        template,
        BackgroundSource::Generated,
        &mut rng,
    )?;
    let frame = surface.finish()?;
    sink.push_frame(file_name, &frame)?;
    Ok(layout)
}
