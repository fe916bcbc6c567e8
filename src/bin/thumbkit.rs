use std::{
    io::{BufReader, IsTerminal as _, Write as _},
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;
use thumbkit::{
    BadgePosition, BatchOptions, FontBook, FrameSampler, InMemorySink, PngDirSink,
    RecordingFactory, ResolvedTemplate, StudioConsole, StudioSession,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thumbkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one PNG per input row.
    Generate(GenerateArgs),
    /// Edit a single thumbnail interactively, or render it once with `--export`.
    Studio(StudioArgs),
    /// List registered font families with the SHA-256 of each font file.
    Fonts(FontArgs),
}

#[derive(Parser, Debug)]
struct FontArgs {
    /// Project root holding `templates/` and `assets/fonts/`.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Font directory (default: `<root>/assets/fonts`).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Extra font file to register (repeatable).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input rows (`.csv` or `.json`).
    #[arg(long = "in", default_value = "inputs/sample.csv")]
    in_path: PathBuf,

    /// Template name under `<root>/templates/`.
    #[arg(long, default_value = "default")]
    template: String,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Render at most this many rows (0 renders all).
    #[arg(long)]
    limit: Option<usize>,

    /// Seed for the background texture (default: taken from the clock and logged).
    #[arg(long)]
    seed: Option<u64>,

    /// Lay out with fixed-advance metrics and print JSON layout reports instead of writing PNGs.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct StudioArgs {
    /// Template name under `<root>/templates/` (default: built-in studio preset).
    #[arg(long)]
    template: Option<String>,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    badge: String,

    /// top-left | top-right | bottom-left | bottom-right
    #[arg(long, value_parser = parse_badge_pos)]
    badge_pos: Option<BadgePosition>,

    #[arg(long, default_value = "")]
    footer: String,

    /// Video to sample the background from (requires the `media-ffmpeg` feature).
    #[arg(long, conflicts_with = "image")]
    video: Option<PathBuf>,

    /// Still image background.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Video time in seconds.
    #[arg(long, requires = "video")]
    at: Option<f64>,

    /// Script file used to suggest a title when `--title` is empty.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Render once, write this PNG and exit.
    #[arg(long)]
    export: Option<PathBuf>,

    /// PNG rewritten after every edit in the command loop.
    #[arg(long, conflicts_with = "export")]
    preview: Option<PathBuf>,

    #[command(flatten)]
    fonts: FontArgs,
}

fn parse_badge_pos(s: &str) -> Result<BadgePosition, String> {
    BadgePosition::parse(s).ok_or_else(|| {
        format!("unknown badge position \"{s}\"; use top-left, top-right, bottom-left or bottom-right")
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Studio(args) => cmd_studio(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn load_fonts(args: &FontArgs) -> anyhow::Result<FontBook> {
    let mut book = FontBook::new();
    let dir = args
        .fonts_dir
        .clone()
        .unwrap_or_else(|| args.root.join("assets").join("fonts"));
    book.load_dir(&dir)?;
    for path in &args.fonts {
        book.register_file(path)
            .with_context(|| format!("register font '{}'", path.display()))?;
    }
    Ok(book)
}

fn resolve_template(root: &Path, name: &str) -> anyhow::Result<ResolvedTemplate> {
    let descriptor = thumbkit::load_template(root, name)?;
    Ok(ResolvedTemplate::resolve(&descriptor))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let items = thumbkit::load_items(&args.in_path)?;
    let items = thumbkit::select_items(items, args.limit)?;
    let template = resolve_template(&args.fonts.root, &args.template)?;
    let seed = args.seed.unwrap_or_else(thumbkit::seed_from_clock);
    tracing::info!(seed, "background seed; pass --seed to reproduce this run");
    let opts = BatchOptions {
        limit: args.limit,
        seed,
    };

    if args.dry_run {
        let mut factory = RecordingFactory::default();
        let mut sink = InMemorySink::names_only();
        let report = thumbkit::run_batch(items, &template, &mut factory, &mut sink, &opts)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for (file, layout) in report.files.iter().zip(&report.layouts) {
            let line = serde_json::json!({ "file": file, "layout": layout });
            writeln!(out, "{line}").context("write layout report")?;
        }
        return Ok(());
    }

    let mut fonts = load_fonts(&args.fonts)?;
    let mut sink = PngDirSink::new(&args.out);
    let report = thumbkit::run_batch(items, &template, &mut fonts, &mut sink, &opts)?;
    println!(
        "Done. {} thumbnail(s) generated at {}",
        report.files.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_studio(args: StudioArgs) -> anyhow::Result<()> {
    let template = match &args.template {
        Some(name) => resolve_template(&args.fonts.root, name)?,
        None => ResolvedTemplate::studio(),
    };
    let mut fonts = load_fonts(&args.fonts)?;

    let mut session = StudioSession::new(template);
    session.title = args.title.clone();
    session.badge = args.badge.clone();
    session.footer = args.footer.clone();
    if let Some(pos) = args.badge_pos {
        session.badge_position = pos;
    }
    if let Some(path) = &args.script {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        session.apply_script(&script);
    }

    let (tx, rx) = mpsc::channel();
    let sampler = FrameSampler::ffmpeg(tx.clone());

    if let Some(path) = &args.image {
        session.set_image(thumbkit::decode_image_file(path)?);
    }
    if let Some(path) = &args.video {
        let info = thumbkit::probe_video(path)?;
        let mut request = session.set_video(info);
        if let Some(at) = args.at {
            request = session.request_frame(at)?;
        }
        if let Some(video) = session.video()
            && !sampler.request(video, request)
        {
            anyhow::bail!("frame sampler is not running");
        }
    }

    if let Some(path) = &args.export {
        drop(tx);
        thumbkit::await_pending_frame(&mut session, &rx)?;
        session.export_png(&mut fonts, path)?;
        println!("exported {}", path.display());
        return Ok(());
    }

    thumbkit::spawn_line_reader(BufReader::new(std::io::stdin()), tx);
    println!("{}", thumbkit::STUDIO_HELP);
    let mut console = StudioConsole::new(session, &mut fonts, &sampler, std::io::stdout());
    if let Some(path) = &args.preview {
        console = console.with_preview(path);
    }
    console.run(&rx)?;
    Ok(())
}

fn cmd_fonts(args: FontArgs) -> anyhow::Result<()> {
    let book = load_fonts(&args)?;
    if book.is_empty() {
        anyhow::bail!("no fonts registered; pass --font or --fonts-dir");
    }
    for font in book.registered() {
        let sha = match &font.path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read font '{}'", path.display()))?;
                sha256_hex(&bytes)
            }
            None => "-".to_owned(),
        };
        let source = font
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!("{}", font.families.join(", "));
        println!("  path:   {source}");
        println!("  sha256: {sha}");
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
