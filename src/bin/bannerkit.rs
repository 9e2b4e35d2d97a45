use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bannerkit::{
    BackgroundCatalog, BackgroundKind, BannerConfig, BannerContent, FfmpegVideoSource, FontSet,
    FrameRecorder, ImageFormat, RecordOutcome, StillCompositor, VideoSource, WebmSink,
    WebmSinkOpts, assets::media::is_video_path, export, layout::compute_layout, model,
    text::TextEngine,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bannerkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a still banner over an image background and save it as PNG or WebP.
    Image(ImageArgs),
    /// Record a banner over a video background into a WebM clip (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print the computed text layout as JSON.
    Layout(LayoutArgs),
    /// List the available backgrounds.
    Backgrounds(BackgroundsArgs),
}

#[derive(Args, Debug)]
struct ContentArgs {
    /// Headline text.
    #[arg(long)]
    headline: String,

    /// Subtext; may be empty.
    #[arg(long, default_value = "")]
    subtext: String,
}

impl ContentArgs {
    fn content(&self) -> BannerContent {
        BannerContent::new(self.headline.clone(), self.subtext.clone())
    }
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory holding the logo, fonts and backgrounds.
    #[arg(long, default_value = "assets")]
    assets_root: PathBuf,

    /// Configuration JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background catalog JSON (defaults to the built-in image catalog).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory the export is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Catalog id or assets-relative path (defaults to the first catalog entry).
    #[arg(long)]
    background: Option<String>,

    /// Output format: png or webp.
    #[arg(long, default_value = "png")]
    format: ImageFormat,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Catalog id or assets-relative path of a video background.
    #[arg(long)]
    background: String,

    /// Pace frames to real time instead of rendering as fast as possible.
    #[arg(long)]
    wall_clock: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Directory holding the fonts.
    #[arg(long, default_value = "assets")]
    assets_root: PathBuf,

    /// Configuration JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BackgroundsArgs {
    /// Background catalog JSON (defaults to the built-in image catalog).
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Video(args) => cmd_video(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Backgrounds(args) => cmd_backgrounds(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<BannerConfig> {
    let cfg = match path {
        Some(p) => BannerConfig::from_json_file(p)?,
        None => BannerConfig::default(),
    };
    Ok(cfg)
}

fn read_catalog(path: Option<&Path>) -> anyhow::Result<BackgroundCatalog> {
    Ok(match path {
        Some(p) => BackgroundCatalog::from_json_file(p)?,
        None => BackgroundCatalog::builtin(),
    })
}

/// Resolve a `--background` value (catalog id first, then a resource path) to a file and kind.
fn resolve_background(
    catalog: &BackgroundCatalog,
    assets_root: &Path,
    selector: &str,
) -> anyhow::Result<(PathBuf, BackgroundKind)> {
    let (rel, kind) = match catalog
        .find_by_id(selector)
        .or_else(|| catalog.find_by_path(selector))
    {
        Some(opt) => (opt.path.clone(), opt.kind),
        None => {
            let kind = if is_video_path(Path::new(selector)) {
                BackgroundKind::Video
            } else {
                BackgroundKind::Image
            };
            (selector.to_string(), kind)
        }
    };
    let path = model::resolve_asset_path(assets_root, &rel)
        .with_context(|| format!("resolve background '{selector}'"))?;
    Ok((path, kind))
}

fn logo_path(cfg: &BannerConfig, assets_root: &Path) -> anyhow::Result<PathBuf> {
    let logo = &cfg.assets.logo;
    if logo.is_absolute() {
        return Ok(logo.clone());
    }
    Ok(model::resolve_asset_path(assets_root, &logo.to_string_lossy())?)
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let common = &args.common;
    let cfg = read_config(common.config.as_deref())?;
    let catalog = read_catalog(common.catalog.as_deref())?;
    let selector = match args.background.as_deref() {
        Some(s) => s.to_string(),
        None => catalog
            .first()
            .map(|b| b.id.clone())
            .context("background catalog is empty")?,
    };
    let (background, kind) = resolve_background(&catalog, &common.assets_root, &selector)?;
    if kind == BackgroundKind::Video {
        anyhow::bail!("'{selector}' is a video background; use `bannerkit video`");
    }
    let logo = logo_path(&cfg, &common.assets_root)?;

    let fonts = FontSet::resolve(&cfg.assets, &common.assets_root)?;
    let mut compositor = StillCompositor::new(cfg, &fonts)?;
    let frame = compositor.compose(&args.content.content(), &background, &logo)?;

    let bytes = export::encode_surface(&frame.surface, args.format)?;
    let path = export::save_export(
        &common.out_dir,
        &export::today_filename(args.format.extension()),
        &bytes,
    )?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let common = &args.common;
    let cfg = read_config(common.config.as_deref())?;
    let catalog = read_catalog(common.catalog.as_deref())?;
    let (background, kind) = resolve_background(&catalog, &common.assets_root, &args.background)?;
    if kind != BackgroundKind::Video {
        anyhow::bail!(
            "'{}' is an image background; use `bannerkit image`",
            args.background
        );
    }
    let logo = bannerkit::assets::load_logo(&logo_path(&cfg, &common.assets_root)?);

    let geometry = cfg.geometry()?;
    let source = FfmpegVideoSource::open(&background, geometry.canvas, cfg.recording.fps)
        .with_context(|| format!("open video background '{}'", background.display()))?;
    let source: Box<dyn VideoSource + Send> = Box::new(source);

    let fonts = FontSet::resolve(&cfg.assets, &common.assets_root)?;
    let recorder = FrameRecorder::new(&cfg.recording).with_wall_clock(args.wall_clock);
    let mut sink = WebmSink::new(WebmSinkOpts::from_config(&cfg.recording));
    let mut scene = bannerkit::LiveScene::mount(
        cfg,
        &fonts,
        args.content.content(),
        Some(source),
        logo,
    )?;

    let clip = match recorder.try_record(&mut scene, &mut sink)? {
        RecordOutcome::Completed(clip) => clip,
        RecordOutcome::Cancelled => anyhow::bail!("recording was cancelled"),
    };
    let path = export::save_export(&common.out_dir, &export::today_filename("webm"), &clip.data)?;
    eprintln!(
        "wrote {} ({} frames, {})",
        path.display(),
        clip.frame_count,
        clip.mime_type
    );
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let geometry = cfg.geometry()?;
    let fonts = FontSet::resolve(&cfg.assets, &args.assets_root)?;
    let mut text = TextEngine::new(&fonts, &geometry)?;
    let layout = compute_layout(&args.content.content(), &mut text, &geometry);
    println!(
        "{}",
        serde_json::to_string_pretty(&layout).context("serialize layout")?
    );
    Ok(())
}

fn cmd_backgrounds(args: BackgroundsArgs) -> anyhow::Result<()> {
    let catalog = read_catalog(args.catalog.as_deref())?;
    for bg in catalog.iter() {
        let kind = match bg.kind {
            BackgroundKind::Image => "image",
            BackgroundKind::Video => "video",
        };
        println!("{:>4}  {:<6} {:<22} {}", bg.id, kind, bg.name, bg.path);
    }
    Ok(())
}
