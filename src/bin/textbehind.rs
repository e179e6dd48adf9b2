use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "textbehind", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite text layers between a background and a foreground and write a PNG.
    Export(ExportArgs),
    /// Split a photo into background.png and foreground.png.
    Segment(SegmentArgs),
    /// Show which installed face every family/weight resolves to.
    Fonts(FontArgs),
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load the host's installed fonts.
    #[arg(long)]
    no_system_fonts: bool,
}

impl FontArgs {
    fn export_opts(&self) -> textbehind::ExportOpts {
        let mut opts = textbehind::ExportOpts::default().with_system_fonts(!self.no_system_fonts);
        for dir in &self.font_dirs {
            opts = opts.with_font_dir(dir);
        }
        opts
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Background plate (the original photo).
    #[arg(long)]
    background: PathBuf,

    /// Subject cutout with transparent surroundings.
    #[arg(long)]
    foreground: PathBuf,

    /// Text layers JSON (an array of layer objects). Omit for no text.
    #[arg(long)]
    layers: Option<PathBuf>,

    /// Width the foreground was displayed at while editing. Defaults to its natural width.
    #[arg(long)]
    displayed_width: Option<f64>,

    /// Directory receiving `edited-<unix-millis>.png`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Args, Debug)]
struct SegmentArgs {
    /// Source photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Use a precomputed cutout instead of running a program.
    #[arg(long, conflicts_with = "command")]
    cutout: Option<PathBuf>,

    /// Matting program and arguments; `{input}` and `{output}` are replaced with file paths.
    /// Defaults to `rembg i {input} {output}`.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    command: Option<Vec<String>>,

    /// Output directory for background.png and foreground.png.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Segment(args) => cmd_segment(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_layers_json(path: &Path) -> anyhow::Result<Vec<textbehind::TextLayer>> {
    let f = File::open(path).with_context(|| format!("open layers '{}'", path.display()))?;
    let layers = textbehind::layers_from_json(BufReader::new(f))
        .with_context(|| format!("parse layers '{}'", path.display()))?;
    Ok(layers)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let pair = textbehind::ImagePair::load(&args.background, &args.foreground)?;
    let state = match &args.layers {
        Some(path) => textbehind::EditorState::from_layers(read_layers_json(path)?),
        None => textbehind::EditorState::new(),
    };
    let displayed_width = args
        .displayed_width
        .unwrap_or_else(|| f64::from(pair.natural_size().width));

    let mut compositor = textbehind::Compositor::new(args.fonts.export_opts());
    let mut sink = textbehind::DirectorySink::new(&args.out_dir);
    let receipt = textbehind::export_png(
        &mut compositor,
        &pair,
        state.layers(),
        displayed_width,
        &mut sink,
    )?;

    let written = receipt
        .path
        .unwrap_or_else(|| args.out_dir.join(&receipt.file_name));
    eprintln!(
        "wrote {} ({}x{})",
        written.display(),
        receipt.width,
        receipt.height
    );
    Ok(())
}

fn cmd_segment(args: SegmentArgs) -> anyhow::Result<()> {
    let segmenter: Arc<dyn textbehind::Segmenter> = match (&args.cutout, &args.command) {
        (Some(cutout), _) => Arc::new(textbehind::CutoutSegmenter::new(cutout)),
        (None, Some(argv)) => {
            let (program, rest) = argv
                .split_first()
                .context("--command needs a program name")?;
            Arc::new(textbehind::CommandSegmenter::new(program).args(rest.iter().cloned()))
        }
        (None, None) => Arc::new(textbehind::CommandSegmenter::rembg()),
    };

    let source = textbehind::SourceImage::from_path(&args.in_path)?;
    let mut session =
        textbehind::Session::new(segmenter, textbehind::SessionOpts::default());
    session.begin(source)?;
    session.wait()?;

    let pair = session
        .pair()
        .context("segmentation finished without an image pair")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (name, img) in [
        ("background.png", pair.background()),
        ("foreground.png", pair.foreground()),
    ] {
        let path = args.out_dir.join(name);
        let png = textbehind::encode_png(img)?;
        std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_fonts(args: FontArgs) -> anyhow::Result<()> {
    let opts = args.export_opts();
    let mut book = textbehind::FontBook::from_sources(opts.system_fonts, &opts.font_dirs);
    println!("{} faces installed", book.face_count());
    for family in textbehind::FontFamily::ALL {
        for weight in (1u16..=9).map(|i| textbehind::FontWeight::snapped(f64::from(i * 100))) {
            match book.resolve(family, weight) {
                Ok(font) => println!(
                    "{family} {w}: {} {}{}",
                    font.family_name,
                    font.weight,
                    if font.exact_family { "" } else { " (fallback)" },
                    w = weight.get(),
                ),
                Err(e) => println!("{family} {w}: {e}", w = weight.get()),
            }
        }
    }
    Ok(())
}
