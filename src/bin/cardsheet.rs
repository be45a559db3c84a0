use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cardsheet", version)]
struct Cli {
    /// Settings JSON. Defaults apply when omitted or missing.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log layout decisions and placements.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layout chosen for a card as JSON.
    Layout(LayoutArgs),
    /// Write one sheet PDF per image.
    Sheet(SheetCmdArgs),
    /// Pair existing front and back PDFs into two-page documents.
    Pair(PairArgs),
    /// Compose front and back images and write paired two-page PDFs.
    Duplex(DuplexArgs),
    /// List the known paper sizes.
    Sizes,
}

#[derive(Args, Debug)]
struct PaperArgs {
    /// Catalog paper name (see `sizes`). Falls back to the configured default sheet.
    #[arg(long, conflicts_with_all = ["paper_width", "paper_height"])]
    sheet: Option<String>,

    /// Custom paper width in mm.
    #[arg(long, requires = "paper_height")]
    paper_width: Option<f64>,

    /// Custom paper height in mm.
    #[arg(long, requires = "paper_width")]
    paper_height: Option<f64>,

    /// Margin in mm, overriding the configured one.
    #[arg(long)]
    margin: Option<f64>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    paper: PaperArgs,

    /// Measure this image instead of passing a card size.
    #[arg(long, conflicts_with_all = ["card_width", "card_height"])]
    image: Option<PathBuf>,

    /// Card width in mm.
    #[arg(long, requires = "card_height")]
    card_width: Option<f64>,

    /// Card height in mm.
    #[arg(long, requires = "card_width")]
    card_height: Option<f64>,
}

#[derive(Parser, Debug)]
struct SheetCmdArgs {
    #[command(flatten)]
    paper: PaperArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Source images.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct PairArgs {
    /// Front PDF (repeat for several).
    #[arg(long = "front", required = true)]
    fronts: Vec<PathBuf>,

    /// Back PDF (repeat for several).
    #[arg(long = "back", required = true)]
    backs: Vec<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DuplexArgs {
    #[command(flatten)]
    paper: PaperArgs,

    /// Front image (repeat for several).
    #[arg(long = "front", required = true)]
    fronts: Vec<PathBuf>,

    /// Back image (repeat for several).
    #[arg(long = "back", required = true)]
    backs: Vec<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config {
        Some(path) => cardsheet::Settings::load(path)?,
        None => cardsheet::Settings::default(),
    };
    settings.validate()?;

    match cli.cmd {
        Command::Layout(args) => cmd_layout(&settings, args),
        Command::Sheet(args) => cmd_sheet(&settings, args),
        Command::Pair(args) => cmd_pair(args),
        Command::Duplex(args) => cmd_duplex(&settings, args),
        Command::Sizes => cmd_sizes(&settings),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_sheet(
    settings: &cardsheet::Settings,
    args: &PaperArgs,
) -> anyhow::Result<cardsheet::SheetSpec> {
    let mut sheet = match (args.paper_width, args.paper_height) {
        (Some(w), Some(h)) => settings.sheet_for(cardsheet::Dimension::new(w, h)),
        _ => settings.sheet(args.sheet.as_deref())?,
    };
    if let Some(margin) = args.margin {
        sheet.margin = margin;
    }
    if !sheet.paper.is_positive() || !(sheet.margin.is_finite() && sheet.margin >= 0.0) {
        anyhow::bail!("invalid sheet {} with margin {}mm", sheet.paper, sheet.margin);
    }
    Ok(sheet)
}

fn cmd_layout(settings: &cardsheet::Settings, args: LayoutArgs) -> anyhow::Result<()> {
    let sheet = resolve_sheet(settings, &args.paper)?;
    let card = match (&args.image, args.card_width, args.card_height) {
        (Some(path), _, _) => cardsheet::load_image(path)?.physical_size(settings.dpi),
        (None, Some(w), Some(h)) => cardsheet::Dimension::new(w, h),
        _ => anyhow::bail!("pass either --image or both --card-width and --card-height"),
    };
    let layout = cardsheet::solve(card, sheet.usable(), settings.min_spacing_mm);
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}

fn cmd_sheet(settings: &cardsheet::Settings, args: SheetCmdArgs) -> anyhow::Result<()> {
    let sheet = resolve_sheet(settings, &args.paper)?;
    let outputs = cardsheet::generate_sheets(&args.images, &sheet, settings, &args.out)?;
    for out in outputs {
        println!("{} ({} cards)", out.pdf.display(), out.total);
    }
    Ok(())
}

fn cmd_pair(args: PairArgs) -> anyhow::Result<()> {
    let written = cardsheet::pair_pdf_files(&args.fronts, &args.backs, &args.out)?;
    print_paths(&written);
    Ok(())
}

fn cmd_duplex(settings: &cardsheet::Settings, args: DuplexArgs) -> anyhow::Result<()> {
    let sheet = resolve_sheet(settings, &args.paper)?;
    let written =
        cardsheet::generate_duplex(&args.fronts, &args.backs, &sheet, settings, &args.out)?;
    print_paths(&written);
    Ok(())
}

fn cmd_sizes(settings: &cardsheet::Settings) -> anyhow::Result<()> {
    for (name, size) in settings.catalog().iter() {
        let marker = if name.eq_ignore_ascii_case(&settings.default_sheet) {
            " (default)"
        } else {
            ""
        };
        println!("{name:<10} {size}{marker}");
    }
    Ok(())
}

fn print_paths(paths: &[impl AsRef<Path>]) {
    for path in paths {
        println!("{}", path.as_ref().display());
    }
}
