use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use storygrid::{
    AspectRatio, ResolutionTier, SheetRequest, SplitOptions, SplitStrategy, build_instruction,
    compute_grid, split_sheet, validate_scene_count,
};

#[derive(Parser, Debug)]
#[command(name = "storygrid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the planned grid for a scene count as JSON.
    Plan(PlanArgs),
    /// Build the generation instruction from a sheet request JSON.
    Instruct(InstructArgs),
    /// Split a contact-sheet image into per-panel PNGs.
    Split(SplitArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Number of scenes on the sheet.
    #[arg(long)]
    scenes: i32,

    #[arg(long, value_enum, default_value_t = AspectChoice::Landscape)]
    aspect: AspectChoice,

    #[arg(long, value_enum, default_value_t = TierChoice::TwoK)]
    tier: TierChoice,
}

#[derive(Parser, Debug)]
struct InstructArgs {
    /// Input sheet request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Input composite image (PNG, JPEG, WebP, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of scenes the sheet was generated for.
    #[arg(long)]
    scenes: i32,

    #[arg(long, value_enum, default_value_t = AspectChoice::Landscape)]
    aspect: AspectChoice,

    #[arg(long, value_enum, default_value_t = TierChoice::TwoK)]
    tier: TierChoice,

    /// Output directory for panel PNGs.
    #[arg(long, default_value = "panels")]
    out: PathBuf,

    /// Use content-adaptive boundary detection instead of the uniform grid.
    #[arg(long)]
    adaptive: bool,

    /// Keep panels classified as blank placeholders.
    #[arg(long)]
    keep_empty: bool,

    /// Safety inset per panel side, in percent.
    #[arg(long, default_value_t = 0.5)]
    margin: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AspectChoice {
    Landscape,
    Portrait,
}

impl From<AspectChoice> for AspectRatio {
    fn from(value: AspectChoice) -> Self {
        match value {
            AspectChoice::Landscape => AspectRatio::Landscape,
            AspectChoice::Portrait => AspectRatio::Portrait,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierChoice {
    TwoK,
    FourK,
}

impl From<TierChoice> for ResolutionTier {
    fn from(value: TierChoice) -> Self {
        match value {
            TierChoice::TwoK => ResolutionTier::TwoK,
            TierChoice::FourK => ResolutionTier::FourK,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Instruct(args) => cmd_instruct(args),
        Command::Split(args) => cmd_split(args),
    }
}

fn read_request_json(path: &Path) -> anyhow::Result<SheetRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: SheetRequest = serde_json::from_reader(r).with_context(|| "parse request JSON")?;
    Ok(req)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let tier: ResolutionTier = args.tier.into();
    let check = validate_scene_count(args.scenes, tier);
    if !check.is_valid {
        eprintln!("warning: {}", check.message);
    }

    let grid = compute_grid(args.scenes, args.aspect.into(), tier);
    println!("{}", serde_json::to_string_pretty(&grid)?);
    Ok(())
}

fn cmd_instruct(args: InstructArgs) -> anyhow::Result<()> {
    let req = read_request_json(&args.in_path)?;
    print!("{}", build_instruction(&req));
    Ok(())
}

fn cmd_split(args: SplitArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read composite '{}'", args.in_path.display()))?;

    let grid = compute_grid(args.scenes, args.aspect.into(), args.tier.into());
    let opts = SplitOptions {
        strategy: if args.adaptive {
            SplitStrategy::Adaptive
        } else {
            SplitStrategy::FixedGrid
        },
        filter_empty: !args.keep_empty,
        edge_margin_percent: args.margin,
        ..SplitOptions::default()
    };

    let results = split_sheet(&bytes, &grid, &opts)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for panel in &results {
        let path = args.out.join(format!("panel_{:02}.png", panel.id));
        image::save_buffer_with_format(
            &path,
            panel.image.data(),
            panel.width(),
            panel.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!(
            "wrote {} ({}x{}, cell r{} c{})",
            path.display(),
            panel.width(),
            panel.height(),
            panel.row,
            panel.col
        );
    }

    eprintln!("{} panels from {}", results.len(), args.in_path.display());
    Ok(())
}
