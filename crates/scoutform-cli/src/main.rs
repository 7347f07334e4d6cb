//! scoutform CLI — batch reading of photographed scouting forms.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use scoutform::{
    seed_ledger, CsvLedger, FormLayout, FormReader, FormReport, LayoutProfile, LedgerWriter,
    ScoutingRecord, SeedOutcome,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "scoutform")]
#[command(about = "Read bubble-sheet scouting forms into a match ledger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger from a match schedule (never overwrites).
    Seed {
        /// Match schedule CSV (label, ..., red1..red3, blue1..blue3).
        #[arg(long)]
        schedule: PathBuf,

        /// Ledger CSV to create.
        #[arg(long)]
        ledger: PathBuf,
    },

    /// Read every photo in a directory and record it in the ledger.
    Process(CliProcessArgs),

    /// Read a single photo and print the record as JSON.
    Decode(CliDecodeArgs),

    /// Print a layout profile.
    LayoutInfo {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Print the full layout JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    ContourV1,
    BlobV2,
}

impl ProfileArg {
    fn to_core(self) -> LayoutProfile {
        match self {
            Self::ContourV1 => LayoutProfile::ContourV1,
            Self::BlobV2 => LayoutProfile::BlobV2,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct LayoutArgs {
    /// Layout JSON file; takes the place of --profile.
    #[arg(long, conflicts_with = "profile")]
    layout: Option<PathBuf>,

    /// Built-in form revision.
    #[arg(long, value_enum, default_value_t = ProfileArg::ContourV1)]
    profile: ProfileArg,
}

impl LayoutArgs {
    fn resolve(&self) -> CliResult<FormLayout> {
        match &self.layout {
            Some(path) => {
                let layout = FormLayout::from_json_file(path)?;
                tracing::info!("Loaded layout '{}' from {}", layout.name, path.display());
                Ok(layout)
            }
            None => Ok(self.profile.to_core().layout()),
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CliProcessArgs {
    /// Directory scanned for .jpg/.jpeg photos.
    #[arg(long)]
    input_dir: PathBuf,

    /// Directory recorded photos are moved to as `{match}_{team}.jpg`.
    #[arg(long)]
    processed_dir: PathBuf,

    /// Ledger CSV.
    #[arg(long)]
    ledger: PathBuf,

    /// Seed the ledger from this schedule first (skipped if it exists).
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Write canonical and overlay images for each read form here.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Debug, Clone, Args)]
struct CliDecodeArgs {
    /// Path to the input photo.
    #[arg(long)]
    image: PathBuf,

    /// Write the report JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write canonical and overlay images here.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { schedule, ledger } => run_seed(&schedule, &ledger),
        Commands::Process(args) => run_process(&args),
        Commands::Decode(args) => run_decode(&args),
        Commands::LayoutInfo { layout, json } => run_layout_info(&layout, json),
    }
}

// ── seed ───────────────────────────────────────────────────────────────

fn run_seed(schedule: &Path, ledger: &Path) -> CliResult<()> {
    match seed_ledger(schedule, ledger)? {
        SeedOutcome::Created { rows } => {
            println!("Created {} with {} rows", ledger.display(), rows);
        }
        SeedOutcome::AlreadyExists => {
            println!("{} already exists; left untouched", ledger.display());
        }
    }
    Ok(())
}

// ── process ────────────────────────────────────────────────────────────

fn run_process(args: &CliProcessArgs) -> CliResult<()> {
    if let Some(schedule) = &args.schedule {
        seed_ledger(schedule, &args.ledger)?;
    }
    if !args.ledger.is_file() {
        return Err(format!(
            "ledger {} not found; seed it first or pass --schedule",
            args.ledger.display()
        )
        .into());
    }

    let mut reader = FormReader::new(args.layout.resolve()?);
    reader.config_mut().visualize = args.debug_dir.is_some();
    let mut ledger = CsvLedger::new(&args.ledger);

    std::fs::create_dir_all(&args.processed_dir)?;
    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)?;
    }

    let photos = list_photos(&args.input_dir)?;
    tracing::info!(
        "Processing {} photo(s) from {} with layout '{}'",
        photos.len(),
        args.input_dir.display(),
        reader.layout().name
    );

    let (mut ok, mut failed) = (0usize, 0usize);
    for path in &photos {
        match process_one(&reader, &mut ledger, path, args) {
            Ok(record) => {
                ok += 1;
                tracing::info!(
                    "{} -> match {} team {}",
                    path.display(),
                    record.match_number,
                    record.team
                );
            }
            Err(e) if e.kind().is_per_image() => {
                failed += 1;
                tracing::warn!(kind = ?e.kind(), "{}: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("processed: {ok}, failed: {failed}");
    Ok(())
}

/// Read, record, then file one photo. The photo stays in place on failure.
fn process_one(
    reader: &FormReader,
    ledger: &mut CsvLedger,
    path: &Path,
    args: &CliProcessArgs,
) -> scoutform::Result<ScoutingRecord> {
    let report = reader.read_path(path)?;
    if let Some(dir) = &args.debug_dir {
        save_debug_images(&report, path, dir);
    }
    ledger.write_record(&report.record)?;
    let dest = args.processed_dir.join(report.record.processed_file_name());
    move_replacing(path, &dest)?;
    Ok(report.record)
}

/// Photos in `dir`, sorted by file name.
fn list_photos(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut photos = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_photo(&path) {
            photos.push(path);
        }
    }
    photos.sort();
    Ok(photos)
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

fn move_replacing(from: &Path, to: &Path) -> std::io::Result<()> {
    if to.exists() {
        std::fs::remove_file(to)?;
    }
    if std::fs::rename(from, to).is_err() {
        // Cross-device moves cannot rename.
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}

fn save_debug_images(report: &FormReport, photo: &Path, dir: &Path) {
    let Some(debug) = &report.debug else {
        return;
    };
    let stem = photo
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("form");
    let canonical = dir.join(format!("{stem}_canonical.png"));
    let overlay = dir.join(format!("{stem}_overlay.png"));
    if let Err(e) = debug.canonical.save(&canonical) {
        tracing::warn!("Failed to write {}: {}", canonical.display(), e);
    }
    if let Err(e) = debug.overlay.save(&overlay) {
        tracing::warn!("Failed to write {}: {}", overlay.display(), e);
    }
}

// ── decode ─────────────────────────────────────────────────────────────

fn run_decode(args: &CliDecodeArgs) -> CliResult<()> {
    let mut reader = FormReader::new(args.layout.resolve()?);
    reader.config_mut().visualize = args.debug_dir.is_some();

    tracing::info!("Reading {}", args.image.display());
    let report = reader.read_path(&args.image)?;
    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)?;
        save_debug_images(&report, &args.image, dir);
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            tracing::info!("Report written to {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── layout-info ────────────────────────────────────────────────────────

fn run_layout_info(args: &LayoutArgs, json: bool) -> CliResult<()> {
    let layout = args.resolve()?;
    if json {
        println!("{}", layout.to_json_string()?);
        return Ok(());
    }

    println!("scoutform layout '{}'", layout.name);
    println!("  detection:        {:?}", layout.detection.strategy);
    println!(
        "  radius band:      ({}, {}) px",
        layout.detection.radius.min_px, layout.detection.radius.max_px
    );
    println!("  canonical height: {} px", layout.normalize.target_height);
    match layout.normalize.crop {
        Some(c) => println!(
            "  crop:             left {:.2}, top {:.2} (x height)",
            c.left_frac, c.top_frac
        ),
        None => println!("  crop:             none"),
    }
    println!("  bubbles:          {}", layout.expected_bubbles);
    println!("  rows:             {:?}", layout.expected_rows);
    println!("  row gap:          {} px", layout.row_gap_px);
    println!("  fill threshold:   {}", layout.fill_threshold);
    println!("  multi-mark:       {:?}", layout.multi_mark);
    println!(
        "  shoot location:   {}",
        if layout.fields.shoot_location_required {
            "mandatory"
        } else {
            "optional"
        }
    );
    Ok(())
}
