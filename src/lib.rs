//! Segset: polygon annotations to training datasets.
//!
//! Segset takes free-hand segmentation polygons, normalizes, simplifies,
//! validates and measures them, and packages the results as YOLO or COCO
//! dataset archives with train/val/test partitions.
//!
//! # Modules
//!
//! - [`geometry`]: Typed polygons, normalization, simplification and metrics
//! - [`validation`]: Polygon validation and issue reporting
//! - [`annotation`]: Annotation records, images and the class registry
//! - [`export`]: YOLO/COCO formatting and bundle packaging
//! - [`split`]: Seeded train/val/test assignment
//! - [`stats`]: Project statistics
//! - [`config`]: Pipeline configuration
//! - [`error`]: Error types for segset operations
//!
//! Everything above `project`, `archive` and `resolve` is pure: it reads
//! the data it is given and returns new values, without touching the disk.

pub mod annotation;
pub mod archive;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod project;
pub mod resolve;
pub mod split;
pub mod stats;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

pub use config::PipelineConfig;
pub use error::SegsetError;

use annotation::ExportFormat;
use export::{ExportOptions, ImageResolver, NoImages};
use validation::ValidationReport;

/// The segset CLI application.
#[derive(Parser)]
#[command(name = "segset")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Pipeline config file (YAML).
    #[arg(long, global = true, env = "SEGSET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build annotation records from raw pixel polygons.
    Process(ProcessArgs),
    /// Re-validate every annotation in a project.
    Validate(ValidateArgs),
    /// Simplify every annotation in a project.
    Simplify(SimplifyArgs),
    /// Show project statistics.
    Stats(StatsArgs),
    /// Assign images to train/val/test partitions.
    Split(SplitArgs),
    /// Package a project as a YOLO or COCO dataset archive.
    Export(ExportArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Raw project JSON with pixel polygons.
    input: PathBuf,

    /// Output project JSON.
    #[arg(short, long)]
    output: PathBuf,

    /// Simplify polygons while processing.
    #[arg(long)]
    simplify: bool,

    /// Simplification tolerance in normalized units.
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// Project JSON to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(clap::Args)]
struct SimplifyArgs {
    /// Project JSON to simplify.
    input: PathBuf,

    /// Output project JSON.
    #[arg(short, long)]
    output: PathBuf,

    /// Tolerance in normalized units (defaults to the config value).
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(clap::Args)]
struct StatsArgs {
    /// Project JSON.
    input: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Project JSON.
    input: PathBuf,

    /// Output project JSON.
    #[arg(short, long)]
    output: PathBuf,

    /// Fraction of images for training.
    #[arg(long, default_value_t = 0.8)]
    train: f64,

    /// Fraction of images for validation; the rest goes to test.
    #[arg(long, default_value_t = 0.1)]
    val: f64,

    /// Random seed for a reproducible split.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Project JSON.
    input: PathBuf,

    /// Export format ('yolo' or 'coco').
    #[arg(long, default_value = "yolo")]
    format: String,

    /// Output ZIP archive.
    #[arg(short, long)]
    output: PathBuf,

    /// Directory to copy image files from into the archive.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Skip annotations that were already exported.
    #[arg(long)]
    only_unexported: bool,

    /// Mark exported annotations and write the project back to INPUT.
    #[arg(long)]
    mark_exported: bool,
}

/// Run the segset CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SegsetError> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Process(args)) => run_process(args, config),
        Some(Commands::Validate(args)) => run_validate(args, &config),
        Some(Commands::Simplify(args)) => run_simplify(args, &config),
        Some(Commands::Stats(args)) => run_stats(args),
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("segset {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Polygon annotations to YOLO and COCO datasets.");
            println!();
            println!("Run 'segset --help' for usage information.");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, SegsetError> {
    let config = match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            PipelineConfig::from_yaml_file(path)?
        }
        None => PipelineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_process(args: ProcessArgs, mut config: PipelineConfig) -> Result<(), SegsetError> {
    if args.simplify {
        config.auto_simplify = true;
    }
    if let Some(tolerance) = args.tolerance {
        config.simplification_tolerance = tolerance;
    }
    config.validate()?;

    let raw = project::io_json::read_raw_project(&args.input)?;
    let project = raw.process(&config)?;
    project::io_json::write_project(&args.output, &project)?;

    let invalid = project.annotations.iter().filter(|a| !a.is_valid()).count();
    println!(
        "Processed {} annotation(s): {} valid, {} invalid",
        project.annotations.len(),
        project.annotations.len() - invalid,
        invalid
    );
    println!("  Output: {}", args.output.display());
    Ok(())
}

fn run_validate(args: ValidateArgs, config: &PipelineConfig) -> Result<(), SegsetError> {
    let mut project = project::io_json::read_project(&args.input)?;

    let mut report = ValidationReport::new();
    for record in &mut project.annotations {
        report.issues.extend(record.revalidate(config).issues);
    }

    match args.output {
        ReportFormat::Json => {
            let issues: Vec<serde_json::Value> = report
                .issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "severity": format!("{:?}", issue.severity),
                        "code": format!("{:?}", issue.code),
                        "message": issue.message,
                        "context": issue.context.to_string(),
                    })
                })
                .collect();
            let doc = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": issues,
            });
            let text = serde_json::to_string_pretty(&doc).map_err(|source| {
                SegsetError::ManifestSerialize {
                    what: "validation report",
                    source,
                }
            })?;
            println!("{}", text);
        }
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(SegsetError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn run_simplify(args: SimplifyArgs, config: &PipelineConfig) -> Result<(), SegsetError> {
    let tolerance = args.tolerance.unwrap_or(config.simplification_tolerance);
    let mut project = project::io_json::read_project(&args.input)?;

    let (mut before, mut after) = (0usize, 0usize);
    for record in &mut project.annotations {
        let outcome = record.simplify(tolerance, config)?;
        before += outcome.original_count;
        after += outcome.simplified_count;
    }
    project::io_json::write_project(&args.output, &project)?;

    let total = geometry::SimplifyOutcome {
        original_count: before,
        simplified_count: after,
        tolerance,
    };
    println!(
        "Simplified {} annotation(s) at tolerance {}: {} -> {} points ({:.1}% reduction)",
        project.annotations.len(),
        tolerance,
        before,
        after,
        total.reduction_percentage() * 100.0
    );
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<(), SegsetError> {
    let project = project::io_json::read_project(&args.input)?;
    let report = stats::project_stats(&project.images, &project.annotations, &project.classes);

    match args.output {
        ReportFormat::Json => {
            let text = serde_json::to_string_pretty(&report).map_err(|source| {
                SegsetError::ManifestSerialize {
                    what: "stats report",
                    source,
                }
            })?;
            println!("{}", text);
        }
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<(), SegsetError> {
    let mut project = project::io_json::read_project(&args.input)?;
    let ratios = split::SplitRatios {
        train: args.train,
        val: args.val,
    };
    let summary = split::assign_partitions(&mut project.images, ratios, args.seed)?;
    project::io_json::write_project(&args.output, &project)?;

    println!(
        "Split {} image(s): {} train, {} val, {} test",
        project.images.len(),
        summary.train,
        summary.val,
        summary.test
    );
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), SegsetError> {
    let format: ExportFormat = args.format.parse()?;
    let mut project = project::io_json::read_project(&args.input)?;

    let options = ExportOptions {
        include_images: args.images_dir.is_some(),
        only_unexported: args.only_unexported,
    };
    let resolver: Box<dyn ImageResolver> = match &args.images_dir {
        Some(dir) => Box::new(resolve::DirectoryResolver::scan(dir)?),
        None => Box::new(NoImages),
    };

    let bundle = export::export_dataset(
        &project.export_request(),
        format,
        &options,
        resolver.as_ref(),
    )?;
    archive::write_zip(&args.output, &bundle)?;

    let manifest = bundle.manifest();
    println!(
        "Exported {} annotation(s) from {} image(s) as {}",
        manifest.total_annotations, manifest.total_images, format
    );
    println!("  Archive: {}", args.output.display());
    if manifest.skipped_annotations() > 0 {
        println!(
            "  Skipped: {} invalid, {} already exported",
            manifest.skipped_invalid_annotations, manifest.skipped_exported_annotations
        );
    }
    if manifest.skipped_images > 0 {
        println!("  Missing images: {}", manifest.skipped_images);
    }

    if args.mark_exported {
        let marked = export::mark_exported(&mut project.annotations, &bundle);
        project::io_json::write_project(&args.input, &project)?;
        println!("  Marked {} annotation(s) as exported", marked);
    }
    Ok(())
}
