//! voc2coco: resize an object-detection image set and convert its Pascal VOC
//! XML annotations into one COCO-like `data.json`.
//!
//! Two pipelines share only the output directory. The image resizer shrinks
//! every image to fit within 800x450 (each axis clamped on its own). The
//! annotation converter rescales every bounding box with the same limits,
//! assigns category/image/annotation ids in file name order, and writes a
//! single JSON document. A final consistency check cross-references the two.
//!
//! # Modules
//!
//! - [`ir`]: data model, VOC XML reader and COCO JSON writer
//! - [`conversion`]: category registry, bbox rescaler, id accumulator
//! - [`resize`]: image resizer
//! - [`validation`]: consistency checks over the outputs
//! - [`pipeline`]: end-to-end run and its report
//! - [`error`]: error types

pub mod conversion;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod resize;
pub mod validation;
mod walk;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use conversion::{ObjectPolicy, ResizeLimits, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
pub use error::Voc2CocoError;
use pipeline::PipelineConfig;

/// The voc2coco CLI application.
#[derive(Parser)]
#[command(name = "voc2coco")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize images and convert VOC XML annotations into data.json.
    Convert(ConvertArgs),
    /// Check a written data.json for consistency.
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing the images to resize.
    #[arg(long = "imagedir", value_name = "DIR")]
    image_dir: PathBuf,

    /// Directory containing one VOC XML file per image.
    #[arg(long = "xmldir", value_name = "DIR")]
    xml_dir: PathBuf,

    /// Output directory; created if missing.
    #[arg(long = "outputdir", value_name = "DIR")]
    output_dir: PathBuf,

    /// Largest output image width.
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    max_width: u32,

    /// Largest output image height.
    #[arg(long, default_value_t = DEFAULT_MAX_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    max_height: u32,

    /// Which <object> elements of a file become annotations.
    #[arg(long, value_enum, default_value_t = ObjectPolicy::Last)]
    objects: ObjectPolicy,

    /// Skip files that fail instead of aborting; exits non-zero if any were skipped.
    #[arg(long)]
    keep_going: bool,

    /// Pretty-print data.json.
    #[arg(long)]
    pretty: bool,

    /// Format of the run report printed on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// The data.json to check.
    input: PathBuf,

    /// Treat warnings as errors.
    #[arg(long)]
    strict: bool,

    /// Format of the report printed on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the voc2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2CocoError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("voc2coco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Resize a VOC image set and convert its annotations to COCO JSON.");
            println!();
            println!("Run 'voc2coco --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::new(format!("warn,voc2coco={level}"));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_convert(args: ConvertArgs) -> Result<(), Voc2CocoError> {
    let config = PipelineConfig {
        image_dir: args.image_dir,
        xml_dir: args.xml_dir,
        output_dir: args.output_dir,
        limits: ResizeLimits::new(args.max_width, args.max_height),
        object_policy: args.objects,
        keep_going: args.keep_going,
        pretty: args.pretty,
    };

    match pipeline::run_pipeline(&config) {
        Ok(report) => {
            print_report(&report, args.report)?;
            if report.consistency.is_ok() {
                Ok(())
            } else {
                Err(Voc2CocoError::CheckFailed {
                    error_count: report.consistency.error_count(),
                    warning_count: report.consistency.warning_count(),
                    report: report.consistency,
                })
            }
        }
        Err(Voc2CocoError::BatchIncomplete { skipped, report }) => {
            print_report(&*report, args.report)?;
            Err(Voc2CocoError::BatchIncomplete { skipped, report })
        }
        Err(err) => Err(err),
    }
}

fn run_check(args: CheckArgs) -> Result<(), Voc2CocoError> {
    let dataset = ir::io_coco_json::read_coco_json(&args.input)?;
    let report = validation::validate_dataset(&dataset);

    print_report(&report, args.output)?;

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(Voc2CocoError::CheckFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn print_report<R>(report: &R, format: ReportFormat) -> Result<(), Voc2CocoError>
where
    R: Serialize + std::fmt::Display,
{
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }
    Ok(())
}
