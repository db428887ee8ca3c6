//! dsn2kicad CLI - convert Specctra DSN boards to KiCad PCB files from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dsn2kicad::{ConversionOptions, Dsn2KicadCore, InspectReport, PinlessNets};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dsn2kicad")]
#[command(about = "Specctra DSN to KiCad PCB converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DSN file into a .kicad_pcb file
    Convert {
        /// Path to the .dsn input
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Path of the .kicad_pcb file to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Millimetres per DSN length unit
        #[arg(long)]
        scale: Option<f64>,

        /// X offset added to every placed coordinate (mm)
        #[arg(long, allow_hyphen_values = true)]
        offset_x: Option<f64>,

        /// Y offset added to every placed coordinate (mm)
        #[arg(long, allow_hyphen_values = true)]
        offset_y: Option<f64>,

        /// Skip nets without a pin list instead of ignoring all nets after them
        #[arg(long)]
        skip_pinless_nets: bool,
    },

    /// Print parse statistics for a DSN file without converting it
    Inspect {
        /// Path to the .dsn file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            scale,
            offset_x,
            offset_y,
            skip_pinless_nets,
        } => {
            let mut options = ConversionOptions::default();
            if let Some(scale) = scale {
                options.scale = scale;
            }
            if let Some(x) = offset_x {
                options.offset_x = x;
            }
            if let Some(y) = offset_y {
                options.offset_y = y;
            }
            if skip_pinless_nets {
                options.pinless_nets = PinlessNets::Skip;
            }
            handle_convert(&input, &output, options)
        }
        Commands::Inspect { file, format } => handle_inspect(&file, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_convert(input: &Path, output: &Path, options: ConversionOptions) -> Result<()> {
    if options.scale <= 0.0 || !options.scale.is_finite() {
        anyhow::bail!("--scale must be a positive number, got {}", options.scale);
    }
    for (flag, value) in [("--offset-x", options.offset_x), ("--offset-y", options.offset_y)] {
        if !value.is_finite() {
            anyhow::bail!("{} must be a finite number, got {}", flag, value);
        }
    }

    let stats = Dsn2KicadCore::convert_file(input, output, options)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("Wrote {}", output.display());
    println!(
        "  {} modules, {} pads, {} nets, {} zones",
        stats.modules, stats.pads, stats.nets, stats.zones
    );
    if stats.skipped_through_hole_pads > 0 {
        println!(
            "  {} through-hole pads not converted",
            stats.skipped_through_hole_pads
        );
    }
    Ok(())
}

fn handle_inspect(file: &Path, format: OutputFormat) -> Result<()> {
    let report = Dsn2KicadCore::inspect(file, ConversionOptions::default())
        .with_context(|| format!("Failed to inspect {}", file.display()))?;

    match format {
        OutputFormat::Human => output_human(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn output_human(report: &InspectReport) {
    println!("\nFile: {}", report.file.display());
    println!("{}", "─".repeat(60));
    println!("  Nodes:      {}", report.nodes);
    println!("  Components: {}", report.components);
    println!("  Images:     {}", report.images);
    println!("  Padstacks:  {}", report.padstacks);
    println!("  Nets:       {}", report.nets);
    println!("  Regions:    {}", report.regions);

    println!("\n  Keywords:");
    for (keyword, count) in &report.keywords {
        println!("    {:<16} {}", keyword, count);
    }
}
