// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contourlet: command-line entry point.
//
// Initialises logging, parses arguments, and dispatches to the batch driver
// or the single-image helper.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use contourlet_batch::{BatchDriver, write_report};
use contourlet_core::error::Result;
use contourlet_core::{BatchConfig, BatchSummary, EnhanceStatus, TransformConfig};
use contourlet_filter::{ContourletTransform, enhance_file};

#[derive(Parser)]
#[command(name = "contourlet")]
#[command(about = "Directional multi-scale enhancement for image datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enhance every .jpg/.png in a directory.
    Batch(BatchArgs),

    /// Enhance a single image file.
    Apply(ApplyArgs),
}

#[derive(Debug, Clone, Args)]
struct TransformArgs {
    /// Pyramid level count [default: 2].
    #[arg(long)]
    levels: Option<usize>,

    /// Directions in the filter bank [default: 8].
    #[arg(long)]
    directions: Option<usize>,
}

impl TransformArgs {
    fn apply_to(&self, config: &mut TransformConfig) {
        if let Some(levels) = self.levels {
            config.num_levels = levels;
        }
        if let Some(directions) = self.directions {
            config.num_directions = directions;
        }
    }
}

#[derive(Debug, Clone, Args)]
struct BatchArgs {
    /// Directory of images [default: dataset/images].
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Write results here instead of overwriting the inputs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep the originals; write to <input>_contourlet unless --output-dir is given.
    #[arg(long)]
    no_replace: bool,

    /// Copy the input directory before processing.
    #[arg(long)]
    backup: bool,

    /// Backup target [default: <input>_original].
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Worker threads; 0 uses every core [default: 1].
    #[arg(long)]
    jobs: Option<usize>,

    /// JSON config file. Command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run summary as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    transform: TransformArgs,
}

#[derive(Debug, Clone, Args)]
struct ApplyArgs {
    /// Image to enhance.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the enhanced image. The format follows the extension.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    transform: TransformArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Batch(args) => run_batch(&args),
        Commands::Apply(args) => run_apply(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "contourlet failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ── batch ──────────────────────────────────────────────────────────────

fn batch_config(args: &BatchArgs) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };
    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
        config.replace_originals = false;
    }
    if args.no_replace {
        config.replace_originals = false;
    }
    if args.backup {
        config.backup = true;
    }
    if let Some(dir) = &args.backup_dir {
        config.backup_dir = Some(dir.clone());
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    args.transform.apply_to(&mut config.transform);
    config.validate()?;
    Ok(config)
}

fn run_batch(args: &BatchArgs) -> Result<()> {
    let config = batch_config(args)?;
    let driver = BatchDriver::new(config)?;
    let summary = driver.run()?;
    print_summary(&summary);

    if let Some(path) = &args.report {
        write_report(&summary, path)?;
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!("contourlet batch summary");
    println!("  images found:   {}", summary.total);
    println!("  processed:      {}", summary.processed);
    println!("  failed:         {}", summary.failed);
    if !summary.passthrough_files.is_empty() {
        println!("  passed through: {}", summary.passthrough_files.join(", "));
    }
    if !summary.failed_files.is_empty() {
        println!("  failed files:   {}", summary.failed_files.join(", "));
    }
    let elapsed = summary.finished_at - summary.started_at;
    println!("  elapsed:        {:.2}s", elapsed.num_milliseconds() as f64 / 1000.0);
}

// ── apply ──────────────────────────────────────────────────────────────

fn run_apply(args: &ApplyArgs) -> Result<()> {
    let mut config = TransformConfig::default();
    args.transform.apply_to(&mut config);
    let transform = ContourletTransform::new(config)?;

    let enhancement = enhance_file(&transform, &args.input, Some(&args.output))?;
    match &enhancement.status {
        EnhanceStatus::Enhanced(report) => println!(
            "enhanced {} -> {} ({} of {} levels averaged)",
            args.input.display(),
            args.output.display(),
            report.averaged_levels,
            report.pyramid_levels
        ),
        EnhanceStatus::Passthrough(reason) => println!(
            "passed through {} -> {} ({reason})",
            args.input.display(),
            args.output.display()
        ),
    }
    Ok(())
}
