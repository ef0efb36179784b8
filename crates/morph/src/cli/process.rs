//! The `morph process` command - one-shot load, filter, and export.

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use morph_core::{Config, Pipeline};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image files or directories to load
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Apply grayscale at the given intensity percentage (0-100)
    #[arg(long, value_name = "PCT")]
    pub grayscale: Option<f64>,

    /// Restrict filtering and write-out to one loaded image by filename
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Write previews into the configured output folder
    #[arg(long)]
    pub preview: bool,

    /// Export destination directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Keep exported images in memory instead of clearing them
    #[arg(long)]
    pub keep: bool,

    /// Print the loaded-image listing as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the process command.
pub fn execute(args: ProcessArgs, config: &Config) -> anyhow::Result<()> {
    super::ensure_folders(config)?;
    let mut pipeline = Pipeline::new(config);
    let target = args.target.clone().unwrap_or_default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Loading images...");

    let mut loaded = 0;
    for input in &args.inputs {
        let expanded = shellexpand::tilde(&input.to_string_lossy()).into_owned();
        match pipeline.add_input(Path::new(&expanded)) {
            Ok(count) => loaded += count,
            Err(e) => tracing::error!("{}", e),
        }
    }
    spinner.finish_and_clear();

    println!("Loaded {} image(s)", loaded);
    if loaded == 0 {
        anyhow::bail!("nothing to process");
    }

    if let Some(intensity) = args.grayscale {
        let processed = pipeline.apply_grayscale(&target, intensity)?;
        println!(
            "Applied grayscale ({}%) to {} image(s)",
            intensity.clamp(0.0, 100.0),
            processed
        );
    }

    if args.preview {
        let report = pipeline.save_preview(&target)?;
        println!("Saved {} preview(s) to disk", report.written);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pipeline.list_input())?);
    } else {
        for summary in pipeline.list_input() {
            println!("  - {}", summary);
        }
    }

    if let Some(dest) = &args.output {
        let report = pipeline.export_output(dest, !args.keep, &target)?;
        println!("Export complete! ({} file(s))", report.written);
        if report.failed > 0 {
            println!("{} file(s) failed to write", report.failed);
        }
        if !report.is_success() {
            anyhow::bail!("export wrote no files");
        }
    }

    Ok(())
}
