//! Interactive shell - the line-oriented front end for the stateful pipeline.
//!
//! Commands map one-to-one onto pipeline operations; errors are printed and
//! the loop continues, so a failed decode never ends the session.

use std::path::{Path, PathBuf};

use console::Style;
use dialoguer::Input;
use morph_core::{Config, Pipeline};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)`
/// on interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O
/// failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const HELP: &str = "\
Commands:
  add <path>                 load an image file or every image in a folder
  gray [intensity] [name]    grayscale all images, or one by filename (default 100%)
  preview [name]             write previews into the output folder, keep in memory
  export <dir> [name]        write images into <dir> and clear them (--keep to retain)
  list                       show loaded images
  mem                        show memory held by loaded images
  help                       show this help
  exit                       quit";

/// Entry point for the interactive shell. Runs until `exit` or Ctrl+C.
pub fn run(config: &Config) -> anyhow::Result<()> {
    super::ensure_folders(config)?;

    let dim = Style::new().for_stderr().dim();
    let red = Style::new().for_stderr().red();

    eprintln!("Morph v{} - type 'help' for commands", morph_core::VERSION);
    eprintln!("{}", dim.apply_to(format!("input folder: {}", config.input_dir().display())));

    let mut pipeline = Pipeline::new(config);

    loop {
        let line = match handle_interrupt(
            Input::<String>::new()
                .with_prompt("morph")
                .allow_empty(true)
                .interact_text(),
        )? {
            Some(line) => line,
            None => break,
        };

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let rest: Vec<&str> = parts.collect();

        match command {
            "add" => add(&mut pipeline, &rest, &red),
            "gray" | "grayscale" => gray(&mut pipeline, &rest, &red),
            "preview" => preview(&mut pipeline, &rest, &red),
            "export" => export(&mut pipeline, &rest, &red),
            "list" => list(&pipeline),
            "mem" => {
                println!("{:.2} MiB in memory", mib(pipeline.memory_usage()));
            }
            "help" => println!("{}", HELP),
            "exit" | "quit" => break,
            other => println!("Unknown command: {} (try 'help')", other),
        }
    }

    let reclaimed = pipeline.memory_usage();
    if reclaimed > 0 {
        println!("Reclaimed {:.2} MiB", mib(reclaimed));
    }
    Ok(())
}

fn mib(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn add(pipeline: &mut Pipeline, rest: &[&str], red: &Style) {
    if rest.is_empty() {
        println!("Usage: add <path>");
        return;
    }
    let raw = rest.join(" ");
    let expanded: PathBuf = shellexpand::tilde(&raw).into_owned().into();
    match pipeline.add_input(Path::new(&expanded)) {
        Ok(count) => println!("Loaded {} image(s)", count),
        Err(e) => eprintln!("{}", red.apply_to(e.to_string())),
    }
}

/// `gray [intensity] [name]` - a numeric argument is the intensity, anything
/// else is the target filename.
fn gray(pipeline: &mut Pipeline, rest: &[&str], red: &Style) {
    let mut intensity = 100.0;
    let mut target = String::new();
    for arg in rest {
        match arg.parse::<f64>() {
            Ok(value) => intensity = value,
            Err(_) => target = arg.to_string(),
        }
    }

    match pipeline.apply_grayscale(&target, intensity) {
        Ok(count) => println!(
            "Applied grayscale ({}%) to {} image(s)",
            intensity.clamp(0.0, 100.0),
            count
        ),
        Err(e) => eprintln!("{}", red.apply_to(e.to_string())),
    }
}

fn preview(pipeline: &mut Pipeline, rest: &[&str], red: &Style) {
    let target = rest.first().copied().unwrap_or_default();
    match pipeline.save_preview(target) {
        Ok(report) => {
            println!("Saved {} preview(s) to disk", report.written);
            if report.failed > 0 {
                println!("{} file(s) failed to write", report.failed);
            }
        }
        Err(e) => eprintln!("{}", red.apply_to(e.to_string())),
    }
}

fn export(pipeline: &mut Pipeline, rest: &[&str], red: &Style) {
    let mut keep = false;
    let mut positional: Vec<&str> = Vec::new();
    for arg in rest {
        if *arg == "--keep" {
            keep = true;
        } else {
            positional.push(*arg);
        }
    }

    let Some(dest) = positional.first() else {
        println!("Usage: export <dir> [name] [--keep]");
        return;
    };
    let target = positional.get(1).copied().unwrap_or_default();
    let expanded: PathBuf = shellexpand::tilde(dest).into_owned().into();

    match pipeline.export_output(&expanded, !keep, target) {
        Ok(report) => {
            println!("Export complete! ({} file(s))", report.written);
            if report.failed > 0 {
                println!("{} file(s) failed to write", report.failed);
            }
            if report.cleared > 0 {
                println!("Cleared {} image(s) from input", report.cleared);
            }
        }
        Err(e) => eprintln!("{}", red.apply_to(e.to_string())),
    }
}

fn list(pipeline: &Pipeline) {
    let listing = pipeline.list_input();
    if listing.is_empty() {
        println!("No images in input.");
        return;
    }
    println!("Images in input ({}):", listing.len());
    for summary in listing {
        println!("  - {}", summary);
    }
}
