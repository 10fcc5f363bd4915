use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use media_converter::cli::{Cli, Command};
use media_converter::convert::{convert_file, resolve_single_output};
use media_converter::io::{plan_batch, split_collisions};
use media_converter::report::{FileResult, Report};
use media_converter_core::{Pipeline, TargetFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let pipeline = Pipeline::standard();

    match &cli.command {
        Command::Convert {
            input,
            output,
            settings,
        } => {
            let target = parse_target(&settings.to)?;
            handle_convert(&pipeline, input, output.as_deref(), target, &settings.to_form())
        }
        Command::Batch {
            inputs,
            output,
            recursive,
            settings,
        } => {
            let target = parse_target(&settings.to)?;
            handle_batch(&pipeline, inputs, output, *recursive, target, &settings.to_form())
        }
    }
}

fn parse_target(name: &str) -> Result<TargetFormat> {
    TargetFormat::from_name(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid target format: {}. Use: png, jpg, jpeg, webp, gif, bmp, tiff",
            name
        )
    })
}

fn handle_convert(
    pipeline: &Pipeline,
    input: &Path,
    output: Option<&Path>,
    target: TargetFormat,
    form: &HashMap<String, String>,
) -> Result<()> {
    let output_path = resolve_single_output(input, output, target);

    let result = convert_file(pipeline, input, &output_path, form)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!(
        "✓ {} → {} ({:.1}% smaller)",
        input.display(),
        output_path.display(),
        result.savings_pct()
    );

    Ok(())
}

fn handle_batch(
    pipeline: &Pipeline,
    inputs: &[PathBuf],
    output_dir: &Path,
    recursive: bool,
    target: TargetFormat,
    form: &HashMap<String, String>,
) -> Result<()> {
    let entries = plan_batch(inputs, output_dir, recursive, target)
        .context("Failed to collect input files")?;

    if entries.is_empty() {
        println!("No supported files found.");
        return Ok(());
    }

    println!("Converting {} file(s) to {}...", entries.len(), target.as_str());

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▓░"),
    );

    let (entries, colliding) = split_collisions(entries);

    let mut initial = Report::new();
    for (entry, err) in colliding {
        log::error!("Skipping {}: {}", entry.input.display(), err);
        initial.add(FileResult::failed(entry.input, err.to_string()));
        pb.inc(1);
    }
    let report = Mutex::new(initial);

    entries.par_iter().for_each(|entry| {
        let input_path = &entry.input;

        let file_result = match convert_file(pipeline, input_path, &entry.output, form) {
            Ok(result) => {
                pb.set_message(format!(
                    "{} → {}",
                    input_path.display(),
                    target.as_str()
                ));
                result
            }
            Err(e) => {
                log::error!("Error converting {}: {}", input_path.display(), e);
                FileResult::failed(input_path.clone(), e.to_string())
            }
        };

        report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .add(file_result);
        pb.inc(1);
    });

    pb.finish_with_message("Done!");
    report
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .print_summary();

    Ok(())
}
