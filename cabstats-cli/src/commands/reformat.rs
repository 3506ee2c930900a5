use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Report every N rows to keep the spinner cheap
const PROGRESS_STEP: u64 = 10_000;

/// Normalize the raw trip CSV at `input` into `output`
pub fn run_reformat(input: &Path, output: &Path, taxi_type: &str, no_progress: bool) -> Result<()> {
    let bar = if no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec})")
                .context("Invalid progress template")?,
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };

    let summary = cabstats::transform::run_transform(input, output, taxi_type, |rows| {
        if rows % PROGRESS_STEP == 0 {
            bar.set_position(rows);
        }
    })
    .with_context(|| format!("Failed to reformat {}", input.display()))?;

    bar.set_position(summary.rows);
    bar.finish_with_message("done");

    println!();
    println!("Reformat completed:");
    println!("  Rows:   {}", summary.rows);
    println!("  Output: {}", output.display());

    Ok(())
}
