//! Progress bar, end-of-run summary and JSON report.

use std::path::Path;

use coco2voc_core::ConversionStats;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for the conversion loop (hidden with `--no-progress`).
pub fn create_progress_bar(total: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after conversion.
pub fn print_summary(stats: &ConversionStats) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Converted:    {:>8}", stats.images_converted);
    if stats.images_skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.images_skipped);
    }
    eprintln!("    Instances:    {:>8}", stats.annotations_composited);
    if stats.annotations_skipped > 0 {
        eprintln!("    No geometry:  {:>8}", stats.annotations_skipped);
    }
    if stats.crowd_dropped > 0 {
        eprintln!("    Crowd:        {:>8}", stats.crowd_dropped);
    }
    eprintln!("  ------------------------------------");
    eprintln!(
        "    Ids:          {:>8}  ({}..{})",
        stats.ids_allocated(),
        stats.first_id,
        stats.next_id
    );
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", stats.images_per_second);
    eprintln!("  ====================================");
}

/// Write the run statistics as pretty JSON.
pub fn write_report(path: &Path, stats: &ConversionStats) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json)?;
    Ok(())
}
