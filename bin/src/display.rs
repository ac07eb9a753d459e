//! Display utilities and output formatting for the clibra CLI.

use clap::ValueEnum;
use clibra_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Output format for generated files.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    /// Gzip-compressed CSV
    #[value(name = "csv.gz", alias = "csvgz")]
    CsvGz,
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::CsvGz => Self::CsvGz,
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", OutputFormat::from(*self).extension())
    }
}

/// Creates a per-day progress bar, hidden in quiet mode.
pub(crate) fn day_progress(total_days: usize, message: String, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total_days as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb.set_message(message);
    pb
}

/// Creates a spinner for work without a known length, hidden in quiet mode.
pub(crate) fn spinner(message: String, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    pb
}

/// Formats a date list compactly, collapsing long lists.
pub(crate) fn summarize_dates(dates: &[chrono::NaiveDate]) -> String {
    const SHOWN: usize = 5;
    let head: Vec<String> = dates.iter().take(SHOWN).map(ToString::to_string).collect();
    if dates.len() > SHOWN {
        format!("{}, ... ({} total)", head.join(", "), dates.len())
    } else {
        head.join(", ")
    }
}
