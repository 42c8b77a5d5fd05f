//! User-facing output: status messages, the progress bar and the manifest.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::config::Config;
//! use pdfdeck::output::create_formatter;
//!
//! # fn example(config: Config) {
//! let formatter = create_formatter(&config);
//! formatter.info("Splitting report.pdf");
//! # }
//! ```

pub mod formatter;
pub mod manifest;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use manifest::{Manifest, ManifestEntry};
pub use progress::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::io::WriteStatistics;
use crate::merge::MergeStatistics;
use crate::utils::format_file_size;
use crate::validation::{DocumentInfo, MemoryAdvisory};

/// Formatter honouring the quiet and verbose settings of `config`.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Describe a loaded source document. Verbose only.
pub fn display_document_info(formatter: &OutputFormatter, info: &DocumentInfo) {
    formatter.debug(&format!("{}: {} page(s)", info.name, info.page_count));
    formatter.detail("Size", &info.formatted_size());
    if let Some((major, minor)) = info.version {
        formatter.detail("PDF version", &format!("{major}.{minor}"));
    }
    if let Some((width, height)) = info.page_dimensions {
        formatter.detail("First page", &format!("{width:.0} x {height:.0} pt"));
    }
}

/// Text of the warning shown for a [`MemoryAdvisory`].
pub fn memory_advisory_message(name: &str, advisory: &MemoryAdvisory) -> String {
    format!(
        "{name} is {} with only {} of memory available; processing may be slow or fail",
        format_file_size(advisory.file_size),
        format_file_size(advisory.available_bytes)
    )
}

/// Warn that a document looked large next to the available memory.
pub fn display_memory_advisory(
    formatter: &OutputFormatter,
    name: &str,
    advisory: &MemoryAdvisory,
) {
    formatter.warning(&memory_advisory_message(name, advisory));
}

/// Summarise a merge.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.info(&format!(
        "Merged {} file(s) into {} pages in {:.2}s",
        stats.files_merged,
        stats.total_pages,
        stats.merge_time.as_secs_f64()
    ));
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Output size", &stats.format_output_size());
}

/// Summarise what was written to disk.
pub fn display_write_statistics(formatter: &OutputFormatter, stats: &[WriteStatistics]) {
    let total: u64 = stats.iter().map(|s| s.file_size).sum();
    let elapsed: f64 = stats.iter().map(|s| s.write_time.as_secs_f64()).sum();
    formatter.success(&format!(
        "Wrote {} file(s), {}",
        stats.len(),
        format_file_size(total)
    ));
    for stat in stats {
        formatter.detail(&stat.output_path.display().to_string(), &stat.format_file_size());
    }
    formatter.detail("Write time", &format!("{elapsed:.2}s"));
}
