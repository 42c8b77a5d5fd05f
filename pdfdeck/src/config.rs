//! Configuration module for pdfdeck.
//!
//! Holds the fixed constants of the output formats, the size ceilings, the
//! thumbnail options and the pipeline configuration, plus the validated
//! configuration the command-line front end builds from its arguments.

use anyhow::{Result, bail};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::validation::MemoryProbe;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Ceiling for a single source document.
pub const MAX_FILE_SIZE: u64 = 100 * MIB;

/// Ceiling for the combined size of all documents in one merge.
pub const MAX_MERGE_SIZE: u64 = 200 * MIB;

/// Media type of every PDF artifact.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Media type of the packaged archive.
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Media type of thumbnail data URIs.
pub const THUMBNAIL_MIME_TYPE: &str = "image/jpeg";

/// Archive name used when the caller supplies none.
pub const DEFAULT_ARCHIVE_NAME: &str = "pdf_pages.zip";

/// Thumbnail width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 200;

/// JPEG quality for thumbnails (0.8 on a 0..1 scale).
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 80;

/// Upper bound on a single thumbnail render.
pub const DEFAULT_THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Name of the manifest written next to the artifacts.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Size ceilings applied before any document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest accepted single document, in bytes.
    pub max_file_size: u64,
    /// Largest accepted merge batch, in bytes.
    pub max_merge_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_merge_size: MAX_MERGE_SIZE,
        }
    }
}

/// How (and whether) thumbnails are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Render thumbnails at all.
    pub enabled: bool,
    /// Target width in pixels; height follows the page aspect ratio.
    pub width: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Abandon a render that takes longer than this.
    pub timeout: Duration,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            width: DEFAULT_THUMBNAIL_WIDTH,
            quality: DEFAULT_THUMBNAIL_QUALITY,
            timeout: DEFAULT_THUMBNAIL_TIMEOUT,
        }
    }
}

impl ThumbnailOptions {
    /// Options with thumbnails switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Configuration of the document pipeline.
#[derive(Clone, Default)]
pub struct PipelineConfig {
    /// Size ceilings.
    pub limits: Limits,
    /// Thumbnail rendering options.
    pub thumbnails: ThumbnailOptions,
    /// Optional source of memory figures for the pre-load advisory.
    pub memory_probe: Option<Arc<dyn MemoryProbe>>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("limits", &self.limits)
            .field("thumbnails", &self.thumbnails)
            .field("memory_probe", &self.memory_probe.is_some())
            .finish()
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Operation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One output file per page of each input.
    Split,
    /// One output file concatenating all inputs.
    Merge,
    /// Bundle the inputs, unchanged, into one archive.
    Zip,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Split => "split",
            Self::Merge => "merge",
            Self::Zip => "zip",
        })
    }
}

/// Complete configuration for one command-line run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operation to run.
    pub command: Command,

    /// Input PDF file paths, in order.
    pub inputs: Vec<PathBuf>,

    /// Directory receiving all outputs.
    pub output_dir: PathBuf,

    /// Bundle the outputs into an archive with this name.
    pub archive: Option<String>,

    /// Render a thumbnail for each artifact.
    pub thumbnails: bool,

    /// Write a manifest describing the artifacts.
    pub manifest: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The archive name is empty or does not end in `.zip`
    /// - The zip command has no archive name
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(name) = &self.archive {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                bail!("Archive name cannot be empty");
            }
            if !trimmed.to_lowercase().ends_with(".zip") {
                bail!("Archive name must end with .zip: {trimmed}");
            }
            if trimmed.contains(['/', '\\']) {
                bail!("Archive name must be a file name, not a path: {trimmed}");
            }
        } else if self.command == Command::Zip {
            bail!("The zip command needs an archive name");
        }

        Ok(())
    }

    /// Pipeline configuration derived from these settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            limits: Limits::default(),
            thumbnails: if self.thumbnails {
                ThumbnailOptions::default()
            } else {
                ThumbnailOptions::disabled()
            },
            memory_probe: None,
        }
    }

    /// Check if status output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
