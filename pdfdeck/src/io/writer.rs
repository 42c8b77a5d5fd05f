//! Writing artifacts to disk.
//!
//! This module provides safe artifact writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite protection
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::writer::ArtifactWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = ArtifactWriter::new();
//! writer.write(Path::new("out"), "report_merged.pdf", &bytes).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::document::Artifact;
use crate::error::{ErrorKind, PdfDeckError, Result};
use crate::utils::format_file_size;

/// Options for writing files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Replace files that already exist.
    pub overwrite: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            overwrite: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes byte buffers into an output directory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter {
    options: WriteOptions,
}

impl ArtifactWriter {
    /// Writer with default options: atomic, never overwriting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Writer that replaces existing files.
    pub fn overwriting() -> Self {
        Self {
            options: WriteOptions {
                overwrite: true,
                ..Default::default()
            },
        }
    }

    /// Write `bytes` to `dir/file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists and overwriting is off
    /// - The temp file cannot be created or written
    /// - The final rename fails
    pub async fn write(
        &self,
        dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<WriteStatistics> {
        let path_buf = dir.join(file_name);
        if !self.options.overwrite && self.exists(&path_buf).await {
            return Err(PdfDeckError::OutputExists { path: path_buf });
        }

        let options = self.options.clone();
        let data = bytes.to_vec();

        task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                path_buf.with_extension("tmp")
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| PdfDeckError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
            writer
                .write_all(&data)
                .and_then(|_| writer.flush())
                .map_err(|e| PdfDeckError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })?;
            drop(writer);

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| PdfDeckError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e,
                })?;
            }

            Ok::<_, PdfDeckError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: data.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| {
            PdfDeckError::classified(ErrorKind::ProcessingError, format!("Write task failed: {e}"))
        })?
    }

    /// Write every artifact into `dir` under its own file name.
    pub async fn write_artifacts<A: Artifact>(
        &self,
        dir: &Path,
        artifacts: &[A],
    ) -> Result<Vec<WriteStatistics>> {
        let mut stats = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            stats.push(self.write(dir, artifact.file_name(), artifact.bytes()).await?);
        }
        Ok(stats)
    }

    /// Paths among `file_names` that already exist in `dir`.
    pub async fn existing_outputs<'a, I>(&self, dir: &Path, file_names: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut existing = Vec::new();
        for name in file_names {
            let path = dir.join(name);
            if self.exists(&path).await {
                existing.push(path);
            }
        }
        existing
    }

    /// Create `dir` (and its parents) if needed.
    pub async fn ensure_dir(&self, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PdfDeckError::FailedToWrite {
                path: dir.to_path_buf(),
                source: e,
            })
    }

    /// Check if a file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
