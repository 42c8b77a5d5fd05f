//! Reading candidate files from disk.
//!
//! Name and size are checked from file metadata before the file is opened,
//! so an oversized or mistyped file is rejected without reading it.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let candidate = reader.read(Path::new("report.pdf")).await?;
//! println!("read {} bytes", candidate.size);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::MAX_FILE_SIZE;
use crate::document::CandidateFile;
use crate::error::{PdfDeckError, Result};
use crate::validation::Validator;

/// What is known about a file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProbe {
    /// Path on disk.
    pub path: PathBuf,
    /// File name component.
    pub name: String,
    /// Size from metadata.
    pub size: u64,
}

/// Loads candidate files from disk.
#[derive(Debug, Clone)]
pub struct PdfReader {
    max_file_size: u64,
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReader {
    /// Reader enforcing the default single-file ceiling.
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Reader enforcing a custom single-file ceiling.
    pub fn with_limit(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Look up name and size without reading, and apply the name and size
    /// checks.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `InvalidFileType` if it is a directory or lacks a `.pdf` extension
    /// - `FileTooLarge` if it exceeds the ceiling
    pub async fn probe(&self, path: &Path) -> Result<FileProbe> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfDeckError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PdfDeckError::from(e)
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !metadata.is_file() {
            return Err(PdfDeckError::invalid_file_type(name, "not a regular file"));
        }

        Validator::check_type(&name, None)?;
        Validator::check_size(&name, metadata.len(), self.max_file_size)?;

        Ok(FileProbe {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    /// Probe `path`, then read it fully into memory.
    pub async fn read(&self, path: &Path) -> Result<CandidateFile> {
        let probe = self.probe(path).await?;
        let bytes = tokio::fs::read(&probe.path).await?;
        debug!(path = %probe.path.display(), size = bytes.len(), "read candidate");
        Ok(CandidateFile::new(probe.name, bytes))
    }

    /// Read every path in order, stopping at the first failure.
    pub async fn read_all(&self, paths: &[PathBuf]) -> Result<Vec<CandidateFile>> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            candidates.push(self.read(path).await?);
        }
        Ok(candidates)
    }
}
