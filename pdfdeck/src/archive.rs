//! Bundling artifacts into a ZIP archive.
//!
//! Archive failures are reported as [`ArchiveError`], separate from
//! [`crate::PdfDeckError`], carrying the zip or io failure unchanged.

use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::debug;
use zip::CompressionMethod;
use zip::result::ZipError;
use zip::write::{FileOptions, ZipWriter};

use crate::config::{DEFAULT_ARCHIVE_NAME, ZIP_MIME_TYPE};
use crate::document::Artifact;

/// Errors raised while building an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An entry could not be started.
    #[error("failed to add '{name}' to archive: {source}")]
    Entry {
        /// Entry name.
        name: String,
        /// Underlying zip error.
        source: ZipError,
    },

    /// Entry data could not be written.
    #[error("failed to write archive data: {0}")]
    Io(#[from] std::io::Error),

    /// The central directory could not be written.
    #[error("failed to finish archive: {0}")]
    Finish(#[source] ZipError),
}

/// One file to put in an archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveEntry<'a> {
    /// Name inside the archive.
    pub name: &'a str,
    /// File contents.
    pub bytes: &'a [u8],
}

impl<'a> ArchiveEntry<'a> {
    /// Entry for an artifact, under its own file name.
    pub fn from_artifact<A: Artifact + ?Sized>(artifact: &'a A) -> Self {
        Self {
            name: artifact.file_name(),
            bytes: artifact.bytes(),
        }
    }
}

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// File name of the archive.
    pub name: String,
    /// ZIP bytes.
    pub bytes: Vec<u8>,
}

impl Archive {
    /// Media type of the archive bytes.
    pub fn mime_type(&self) -> &'static str {
        ZIP_MIME_TYPE
    }
}

/// Writes ZIP archives in memory.
#[derive(Debug, Clone, Copy)]
pub struct ArchivePackager {
    compression: CompressionMethod,
}

impl Default for ArchivePackager {
    fn default() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl ArchivePackager {
    /// Packager using deflate compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every entry, in order, under its own name. Names are not
    /// deduplicated.
    pub fn package(&self, entries: &[ArchiveEntry<'_>]) -> Result<Vec<u8>, ArchiveError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(self.compression);

        for entry in entries {
            zip.start_file(entry.name, options)
                .map_err(|source| ArchiveError::Entry {
                    name: entry.name.to_string(),
                    source,
                })?;
            zip.write_all(entry.bytes)?;
        }

        let cursor = zip.finish().map_err(ArchiveError::Finish)?;
        let bytes = cursor.into_inner();
        debug!(entries = entries.len(), size = bytes.len(), "archive written");
        Ok(bytes)
    }

    /// Package `entries` into an archive called `name`, or
    /// `pdf_pages.zip` when no name is given.
    pub fn package_named(
        &self,
        entries: &[ArchiveEntry<'_>],
        name: Option<&str>,
    ) -> Result<Archive, ArchiveError> {
        Ok(Archive {
            name: name.unwrap_or(DEFAULT_ARCHIVE_NAME).to_string(),
            bytes: self.package(entries)?,
        })
    }
}
