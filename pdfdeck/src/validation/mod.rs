//! Input validation for pdfdeck.
//!
//! Candidates are checked in two stages:
//! - cheap checks on name, declared type and size, done before a single byte
//!   is parsed, and
//! - a signature check and full parse that turns accepted bytes into a
//!   [`SourceDocument`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::config::Limits;
//! use pdfdeck::document::CandidateFile;
//! use pdfdeck::validation::Validator;
//!
//! # fn example(bytes: Vec<u8>) -> pdfdeck::Result<()> {
//! let validator = Validator::new(Limits::default());
//! let source = validator.load(CandidateFile::new("report.pdf", bytes))?;
//! println!("{} has {} pages", source.name, source.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::{Limits, PDF_MIME_TYPE};
use crate::document::{CandidateFile, SourceDocument};
use crate::error::{PdfDeckError, Result};
use crate::utils::{format_file_size, has_pdf_signature};

/// Memory figures reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Memory the process may use, in bytes.
    pub limit_bytes: u64,
    /// Memory currently in use, in bytes.
    pub used_bytes: u64,
}

impl MemoryInfo {
    /// Bytes still available.
    pub fn available_bytes(&self) -> u64 {
        self.limit_bytes.saturating_sub(self.used_bytes)
    }
}

/// Source of memory figures. Hosts without introspection return `None`.
pub trait MemoryProbe: Send + Sync {
    /// Current memory figures, if known.
    fn sample(&self) -> Option<MemoryInfo>;
}

/// Warning that a file may not fit comfortably in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryAdvisory {
    /// Size of the file about to be loaded.
    pub file_size: u64,
    /// Memory available when it was checked.
    pub available_bytes: u64,
}

/// Summary of a loaded document, for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Declared file name.
    pub name: String,
    /// Number of pages.
    pub page_count: usize,
    /// PDF version (major, minor).
    pub version: Option<(u8, u8)>,
    /// Size in bytes.
    pub file_size: u64,
    /// First page dimensions (width, height) in points, if available.
    pub page_dimensions: Option<(f32, f32)>,
}

impl DocumentInfo {
    /// Describe a loaded document.
    pub fn from_source(source: &SourceDocument) -> Self {
        let doc = &source.document;
        let version = doc.version.split_once('.').map(|(major, minor)| {
            (
                major.parse::<u8>().unwrap_or_default(),
                minor.parse::<u8>().unwrap_or_default(),
            )
        });

        let page_dimensions = doc
            .get_pages()
            .into_values()
            .next()
            .and_then(|page_id| crate::pages::flatten_page(doc, page_id).ok())
            .and_then(|page| {
                let media_box = page.get(b"MediaBox").ok()?.as_array().ok()?;
                if media_box.len() < 4 {
                    return None;
                }
                let width = media_box[2].as_float().ok()? - media_box[0].as_float().ok()?;
                let height = media_box[3].as_float().ok()? - media_box[1].as_float().ok()?;
                Some((width, height))
            });

        Self {
            name: source.name.clone(),
            page_count: source.page_count,
            version,
            file_size: source.size(),
            page_dimensions,
        }
    }

    /// File size, human-readable.
    pub fn formatted_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Checks candidates and parses the ones that pass.
#[derive(Clone, Default)]
pub struct Validator {
    limits: Limits,
    memory_probe: Option<Arc<dyn MemoryProbe>>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("limits", &self.limits)
            .field("memory_probe", &self.memory_probe.is_some())
            .finish()
    }
}

impl Validator {
    /// Create a validator enforcing `limits`.
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            memory_probe: None,
        }
    }

    /// Consult `probe` before loading each document.
    pub fn with_memory_probe(mut self, probe: Option<Arc<dyn MemoryProbe>>) -> Self {
        self.memory_probe = probe;
        self
    }

    /// Limits this validator enforces.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Reject names without a `.pdf` extension and declared types other than
    /// `application/pdf`. An absent or empty declared type is accepted.
    pub fn check_type(name: &str, declared_type: Option<&str>) -> Result<()> {
        let has_pdf_extension = name.len() >= 4
            && name.is_char_boundary(name.len() - 4)
            && name[name.len() - 4..].eq_ignore_ascii_case(".pdf");
        if !has_pdf_extension {
            return Err(PdfDeckError::invalid_file_type(
                name,
                "file name does not end in .pdf",
            ));
        }

        if let Some(declared) = declared_type.map(str::trim)
            && !declared.is_empty()
            && !declared.eq_ignore_ascii_case(PDF_MIME_TYPE)
        {
            return Err(PdfDeckError::invalid_file_type(
                name,
                format!("declared type is {declared}, expected {PDF_MIME_TYPE}"),
            ));
        }

        Ok(())
    }

    /// Reject sizes over `limit`. A size equal to the limit is accepted.
    pub fn check_size(name: &str, size: u64, limit: u64) -> Result<()> {
        if size > limit {
            return Err(PdfDeckError::file_too_large(name, size, limit));
        }
        Ok(())
    }

    /// Cheap checks on a single candidate. Nothing is parsed.
    pub fn check(&self, candidate: &CandidateFile) -> Result<()> {
        Self::check_type(&candidate.name, candidate.declared_type.as_deref())?;
        Self::check_size(&candidate.name, candidate.size, self.limits.max_file_size)
    }

    /// Preconditions of a merge batch: at least two documents and a combined
    /// size within the merge ceiling. Nothing is parsed.
    pub fn check_merge_batch<I>(&self, sizes: I) -> Result<()>
    where
        I: IntoIterator<Item = u64>,
    {
        let (count, total) = sizes
            .into_iter()
            .fold((0usize, 0u64), |(count, total), size| {
                (count + 1, total.saturating_add(size))
            });

        if count < 2 {
            return Err(PdfDeckError::NotEnoughDocuments { count });
        }
        Self::check_size(
            &format!("merge of {count} documents"),
            total,
            self.limits.max_merge_size,
        )
    }

    /// Warn when a file of `size` bytes may not fit in available memory.
    ///
    /// Loading proceeds either way. [`Validator::load`] keeps the result on
    /// the [`SourceDocument`] so it reaches the operation's outcome.
    pub fn memory_advisory(&self, size: u64) -> Option<MemoryAdvisory> {
        let info = self.memory_probe.as_ref()?.sample()?;
        let available = info.available_bytes();
        if size > available / 2 {
            tracing::warn!(
                file_size = size,
                available_bytes = available,
                "file is large relative to available memory"
            );
            return Some(MemoryAdvisory {
                file_size: size,
                available_bytes: available,
            });
        }
        None
    }

    /// Check a candidate and parse it.
    ///
    /// # Errors
    ///
    /// - `InvalidFileType` / `FileTooLarge` from [`Validator::check`]
    /// - `CorruptedDocument` if the bytes lack a PDF header, fail to parse,
    ///   or are encrypted
    pub fn load(&self, candidate: CandidateFile) -> Result<SourceDocument> {
        self.check(&candidate)?;
        let memory_advisory = self.memory_advisory(candidate.size);

        let CandidateFile { name, bytes, .. } = candidate;

        if !has_pdf_signature(&bytes) {
            return Err(PdfDeckError::corrupted(name, "missing %PDF- header"));
        }

        let document = Document::load_mem(&bytes)
            .map_err(|err| PdfDeckError::corrupted(name.as_str(), err.to_string()))?;

        if document.is_encrypted() {
            return Err(PdfDeckError::corrupted(
                name,
                "document is encrypted and cannot be copied",
            ));
        }

        let page_count = document.get_pages().len();
        tracing::debug!(name = %name, page_count, size = bytes.len(), "loaded document");

        Ok(SourceDocument {
            name,
            bytes,
            document,
            page_count,
            memory_advisory,
        })
    }
}
