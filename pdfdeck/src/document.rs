//! Inputs and outputs of the pipeline.

use lopdf::Document;
use serde::Serialize;

use crate::config::PDF_MIME_TYPE;
use crate::validation::MemoryAdvisory;

/// A file offered for processing, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// File name as supplied by the user (no directory part required).
    pub name: String,
    /// MIME type declared by whatever handed the file over, if any.
    pub declared_type: Option<String>,
    /// Size in bytes as reported by the source.
    pub size: u64,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    /// Candidate from an in-memory buffer; size is the buffer length.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Attach a declared MIME type.
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }
}

/// A validated, parsed input document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Declared file name.
    pub name: String,
    /// Raw bytes the document was parsed from.
    pub bytes: Vec<u8>,
    /// Parsed document.
    pub document: Document,
    /// Number of pages.
    pub page_count: usize,
    /// Set when the file looked large next to the memory available at
    /// load time.
    pub memory_advisory: Option<MemoryAdvisory>,
}

impl SourceDocument {
    /// File name without its `.pdf` extension.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Size of the raw bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// One page of a split, as a standalone PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArtifact {
    /// 1-based page number in the source.
    pub page_number: usize,
    /// Output file name.
    pub file_name: String,
    /// Serialized single-page PDF.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// JPEG data URI, or empty when no thumbnail is available.
    pub thumbnail: String,
}

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeArtifact {
    /// Output file name.
    pub file_name: String,
    /// Serialized merged PDF.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Sum of the page counts of all inputs.
    pub page_count: usize,
    /// JPEG data URI, or empty when no thumbnail is available.
    pub thumbnail: String,
}

/// Anything the pipeline produces that can be saved or archived.
pub trait Artifact {
    /// Output file name.
    fn file_name(&self) -> &str;
    /// Serialized PDF.
    fn bytes(&self) -> &[u8];
    /// JPEG data URI of the first page, empty if none was rendered.
    fn thumbnail(&self) -> &str;
    /// Media type of [`Artifact::bytes`].
    fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }
}

impl Artifact for PageArtifact {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn thumbnail(&self) -> &str {
        &self.thumbnail
    }
}

impl Artifact for MergeArtifact {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn thumbnail(&self) -> &str {
        &self.thumbnail
    }
}

/// Strip a trailing `.pdf` (any case) from a file name.
pub fn base_name(name: &str) -> &str {
    let len = name.len();
    if len >= 4
        && name.is_char_boundary(len - 4)
        && name[len - 4..].eq_ignore_ascii_case(".pdf")
    {
        &name[..len - 4]
    } else {
        name
    }
}

/// Width of the zero-padded page number for an `total`-page split.
pub fn page_number_width(total: usize) -> usize {
    total.to_string().len().max(2)
}

/// `{base}_page_{NN}.pdf`
pub fn page_file_name(base: &str, page_number: usize, total: usize) -> String {
    let width = page_number_width(total);
    format!("{base}_page_{page_number:0width$}.pdf")
}

/// `{base}_merged.pdf`
pub fn merged_file_name(first_base: &str) -> String {
    format!("{first_base}_merged.pdf")
}
